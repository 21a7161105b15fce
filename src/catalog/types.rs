use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One selectable entry. `value` is what ends up inside a prompt, `label` is
/// display text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub value: String,
}

/// A garment type and the sub-styles offered once it is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub styles: Vec<CatalogOption>,
}

/// A decade or era, optionally with period costumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub costumes: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: String,
    pub label: String,
    pub options: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentOptions {
    pub types: Vec<StyleOption>,
    pub fabrics: Vec<CatalogOption>,
    pub colors: Vec<CatalogOption>,
    pub patterns: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentCategory {
    pub label: String,
    pub options: GarmentOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalOptions {
    pub types: Vec<CatalogOption>,
    pub headwear: Vec<CatalogOption>,
    pub tops: Vec<CatalogOption>,
    pub bottoms: Vec<CatalogOption>,
    pub feather_colors: Vec<CatalogOption>,
    pub body_paint_colors: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraditionalCategory {
    pub label: String,
    pub options: TraditionalOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingOptions {
    pub one_piece: GarmentCategory,
    pub tops: GarmentCategory,
    pub bottoms: GarmentCategory,
    pub stockings: GarmentCategory,
    pub outerwear: GarmentCategory,
    pub suits: GarmentCategory,
    pub swimwear: GarmentCategory,
    pub activewear: GarmentCategory,
    pub sleepwear: GarmentCategory,
    pub underwear: GarmentCategory,
    pub fantasy: GarmentCategory,
    pub traditional: TraditionalCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootwearType {
    pub label: String,
    pub value: String,
    pub materials: Vec<CatalogOption>,
    pub colors: Vec<CatalogOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootwearOptions {
    pub types: Vec<FootwearType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryGroup {
    pub id: String,
    pub label: String,
    pub options: Vec<OptionGroup>,
}

/// The full option taxonomy for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeOptions {
    pub visual_style_options: Vec<CatalogOption>,
    pub image_style_options: Vec<CatalogOption>,
    pub decade_options: Vec<ThemeOption>,
    pub hair_options: Vec<OptionGroup>,
    pub clothing_options: ClothingOptions,
    pub footwear_options: FootwearOptions,
    pub accessories_options: Vec<AccessoryGroup>,
    pub pose_options: Vec<CatalogOption>,
    pub pose_details_by_pose: HashMap<String, Vec<CatalogOption>>,
    pub lighting_options: Vec<CatalogOption>,
    pub background_options: Vec<CatalogOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClothingCategory {
    OnePiece,
    Tops,
    Bottoms,
    Stockings,
    Outerwear,
    Suits,
    Swimwear,
    Activewear,
    Sleepwear,
    Underwear,
    Fantasy,
    Traditional,
}

impl ClothingCategory {
    /// Prompt order.
    pub const ALL: [ClothingCategory; 12] = [
        ClothingCategory::OnePiece,
        ClothingCategory::Tops,
        ClothingCategory::Bottoms,
        ClothingCategory::Stockings,
        ClothingCategory::Outerwear,
        ClothingCategory::Suits,
        ClothingCategory::Swimwear,
        ClothingCategory::Activewear,
        ClothingCategory::Sleepwear,
        ClothingCategory::Underwear,
        ClothingCategory::Fantasy,
        ClothingCategory::Traditional,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ClothingCategory::OnePiece => "onePiece",
            ClothingCategory::Tops => "tops",
            ClothingCategory::Bottoms => "bottoms",
            ClothingCategory::Stockings => "stockings",
            ClothingCategory::Outerwear => "outerwear",
            ClothingCategory::Suits => "suits",
            ClothingCategory::Swimwear => "swimwear",
            ClothingCategory::Activewear => "activewear",
            ClothingCategory::Sleepwear => "sleepwear",
            ClothingCategory::Underwear => "underwear",
            ClothingCategory::Fantasy => "fantasy",
            ClothingCategory::Traditional => "traditional",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorySlot {
    Head,
    Neck,
    Ears,
    Wrists,
    Hands,
    Fingers,
    Waist,
    Other,
}

impl AccessorySlot {
    pub const ALL: [AccessorySlot; 8] = [
        AccessorySlot::Head,
        AccessorySlot::Neck,
        AccessorySlot::Ears,
        AccessorySlot::Wrists,
        AccessorySlot::Hands,
        AccessorySlot::Fingers,
        AccessorySlot::Waist,
        AccessorySlot::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AccessorySlot::Head => "head",
            AccessorySlot::Neck => "neck",
            AccessorySlot::Ears => "ears",
            AccessorySlot::Wrists => "wrists",
            AccessorySlot::Hands => "hands",
            AccessorySlot::Fingers => "fingers",
            AccessorySlot::Waist => "waist",
            AccessorySlot::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}
