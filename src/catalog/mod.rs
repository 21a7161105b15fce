pub mod presets;
mod types;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub use types::*;

use crate::wardrobe::selections::{
    AccessoryField, ClothingField, FieldPath, FootwearField, HairField, WardrobeSelections,
};
use crate::wardrobe::translation::{check_isomorphism, CatalogDrift, TranslationMap};

const EN_CATALOG: &str = include_str!("../../data/catalog/en.json");
const PT_CATALOG: &str = include_str!("../../data/catalog/pt.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Pt,
}

impl Locale {
    /// The locale whose values are embedded in prompts.
    pub const CANONICAL: Locale = Locale::En;

    pub fn parse(value: &str) -> Option<Self> {
        let primary = value.trim().split(['-', '_']).next()?.to_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "pt" => Some(Locale::Pt),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pt => "pt",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse the {locale} catalog: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
    #[error("locale catalogs are not structurally parallel ({} mismatch(es)); first: {}", .0.len(), .0.first().map(|d| d.to_string()).unwrap_or_default())]
    Drift(Vec<CatalogDrift>),
    #[error("failed to parse style presets: {0}")]
    Presets(#[from] serde_yaml::Error),
}

/// Option taxonomy of a single locale, kept both typed and as the raw tree
/// used for structural walks.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    options: WardrobeOptions,
    raw: Value,
}

impl Catalog {
    pub fn from_json(locale: Locale, text: &str) -> Result<Self, CatalogError> {
        let raw: Value =
            serde_json::from_str(text).map_err(|source| CatalogError::Parse { locale, source })?;
        let options: WardrobeOptions = serde_json::from_value(raw.clone())
            .map_err(|source| CatalogError::Parse { locale, source })?;
        Ok(Catalog {
            locale,
            options,
            raw,
        })
    }

    pub fn embedded(locale: Locale) -> Result<Self, CatalogError> {
        match locale {
            Locale::En => Self::from_json(locale, EN_CATALOG),
            Locale::Pt => Self::from_json(locale, PT_CATALOG),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn options(&self) -> &WardrobeOptions {
        &self.options
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn garment(&self, category: ClothingCategory) -> Option<&GarmentCategory> {
        let clothing = &self.options.clothing_options;
        match category {
            ClothingCategory::OnePiece => Some(&clothing.one_piece),
            ClothingCategory::Tops => Some(&clothing.tops),
            ClothingCategory::Bottoms => Some(&clothing.bottoms),
            ClothingCategory::Stockings => Some(&clothing.stockings),
            ClothingCategory::Outerwear => Some(&clothing.outerwear),
            ClothingCategory::Suits => Some(&clothing.suits),
            ClothingCategory::Swimwear => Some(&clothing.swimwear),
            ClothingCategory::Activewear => Some(&clothing.activewear),
            ClothingCategory::Sleepwear => Some(&clothing.sleepwear),
            ClothingCategory::Underwear => Some(&clothing.underwear),
            ClothingCategory::Fantasy => Some(&clothing.fantasy),
            ClothingCategory::Traditional => None,
        }
    }

    /// Sub-styles offered for a garment type; empty when the type is unknown.
    pub fn styles_for(&self, category: ClothingCategory, type_value: &str) -> &[CatalogOption] {
        self.garment(category)
            .and_then(|garment| {
                garment
                    .options
                    .types
                    .iter()
                    .find(|option| option.value == type_value)
            })
            .map(|option| option.styles.as_slice())
            .unwrap_or(&[])
    }

    pub fn costumes_for(&self, decade_value: &str) -> &[CatalogOption] {
        self.options
            .decade_options
            .iter()
            .find(|option| option.value == decade_value)
            .map(|option| option.costumes.as_slice())
            .unwrap_or(&[])
    }

    /// Details are keyed by the pose's stable id; catalogs that still key them
    /// by the localized pose value are understood too.
    pub fn pose_details_for(&self, pose_value: &str) -> &[CatalogOption] {
        let Some(pose) = self
            .options
            .pose_options
            .iter()
            .find(|option| option.value == pose_value)
        else {
            return &[];
        };
        pose.id
            .as_deref()
            .and_then(|id| self.options.pose_details_by_pose.get(id))
            .or_else(|| self.options.pose_details_by_pose.get(&pose.value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn hair_group(&self, field: HairField) -> &[CatalogOption] {
        let id = match field {
            HairField::Length => "length",
            HairField::Style => "style",
            HairField::Color => "color",
        };
        self.options
            .hair_options
            .iter()
            .find(|group| group.id == id)
            .map(|group| group.options.as_slice())
            .unwrap_or(&[])
    }

    fn accessory_group(&self, slot: AccessorySlot, field: AccessoryField) -> &[CatalogOption] {
        let id = match field {
            AccessoryField::Type => "type",
            AccessoryField::Material => "material",
        };
        self.options
            .accessories_options
            .iter()
            .find(|group| group.id == slot.key())
            .and_then(|group| group.options.iter().find(|options| options.id == id))
            .map(|options| options.options.as_slice())
            .unwrap_or(&[])
    }

    fn footwear_type(&self, type_value: &str) -> Option<&FootwearType> {
        self.options
            .footwear_options
            .types
            .iter()
            .find(|option| option.value == type_value)
    }

    /// `(label, value)` pairs offered for `path`, given the parent choices
    /// already present in `selections`. `None` for free-text fields.
    pub fn choices(
        &self,
        path: &FieldPath,
        selections: &WardrobeSelections,
    ) -> Option<Vec<(&str, &str)>> {
        fn pairs(options: &[CatalogOption]) -> Vec<(&str, &str)> {
            options
                .iter()
                .map(|option| (option.label.as_str(), option.value.as_str()))
                .collect()
        }

        let choices = match path {
            FieldPath::ImageAge | FieldPath::FineTuning => return None,
            FieldPath::VisualStyle => pairs(&self.options.visual_style_options),
            FieldPath::ImageStyle => pairs(&self.options.image_style_options),
            FieldPath::Decade => self
                .options
                .decade_options
                .iter()
                .map(|option| (option.label.as_str(), option.value.as_str()))
                .collect(),
            FieldPath::ThemeCostume => pairs(self.costumes_for(&selections.decade)),
            FieldPath::Hair(field) => pairs(self.hair_group(*field)),
            FieldPath::Clothing(ClothingCategory::Traditional, field) => {
                let options = &self.options.clothing_options.traditional.options;
                match field {
                    ClothingField::Type => pairs(&options.types),
                    ClothingField::Headwear => pairs(&options.headwear),
                    ClothingField::Top => pairs(&options.tops),
                    ClothingField::Bottom => pairs(&options.bottoms),
                    ClothingField::FeatherColors => pairs(&options.feather_colors),
                    ClothingField::BodyPaintColors => pairs(&options.body_paint_colors),
                    _ => Vec::new(),
                }
            }
            FieldPath::Clothing(category, field) => match self.garment(*category) {
                None => Vec::new(),
                Some(garment) => match field {
                    ClothingField::Type => garment
                        .options
                        .types
                        .iter()
                        .map(|option| (option.label.as_str(), option.value.as_str()))
                        .collect(),
                    ClothingField::Style => {
                        let current_type = &selections.clothing.get(*category).item_type;
                        pairs(self.styles_for(*category, current_type))
                    }
                    ClothingField::Fabric => pairs(&garment.options.fabrics),
                    ClothingField::Color => pairs(&garment.options.colors),
                    ClothingField::Pattern => pairs(&garment.options.patterns),
                    _ => Vec::new(),
                },
            },
            FieldPath::Footwear(FootwearField::Type) => self
                .options
                .footwear_options
                .types
                .iter()
                .map(|option| (option.label.as_str(), option.value.as_str()))
                .collect(),
            FieldPath::Footwear(field) => {
                match self.footwear_type(&selections.footwear.item_type) {
                    None => Vec::new(),
                    Some(footwear) => match field {
                        FootwearField::Material => pairs(&footwear.materials),
                        FootwearField::Color => pairs(&footwear.colors),
                        FootwearField::Type => Vec::new(),
                    },
                }
            }
            FieldPath::Accessory(slot, field) => pairs(self.accessory_group(*slot, *field)),
            FieldPath::Pose => pairs(&self.options.pose_options),
            FieldPath::PoseDetail => pairs(self.pose_details_for(&selections.pose)),
            FieldPath::Lighting => pairs(&self.options.lighting_options),
            FieldPath::Background => pairs(&self.options.background_options),
        };
        Some(choices)
    }

    /// Whether `value` is one of the options this catalog offers for `path`.
    /// Free-text fields accept anything.
    pub fn offers(&self, path: &FieldPath, value: &str, selections: &WardrobeSelections) -> bool {
        match self.choices(path, selections) {
            None => true,
            Some(choices) => choices.iter().any(|(_, offered)| *offered == value),
        }
    }
}

/// Both locale catalogs plus the localized-to-canonical lookup derived from
/// them. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CatalogSet {
    en: Catalog,
    pt: Catalog,
    translation: TranslationMap,
}

impl CatalogSet {
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_catalogs(Catalog::embedded(Locale::En)?, Catalog::embedded(Locale::Pt)?)
    }

    pub fn from_catalogs(en: Catalog, pt: Catalog) -> Result<Self, CatalogError> {
        let drift = check_isomorphism(en.raw(), pt.raw());
        if !drift.is_empty() {
            return Err(CatalogError::Drift(drift));
        }

        let translation = TranslationMap::build(en.raw(), pt.raw());
        info!(
            "Loaded wardrobe catalogs (en/pt) with {} translated values",
            translation.len()
        );
        Ok(CatalogSet {
            en,
            pt,
            translation,
        })
    }

    pub fn catalog(&self, locale: Locale) -> &Catalog {
        match locale {
            Locale::En => &self.en,
            Locale::Pt => &self.pt,
        }
    }

    pub fn translation(&self) -> &TranslationMap {
        &self.translation
    }
}
