use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::presets::PresetSelections;
use crate::catalog::{AccessorySlot, ClothingCategory};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown selection field '{0}'")]
    UnknownField(String),
    #[error("'{0}' holds a list; toggle values instead of setting it")]
    NotScalar(String),
    #[error("'{0}' holds a single value; set it instead of toggling")]
    NotList(String),
}

/// Accepts both `"a"` and `["a", "b"]`; older presets stored single styles as
/// plain strings.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) if value.is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStyle {
    pub style: String,
    /// Free text, never translated through the catalog.
    pub age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairSelection {
    pub length: String,
    pub style: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClothingItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(deserialize_with = "string_or_list")]
    pub style: Vec<String>,
    pub fabric: String,
    pub color: String,
    pub pattern: String,
    pub headwear: String,
    pub top: String,
    pub bottom: String,
    #[serde(deserialize_with = "string_or_list")]
    pub feather_colors: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub body_paint_colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClothingSelections {
    pub one_piece: ClothingItem,
    pub tops: ClothingItem,
    pub bottoms: ClothingItem,
    pub stockings: ClothingItem,
    pub outerwear: ClothingItem,
    pub suits: ClothingItem,
    pub swimwear: ClothingItem,
    pub activewear: ClothingItem,
    pub sleepwear: ClothingItem,
    pub underwear: ClothingItem,
    pub fantasy: ClothingItem,
    pub traditional: ClothingItem,
}

impl ClothingSelections {
    pub fn get(&self, category: ClothingCategory) -> &ClothingItem {
        match category {
            ClothingCategory::OnePiece => &self.one_piece,
            ClothingCategory::Tops => &self.tops,
            ClothingCategory::Bottoms => &self.bottoms,
            ClothingCategory::Stockings => &self.stockings,
            ClothingCategory::Outerwear => &self.outerwear,
            ClothingCategory::Suits => &self.suits,
            ClothingCategory::Swimwear => &self.swimwear,
            ClothingCategory::Activewear => &self.activewear,
            ClothingCategory::Sleepwear => &self.sleepwear,
            ClothingCategory::Underwear => &self.underwear,
            ClothingCategory::Fantasy => &self.fantasy,
            ClothingCategory::Traditional => &self.traditional,
        }
    }

    pub fn get_mut(&mut self, category: ClothingCategory) -> &mut ClothingItem {
        match category {
            ClothingCategory::OnePiece => &mut self.one_piece,
            ClothingCategory::Tops => &mut self.tops,
            ClothingCategory::Bottoms => &mut self.bottoms,
            ClothingCategory::Stockings => &mut self.stockings,
            ClothingCategory::Outerwear => &mut self.outerwear,
            ClothingCategory::Suits => &mut self.suits,
            ClothingCategory::Swimwear => &mut self.swimwear,
            ClothingCategory::Activewear => &mut self.activewear,
            ClothingCategory::Sleepwear => &mut self.sleepwear,
            ClothingCategory::Underwear => &mut self.underwear,
            ClothingCategory::Fantasy => &mut self.fantasy,
            ClothingCategory::Traditional => &mut self.traditional,
        }
    }

    /// Items in prompt order.
    pub fn iter(&self) -> impl Iterator<Item = (ClothingCategory, &ClothingItem)> {
        ClothingCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootwearSelection {
    #[serde(rename = "type")]
    pub item_type: String,
    pub material: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryChoice {
    #[serde(rename = "type")]
    pub item_type: String,
    pub material: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorySelections {
    pub head: AccessoryChoice,
    pub neck: AccessoryChoice,
    pub ears: AccessoryChoice,
    pub wrists: AccessoryChoice,
    pub hands: AccessoryChoice,
    pub fingers: AccessoryChoice,
    pub waist: AccessoryChoice,
    pub other: AccessoryChoice,
}

impl AccessorySelections {
    pub fn get(&self, slot: AccessorySlot) -> &AccessoryChoice {
        match slot {
            AccessorySlot::Head => &self.head,
            AccessorySlot::Neck => &self.neck,
            AccessorySlot::Ears => &self.ears,
            AccessorySlot::Wrists => &self.wrists,
            AccessorySlot::Hands => &self.hands,
            AccessorySlot::Fingers => &self.fingers,
            AccessorySlot::Waist => &self.waist,
            AccessorySlot::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, slot: AccessorySlot) -> &mut AccessoryChoice {
        match slot {
            AccessorySlot::Head => &mut self.head,
            AccessorySlot::Neck => &mut self.neck,
            AccessorySlot::Ears => &mut self.ears,
            AccessorySlot::Wrists => &mut self.wrists,
            AccessorySlot::Hands => &mut self.hands,
            AccessorySlot::Fingers => &mut self.fingers,
            AccessorySlot::Waist => &mut self.waist,
            AccessorySlot::Other => &mut self.other,
        }
    }
}

/// Everything the user asked to change. Serialized with the camelCase field
/// names custom presets have always been stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WardrobeSelections {
    pub visual_style: String,
    pub image_style: ImageStyle,
    pub decade: String,
    pub theme_costume: String,
    pub hair: HairSelection,
    pub clothing: ClothingSelections,
    pub footwear: FootwearSelection,
    pub accessories: AccessorySelections,
    pub pose: String,
    #[serde(deserialize_with = "string_or_list")]
    pub pose_detail: Vec<String>,
    pub lighting: String,
    pub background: String,
    pub fine_tuning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HairField {
    Length,
    Style,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClothingField {
    Type,
    Style,
    Fabric,
    Color,
    Pattern,
    Headwear,
    Top,
    Bottom,
    FeatherColors,
    BodyPaintColors,
}

impl ClothingField {
    fn key(self) -> &'static str {
        match self {
            ClothingField::Type => "type",
            ClothingField::Style => "style",
            ClothingField::Fabric => "fabric",
            ClothingField::Color => "color",
            ClothingField::Pattern => "pattern",
            ClothingField::Headwear => "headwear",
            ClothingField::Top => "top",
            ClothingField::Bottom => "bottom",
            ClothingField::FeatherColors => "featherColors",
            ClothingField::BodyPaintColors => "bodyPaintColors",
        }
    }

    fn is_list(self) -> bool {
        matches!(
            self,
            ClothingField::Style | ClothingField::FeatherColors | ClothingField::BodyPaintColors
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootwearField {
    Type,
    Material,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryField {
    Type,
    Material,
}

/// Address of a single field inside [`WardrobeSelections`], written as a
/// dotted path such as `clothing.tops.style` or `accessories.ears.material`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    VisualStyle,
    ImageStyle,
    ImageAge,
    Decade,
    ThemeCostume,
    Hair(HairField),
    Clothing(ClothingCategory, ClothingField),
    Footwear(FootwearField),
    Accessory(AccessorySlot, AccessoryField),
    Pose,
    PoseDetail,
    Lighting,
    Background,
    FineTuning,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, SelectionError> {
        let unknown = || SelectionError::UnknownField(raw.to_string());
        let segments: Vec<&str> = raw.trim().split('.').collect();
        let path = match segments.as_slice() {
            ["visualStyle"] => FieldPath::VisualStyle,
            ["imageStyle"] | ["imageStyle", "style"] => FieldPath::ImageStyle,
            ["imageStyle", "age"] => FieldPath::ImageAge,
            ["decade"] => FieldPath::Decade,
            ["themeCostume"] => FieldPath::ThemeCostume,
            ["hair", field] => FieldPath::Hair(match *field {
                "length" => HairField::Length,
                "style" => HairField::Style,
                "color" => HairField::Color,
                _ => return Err(unknown()),
            }),
            ["clothing", category, field] => {
                let category = ClothingCategory::from_key(category).ok_or_else(unknown)?;
                let field = match *field {
                    "type" => ClothingField::Type,
                    "style" => ClothingField::Style,
                    "fabric" => ClothingField::Fabric,
                    "color" => ClothingField::Color,
                    "pattern" => ClothingField::Pattern,
                    "headwear" => ClothingField::Headwear,
                    "top" => ClothingField::Top,
                    "bottom" => ClothingField::Bottom,
                    "featherColors" => ClothingField::FeatherColors,
                    "bodyPaintColors" => ClothingField::BodyPaintColors,
                    _ => return Err(unknown()),
                };
                let traditional_only = matches!(
                    field,
                    ClothingField::Headwear
                        | ClothingField::Top
                        | ClothingField::Bottom
                        | ClothingField::FeatherColors
                        | ClothingField::BodyPaintColors
                );
                let garment_only = matches!(
                    field,
                    ClothingField::Style
                        | ClothingField::Fabric
                        | ClothingField::Color
                        | ClothingField::Pattern
                );
                let is_traditional = category == ClothingCategory::Traditional;
                if (traditional_only && !is_traditional) || (garment_only && is_traditional) {
                    return Err(unknown());
                }
                FieldPath::Clothing(category, field)
            }
            ["footwear", field] => FieldPath::Footwear(match *field {
                "type" => FootwearField::Type,
                "material" => FootwearField::Material,
                "color" => FootwearField::Color,
                _ => return Err(unknown()),
            }),
            ["accessories", slot, field] => {
                let slot = AccessorySlot::from_key(slot).ok_or_else(unknown)?;
                FieldPath::Accessory(
                    slot,
                    match *field {
                        "type" => AccessoryField::Type,
                        "material" => AccessoryField::Material,
                        _ => return Err(unknown()),
                    },
                )
            }
            ["pose"] => FieldPath::Pose,
            ["poseDetail"] => FieldPath::PoseDetail,
            ["lighting"] => FieldPath::Lighting,
            ["background"] => FieldPath::Background,
            ["fineTuning"] => FieldPath::FineTuning,
            _ => return Err(unknown()),
        };
        Ok(path)
    }

    pub fn is_list(&self) -> bool {
        match self {
            FieldPath::PoseDetail => true,
            FieldPath::Clothing(_, field) => field.is_list(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::VisualStyle => f.write_str("visualStyle"),
            FieldPath::ImageStyle => f.write_str("imageStyle.style"),
            FieldPath::ImageAge => f.write_str("imageStyle.age"),
            FieldPath::Decade => f.write_str("decade"),
            FieldPath::ThemeCostume => f.write_str("themeCostume"),
            FieldPath::Hair(field) => {
                let name = match field {
                    HairField::Length => "length",
                    HairField::Style => "style",
                    HairField::Color => "color",
                };
                write!(f, "hair.{name}")
            }
            FieldPath::Clothing(category, field) => {
                write!(f, "clothing.{}.{}", category.key(), field.key())
            }
            FieldPath::Footwear(field) => {
                let name = match field {
                    FootwearField::Type => "type",
                    FootwearField::Material => "material",
                    FootwearField::Color => "color",
                };
                write!(f, "footwear.{name}")
            }
            FieldPath::Accessory(slot, field) => {
                let name = match field {
                    AccessoryField::Type => "type",
                    AccessoryField::Material => "material",
                };
                write!(f, "accessories.{}.{name}", slot.key())
            }
            FieldPath::Pose => f.write_str("pose"),
            FieldPath::PoseDetail => f.write_str("poseDetail"),
            FieldPath::Lighting => f.write_str("lighting"),
            FieldPath::Background => f.write_str("background"),
            FieldPath::FineTuning => f.write_str("fineTuning"),
        }
    }
}

impl WardrobeSelections {
    pub fn reset(&mut self) {
        *self = WardrobeSelections::default();
    }

    fn scalar_mut(&mut self, path: &FieldPath) -> Option<&mut String> {
        let slot = match path {
            FieldPath::VisualStyle => &mut self.visual_style,
            FieldPath::ImageStyle => &mut self.image_style.style,
            FieldPath::ImageAge => &mut self.image_style.age,
            FieldPath::Decade => &mut self.decade,
            FieldPath::ThemeCostume => &mut self.theme_costume,
            FieldPath::Hair(HairField::Length) => &mut self.hair.length,
            FieldPath::Hair(HairField::Style) => &mut self.hair.style,
            FieldPath::Hair(HairField::Color) => &mut self.hair.color,
            FieldPath::Clothing(category, field) => {
                let item = self.clothing.get_mut(*category);
                match field {
                    ClothingField::Type => &mut item.item_type,
                    ClothingField::Fabric => &mut item.fabric,
                    ClothingField::Color => &mut item.color,
                    ClothingField::Pattern => &mut item.pattern,
                    ClothingField::Headwear => &mut item.headwear,
                    ClothingField::Top => &mut item.top,
                    ClothingField::Bottom => &mut item.bottom,
                    ClothingField::Style
                    | ClothingField::FeatherColors
                    | ClothingField::BodyPaintColors => return None,
                }
            }
            FieldPath::Footwear(FootwearField::Type) => &mut self.footwear.item_type,
            FieldPath::Footwear(FootwearField::Material) => &mut self.footwear.material,
            FieldPath::Footwear(FootwearField::Color) => &mut self.footwear.color,
            FieldPath::Accessory(slot, AccessoryField::Type) => {
                &mut self.accessories.get_mut(*slot).item_type
            }
            FieldPath::Accessory(slot, AccessoryField::Material) => {
                &mut self.accessories.get_mut(*slot).material
            }
            FieldPath::Pose => &mut self.pose,
            FieldPath::Lighting => &mut self.lighting,
            FieldPath::Background => &mut self.background,
            FieldPath::FineTuning => &mut self.fine_tuning,
            FieldPath::PoseDetail => return None,
        };
        Some(slot)
    }

    fn list_mut(&mut self, path: &FieldPath) -> Option<&mut Vec<String>> {
        match path {
            FieldPath::PoseDetail => Some(&mut self.pose_detail),
            FieldPath::Clothing(category, ClothingField::Style) => {
                Some(&mut self.clothing.get_mut(*category).style)
            }
            FieldPath::Clothing(category, ClothingField::FeatherColors) => {
                Some(&mut self.clothing.get_mut(*category).feather_colors)
            }
            FieldPath::Clothing(category, ClothingField::BodyPaintColors) => {
                Some(&mut self.clothing.get_mut(*category).body_paint_colors)
            }
            _ => None,
        }
    }

    /// Sets a single-valued field. Choices that other fields depend on clear
    /// their dependents when they change: a garment type drops its styles, a
    /// pose drops its details and a decade drops its costume.
    pub fn set_field(&mut self, path: &FieldPath, value: &str) -> Result<(), SelectionError> {
        let slot = self
            .scalar_mut(path)
            .ok_or_else(|| SelectionError::NotScalar(path.to_string()))?;
        if slot.as_str() == value {
            return Ok(());
        }
        *slot = value.to_string();

        match path {
            FieldPath::Clothing(category, ClothingField::Type) => {
                self.clothing.get_mut(*category).style.clear();
            }
            FieldPath::Pose => self.pose_detail.clear(),
            FieldPath::Decade => self.theme_costume.clear(),
            FieldPath::Footwear(FootwearField::Type) => {
                self.footwear.material.clear();
                self.footwear.color.clear();
            }
            _ => {}
        }
        Ok(())
    }

    /// Adds `value` to a list field, or removes it when already present.
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, path: &FieldPath, value: &str) -> Result<bool, SelectionError> {
        let list = self
            .list_mut(path)
            .ok_or_else(|| SelectionError::NotList(path.to_string()))?;
        if let Some(position) = list.iter().position(|existing| existing == value) {
            list.remove(position);
            Ok(false)
        } else {
            list.push(value.to_string());
            Ok(true)
        }
    }

    pub fn apply_style_preset(&mut self, preset: &PresetSelections) {
        self.visual_style = preset.visual_style.clone();
        self.image_style.style = preset.image_style.clone();
        if self.decade != preset.decade {
            self.decade = preset.decade.clone();
            self.theme_costume.clear();
        }
    }

    /// Visits every catalog-backed string, scalar or list element, skipping
    /// the free-text fields.
    pub fn for_each_catalog_value_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&FieldPath, &mut String),
    {
        let scalar = |selections: &mut Self, path: FieldPath, visit: &mut F| {
            if let Some(value) = selections.scalar_mut(&path) {
                visit(&path, value);
            }
        };

        scalar(self, FieldPath::VisualStyle, &mut visit);
        scalar(self, FieldPath::ImageStyle, &mut visit);
        scalar(self, FieldPath::Decade, &mut visit);
        scalar(self, FieldPath::ThemeCostume, &mut visit);
        for field in [HairField::Length, HairField::Style, HairField::Color] {
            scalar(self, FieldPath::Hair(field), &mut visit);
        }
        for category in ClothingCategory::ALL {
            for field in [
                ClothingField::Type,
                ClothingField::Style,
                ClothingField::Fabric,
                ClothingField::Color,
                ClothingField::Pattern,
                ClothingField::Headwear,
                ClothingField::Top,
                ClothingField::Bottom,
                ClothingField::FeatherColors,
                ClothingField::BodyPaintColors,
            ] {
                let path = FieldPath::Clothing(category, field);
                if field.is_list() {
                    if let Some(values) = self.list_mut(&path) {
                        for value in values.iter_mut() {
                            visit(&path, value);
                        }
                    }
                } else {
                    scalar(self, path, &mut visit);
                }
            }
        }
        for field in [
            FootwearField::Type,
            FootwearField::Material,
            FootwearField::Color,
        ] {
            scalar(self, FieldPath::Footwear(field), &mut visit);
        }
        for slot in AccessorySlot::ALL {
            for field in [AccessoryField::Type, AccessoryField::Material] {
                scalar(self, FieldPath::Accessory(slot, field), &mut visit);
            }
        }
        scalar(self, FieldPath::Pose, &mut visit);
        for value in self.pose_detail.iter_mut() {
            visit(&FieldPath::PoseDetail, value);
        }
        scalar(self, FieldPath::Lighting, &mut visit);
        scalar(self, FieldPath::Background, &mut visit);
    }
}
