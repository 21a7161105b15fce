use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::AccessorySlot;
use crate::wardrobe::selections::{
    AccessoryField, ClothingField, FieldPath, FootwearField, HairField, WardrobeSelections,
};

const POSE_DETAILS_KEY: &str = "poseDetailsByPose";
const POSE_DETAILS_SCOPE: &str = "/poseDetailsByPose";

/// Localized-to-canonical value lookup derived from two parallel catalogs.
///
/// Two views are kept. The flat view maps any localized value to its
/// canonical counterpart regardless of where it appears; a few localized
/// words are shared by unrelated options, so the later registration wins
/// there. The scoped view keys every value by the option list it belongs to,
/// which is what selection translation uses first.
#[derive(Debug, Clone, Default)]
pub struct TranslationMap {
    flat: HashMap<String, String>,
    scoped: HashMap<String, HashMap<String, String>>,
}

fn group_segment(item: &Value) -> String {
    match item {
        Value::Object(fields) if !fields.contains_key("value") => fields
            .get("id")
            .and_then(Value::as_str)
            .map(|id| format!("/{id}"))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn option_lists(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

impl TranslationMap {
    pub fn build(canonical: &Value, localized: &Value) -> Self {
        let mut map = TranslationMap::default();
        map.walk(canonical, localized, "");
        map.walk_pose_details(canonical, localized);
        debug!(
            flat = map.flat.len(),
            scopes = map.scoped.len(),
            "Built catalog translation map"
        );
        map
    }

    fn register(&mut self, scope: &str, canonical: &str, localized: &str) {
        if canonical.is_empty() || localized.is_empty() {
            return;
        }
        self.scoped
            .entry(scope.to_string())
            .or_default()
            .insert(localized.to_string(), canonical.to_string());
        if canonical != localized {
            self.flat.insert(localized.to_string(), canonical.to_string());
        }
    }

    fn walk(&mut self, canonical: &Value, localized: &Value, scope: &str) {
        match (canonical, localized) {
            (Value::Object(a), Value::Object(b)) => {
                if let (Some(Value::String(a_value)), Some(Value::String(b_value))) =
                    (a.get("value"), b.get("value"))
                {
                    self.register(scope, a_value, b_value);
                }
                for (key, a_child) in a {
                    if matches!(key.as_str(), "value" | "label" | "id") {
                        continue;
                    }
                    if scope.is_empty() && key == POSE_DETAILS_KEY {
                        continue;
                    }
                    if let Some(b_child) = b.get(key) {
                        self.walk(a_child, b_child, &format!("{scope}/{key}"));
                    }
                }
            }
            (Value::Array(a), Value::Array(b)) => {
                for (a_item, b_item) in a.iter().zip(b) {
                    let child_scope = format!("{scope}{}", group_segment(a_item));
                    self.walk(a_item, b_item, &child_scope);
                }
            }
            _ => {}
        }
    }

    /// Pose details are keyed by pose, so the two sides are paired through
    /// the pose option lists, which share their order. Each side's key is the
    /// pose's stable id when it has one, its localized value otherwise.
    fn walk_pose_details(&mut self, canonical: &Value, localized: &Value) {
        let (Some(a_poses), Some(b_poses)) = (
            canonical.get("poseOptions").and_then(Value::as_array),
            localized.get("poseOptions").and_then(Value::as_array),
        ) else {
            return;
        };
        let (Some(a_details), Some(b_details)) = (
            canonical.get(POSE_DETAILS_KEY).and_then(option_lists),
            localized.get(POSE_DETAILS_KEY).and_then(option_lists),
        ) else {
            return;
        };

        let detail_key = |pose: &Value| -> Option<String> {
            pose.get("id")
                .and_then(Value::as_str)
                .or_else(|| pose.get("value").and_then(Value::as_str))
                .filter(|key| !key.is_empty())
                .map(str::to_string)
        };

        for (a_pose, b_pose) in a_poses.iter().zip(b_poses) {
            let (Some(a_key), Some(b_key)) = (detail_key(a_pose), detail_key(b_pose)) else {
                continue;
            };
            if let (Some(a_list), Some(b_list)) = (a_details.get(&a_key), b_details.get(&b_key)) {
                self.walk(a_list, b_list, POSE_DETAILS_SCOPE);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Canonical value for `value`, or `value` itself when it is unknown.
    pub fn translate<'a>(&'a self, value: &'a str) -> &'a str {
        self.flat.get(value).map(String::as_str).unwrap_or(value)
    }

    pub fn translate_in<'a>(&'a self, scope: &str, value: &'a str) -> &'a str {
        self.scoped
            .get(scope)
            .and_then(|entries| entries.get(value))
            .map(String::as_str)
            .unwrap_or_else(|| self.translate(value))
    }

    /// Canonical copy of `selections`. Free-text fields are left exactly as
    /// entered; they are translated separately by the text model.
    pub fn translate_selections(&self, selections: &WardrobeSelections) -> WardrobeSelections {
        let mut translated = selections.clone();
        translated.for_each_catalog_value_mut(|path, value| {
            if value.is_empty() {
                return;
            }
            let canonical = self.translate_in(&scope_for(path), value).to_string();
            *value = canonical;
        });
        translated
    }
}

/// Catalog option list a selection field draws its values from.
pub fn scope_for(path: &FieldPath) -> String {
    match path {
        FieldPath::VisualStyle => "/visualStyleOptions".to_string(),
        FieldPath::ImageStyle => "/imageStyleOptions".to_string(),
        FieldPath::Decade => "/decadeOptions".to_string(),
        FieldPath::ThemeCostume => "/decadeOptions/costumes".to_string(),
        FieldPath::Hair(field) => {
            let id = match field {
                HairField::Length => "length",
                HairField::Style => "style",
                HairField::Color => "color",
            };
            format!("/hairOptions/{id}/options")
        }
        FieldPath::Clothing(category, field) => {
            let list = match field {
                ClothingField::Type => "types",
                ClothingField::Style => "types/styles",
                ClothingField::Fabric => "fabrics",
                ClothingField::Color => "colors",
                ClothingField::Pattern => "patterns",
                ClothingField::Headwear => "headwear",
                ClothingField::Top => "tops",
                ClothingField::Bottom => "bottoms",
                ClothingField::FeatherColors => "featherColors",
                ClothingField::BodyPaintColors => "bodyPaintColors",
            };
            format!("/clothingOptions/{}/options/{list}", category.key())
        }
        FieldPath::Footwear(field) => match field {
            FootwearField::Type => "/footwearOptions/types".to_string(),
            FootwearField::Material => "/footwearOptions/types/materials".to_string(),
            FootwearField::Color => "/footwearOptions/types/colors".to_string(),
        },
        FieldPath::Accessory(slot, field) => accessory_scope(*slot, *field),
        FieldPath::Pose => "/poseOptions".to_string(),
        FieldPath::PoseDetail => POSE_DETAILS_SCOPE.to_string(),
        FieldPath::Lighting => "/lightingOptions".to_string(),
        FieldPath::Background => "/backgroundOptions".to_string(),
        FieldPath::ImageAge | FieldPath::FineTuning => String::new(),
    }
}

fn accessory_scope(slot: AccessorySlot, field: AccessoryField) -> String {
    let id = match field {
        AccessoryField::Type => "type",
        AccessoryField::Material => "material",
    };
    format!("/accessoriesOptions/{}/options/{id}/options", slot.key())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftKind {
    MissingInLocalized,
    MissingInCanonical,
    LengthMismatch { canonical: usize, localized: usize },
    KindMismatch,
    IdMismatch { canonical: String, localized: String },
}

/// One structural difference between the canonical and a localized catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDrift {
    pub path: String,
    pub kind: DriftKind,
}

impl fmt::Display for CatalogDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            DriftKind::MissingInLocalized => write!(f, "{path}: missing in localized catalog"),
            DriftKind::MissingInCanonical => write!(f, "{path}: missing in canonical catalog"),
            DriftKind::LengthMismatch {
                canonical,
                localized,
            } => write!(
                f,
                "{path}: {canonical} canonical entries vs {localized} localized"
            ),
            DriftKind::KindMismatch => write!(f, "{path}: value kinds differ"),
            DriftKind::IdMismatch {
                canonical,
                localized,
            } => write!(f, "{path}: id '{canonical}' vs '{localized}'"),
        }
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

/// Lists every place where the two trees stop being parallel. Labels and
/// values may differ freely; keys, list lengths, value kinds and ids may not.
pub fn check_isomorphism(canonical: &Value, localized: &Value) -> Vec<CatalogDrift> {
    let mut drift = Vec::new();
    compare(canonical, localized, String::new(), &mut drift);
    drift
}

fn compare(canonical: &Value, localized: &Value, path: String, drift: &mut Vec<CatalogDrift>) {
    if !same_kind(canonical, localized) {
        drift.push(CatalogDrift {
            path,
            kind: DriftKind::KindMismatch,
        });
        return;
    }

    match (canonical, localized) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, a_child) in a {
                let child_path = format!("{path}/{key}");
                match b.get(key) {
                    Some(b_child) if key == "id" => {
                        if a_child != b_child {
                            drift.push(CatalogDrift {
                                path: child_path,
                                kind: DriftKind::IdMismatch {
                                    canonical: a_child.as_str().unwrap_or_default().to_string(),
                                    localized: b_child.as_str().unwrap_or_default().to_string(),
                                },
                            });
                        }
                    }
                    Some(b_child) => compare(a_child, b_child, child_path, drift),
                    None => drift.push(CatalogDrift {
                        path: child_path,
                        kind: DriftKind::MissingInLocalized,
                    }),
                }
            }
            for key in b.keys().filter(|key| !a.contains_key(*key)) {
                drift.push(CatalogDrift {
                    path: format!("{path}/{key}"),
                    kind: DriftKind::MissingInCanonical,
                });
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                drift.push(CatalogDrift {
                    path: path.clone(),
                    kind: DriftKind::LengthMismatch {
                        canonical: a.len(),
                        localized: b.len(),
                    },
                });
            }
            for (index, (a_item, b_item)) in a.iter().zip(b).enumerate() {
                compare(a_item, b_item, format!("{path}/{index}"), drift);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::{CatalogSet, ClothingCategory, Locale};

    fn sample_pair() -> (Value, Value) {
        let en = json!({
            "colors": [
                { "label": "Black", "value": "black" },
                { "label": "Navy", "value": "navy" }
            ],
            "patterns": [{ "label": "Plain", "value": "plain" }],
            "poseOptions": [
                { "id": "standing", "label": "Standing", "value": "standing" },
                { "id": "sitting", "label": "Sitting", "value": "sitting" }
            ],
            "poseDetailsByPose": {
                "standing": [{ "label": "Arms Crossed", "value": "with arms crossed" }],
                "sitting": [{ "label": "Legs Crossed", "value": "with legs crossed" }]
            }
        });
        let pt = json!({
            "colors": [
                { "label": "Preto", "value": "preto" },
                { "label": "Azul", "value": "azul marinho" }
            ],
            "patterns": [{ "label": "Liso", "value": "liso" }],
            "poseOptions": [
                { "id": "standing", "label": "Em pé", "value": "em pé" },
                { "id": "sitting", "label": "Sentado", "value": "sentado" }
            ],
            "poseDetailsByPose": {
                "standing": [{ "label": "Braços Cruzados", "value": "com os braços cruzados" }],
                "sitting": [{ "label": "Pernas Cruzadas", "value": "com as pernas cruzadas" }]
            }
        });
        (en, pt)
    }

    #[test]
    fn maps_parallel_leaves_and_leaves_unknown_values_alone() {
        let (en, pt) = sample_pair();
        let map = TranslationMap::build(&en, &pt);
        assert_eq!(map.translate("preto"), "black");
        assert_eq!(map.translate("azul marinho"), "navy");
        assert_eq!(map.translate("em pé"), "standing");
        assert_eq!(map.translate("com as pernas cruzadas"), "with legs crossed");
        assert_eq!(map.translate("roxo"), "roxo");
    }

    #[test]
    fn legacy_pose_details_keyed_by_localized_value_are_paired_positionally() {
        let en = json!({
            "poseOptions": [{ "label": "Kneeling", "value": "kneeling" }],
            "poseDetailsByPose": { "kneeling": [{ "label": "Praying", "value": "praying" }] }
        });
        let pt = json!({
            "poseOptions": [{ "label": "Ajoelhado", "value": "ajoelhado" }],
            "poseDetailsByPose": { "ajoelhado": [{ "label": "Rezando", "value": "rezando" }] }
        });
        let map = TranslationMap::build(&en, &pt);
        assert_eq!(map.translate("rezando"), "praying");
        assert_eq!(map.translate("ajoelhado"), "kneeling");
    }

    #[test]
    fn extra_localized_nodes_are_skipped_by_the_builder() {
        let en = json!({ "colors": [{ "label": "Red", "value": "red" }] });
        let pt = json!({
            "colors": [
                { "label": "Vermelho", "value": "vermelho" },
                { "label": "Rosa", "value": "rosa" }
            ],
            "extra": [{ "label": "X", "value": "x" }]
        });
        let map = TranslationMap::build(&en, &pt);
        assert_eq!(map.len(), 1);
        assert_eq!(map.translate("rosa"), "rosa");
    }

    #[test]
    fn isomorphism_check_reports_each_kind_of_drift() {
        let (en, mut pt) = sample_pair();
        assert!(check_isomorphism(&en, &pt).is_empty());

        pt["colors"].as_array_mut().unwrap().pop();
        pt["poseOptions"][1]["id"] = json!("seated");
        pt["patterns"] = json!({ "label": "Liso" });
        pt["lighting"] = json!([]);

        let drift = check_isomorphism(&en, &pt);
        let kinds: Vec<_> = drift.iter().map(|d| (d.path.as_str(), &d.kind)).collect();
        assert!(kinds.contains(&(
            "/colors",
            &DriftKind::LengthMismatch {
                canonical: 2,
                localized: 1
            }
        )));
        assert!(kinds.contains(&("/patterns", &DriftKind::KindMismatch)));
        assert!(kinds.contains(&("/lighting", &DriftKind::MissingInCanonical)));
        assert!(drift
            .iter()
            .any(|d| d.path == "/poseOptions/1/id" && matches!(d.kind, DriftKind::IdMismatch { .. })));
    }

    #[test]
    fn shared_localized_words_resolve_by_field() {
        let set = CatalogSet::load().expect("embedded catalogs");
        let map = set.translation();
        let pt = set.catalog(Locale::Pt).options();
        let en = set.catalog(Locale::En).options();

        // A localized value reused by two different options resolves per list.
        for (index, pt_pattern) in pt.clothing_options.tops.options.patterns.iter().enumerate() {
            let path = FieldPath::Clothing(ClothingCategory::Tops, ClothingField::Pattern);
            assert_eq!(
                map.translate_in(&scope_for(&path), &pt_pattern.value),
                en.clothing_options.tops.options.patterns[index].value
            );
        }
    }

    #[test]
    fn fully_localized_selections_become_canonical_except_free_text() {
        let set = CatalogSet::load().expect("embedded catalogs");
        let pt = set.catalog(Locale::Pt).options();
        let en = set.catalog(Locale::En).options();
        let tops_pt = &pt.clothing_options.tops.options;
        let tops_en = &en.clothing_options.tops.options;

        let mut selections = WardrobeSelections::default();
        selections.hair.color = pt.hair_options[2].options[0].value.clone();
        selections.clothing.tops.item_type = tops_pt.types[0].value.clone();
        selections.clothing.tops.style = vec![tops_pt.types[0].styles[1].value.clone()];
        selections.clothing.tops.color = tops_pt.colors[0].value.clone();
        selections.pose = pt.pose_options[0].value.clone();
        selections.pose_detail = vec![pt.pose_details_by_pose["standing"][1].value.clone()];
        selections.decade = pt.decade_options[0].value.clone();
        selections.fine_tuning = "deixe o cabelo molhado".to_string();
        selections.image_style.age = "idosa".to_string();

        let translated = set.translation().translate_selections(&selections);
        assert_eq!(translated.hair.color, en.hair_options[2].options[0].value);
        assert_eq!(translated.clothing.tops.item_type, tops_en.types[0].value);
        assert_eq!(translated.clothing.tops.style, vec![tops_en.types[0].styles[1].value.clone()]);
        assert_eq!(translated.clothing.tops.color, tops_en.colors[0].value);
        assert_eq!(translated.pose, "standing");
        assert_eq!(
            translated.pose_detail,
            vec![en.pose_details_by_pose["standing"][1].value.clone()]
        );
        assert_eq!(translated.decade, "current");
        assert_eq!(translated.fine_tuning, "deixe o cabelo molhado");
        assert_eq!(translated.image_style.age, "idosa");
    }

    #[test]
    fn every_localized_option_maps_to_its_parallel_canonical_value() {
        let set = CatalogSet::load().expect("embedded catalogs");
        let map = set.translation();
        let pt = set.catalog(Locale::Pt).options();
        let en = set.catalog(Locale::En).options();

        for category in ClothingCategory::ALL {
            let (Some(pt_garment), Some(en_garment)) = (
                set.catalog(Locale::Pt).garment(category),
                set.catalog(Locale::En).garment(category),
            ) else {
                continue;
            };
            for (pt_type, en_type) in pt_garment.options.types.iter().zip(&en_garment.options.types) {
                let type_path = FieldPath::Clothing(category, ClothingField::Type);
                assert_eq!(map.translate_in(&scope_for(&type_path), &pt_type.value), en_type.value);
                for (pt_style, en_style) in pt_type.styles.iter().zip(&en_type.styles) {
                    let style_path = FieldPath::Clothing(category, ClothingField::Style);
                    assert_eq!(
                        map.translate_in(&scope_for(&style_path), &pt_style.value),
                        en_style.value,
                        "{category:?} style {}",
                        pt_style.value
                    );
                }
            }
        }

        for slot in AccessorySlot::ALL {
            let index = AccessorySlot::ALL.iter().position(|s| *s == slot).unwrap();
            let path = FieldPath::Accessory(slot, AccessoryField::Material);
            for (pt_option, en_option) in pt.accessories_options[index].options[1]
                .options
                .iter()
                .zip(&en.accessories_options[index].options[1].options)
            {
                assert_eq!(map.translate_in(&scope_for(&path), &pt_option.value), en_option.value);
            }
        }
    }
}
