use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::catalog::{AccessorySlot, ClothingCategory};
use crate::wardrobe::background::{suggest_background, CandidatePicker};
use crate::wardrobe::emptiness;
use crate::wardrobe::selections::{ClothingItem, WardrobeSelections};
use crate::wardrobe::strings as t;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("placeholder regex"));

const SENSITIVE_STRINGS: &[&str] = &[
    "thong",
    "garter",
    "bikini",
    "monokini",
    "bodysuit",
    "corset",
    "bustier",
    "lingerie",
    "stockings",
    "underwear",
    "bra",
    "panties",
    "sheer",
    "low-cut",
    "deep v-neck",
    "mini",
];

/// Dual-gender costume names and their (male, female) variants.
const GENDERED_COSTUMES: &[(&str, &str, &str)] = &[
    (
        "Superman or Supergirl costume",
        "Superman costume",
        "Supergirl costume",
    ),
    (
        "Batman or Batgirl costume",
        "Batman costume",
        "Batgirl costume",
    ),
    (
        "Spider-Man or Spider-Gwen costume",
        "Spider-Man costume",
        "Spider-Gwen costume",
    ),
    ("Iron Man or Rescue armor", "Iron Man armor", "Rescue armor"),
];

/// Sub-style relabels for the female variant of a costume, keyed by the
/// dual-gender costume name.
const FEMALE_STYLE_OVERRIDES: &[(&str, &str, &str)] = &[(
    "Batman or Batgirl costume",
    "classic 1960s (Adam West) style",
    "classic 1960s (Yvonne Craig) style",
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Uncertain,
}

impl Gender {
    /// Lenient parse of a model or user answer; anything unrecognized is
    /// `Uncertain`.
    pub fn parse(raw: &str) -> Self {
        let word = raw
            .trim()
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        match word.as_str() {
            "male" | "man" | "m" => Gender::Male,
            "female" | "woman" | "f" => Gender::Female,
            _ => Gender::Uncertain,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Uncertain => "Uncertain",
        };
        f.write_str(label)
    }
}

fn gendered_costume(name: &str, gender: Gender) -> Option<&'static str> {
    GENDERED_COSTUMES
        .iter()
        .find(|(dual, _, _)| *dual == name)
        .and_then(|(_, male, female)| match gender {
            Gender::Male => Some(*male),
            Gender::Female => Some(*female),
            Gender::Uncertain => None,
        })
}

fn placeholder_value(name: &str, gender: Gender) -> Option<&'static str> {
    match (name, gender) {
        ("gladiator_chest", Gender::Male) => Some("a bare, muscular chest"),
        ("gladiator_chest", Gender::Female) => {
            Some("a fitted leather chest wrap (strophium) covering the chest")
        }
        ("gladiator_chest", Gender::Uncertain) => Some("a leather chest harness"),
        _ => None,
    }
}

fn fill_placeholders(text: &str, gender: Gender) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            placeholder_value(&caps[1], gender)
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Swaps dual-gender names for the detected variant and fills gendered
/// placeholders. Female style overrides key on the name as selected.
fn disambiguate_gender(selections: &mut WardrobeSelections, gender: Gender) {
    let fantasy = &mut selections.clothing.fantasy;
    if gender == Gender::Female {
        for (costume, from, to) in FEMALE_STYLE_OVERRIDES {
            if fantasy.item_type == *costume || selections.theme_costume == *costume {
                for style in fantasy.style.iter_mut().filter(|style| style.as_str() == *from) {
                    *style = to.to_string();
                }
            }
        }
    }
    if let Some(name) = gendered_costume(&fantasy.item_type, gender) {
        fantasy.item_type = name.to_string();
    }
    if let Some(name) = gendered_costume(&selections.theme_costume, gender) {
        selections.theme_costume = name.to_string();
    }
    selections.theme_costume = fill_placeholders(&selections.theme_costume, gender);
}

fn sensitive_item_count(selections: &WardrobeSelections) -> usize {
    let mut selected = BTreeSet::new();
    for (_, item) in selections.clothing.iter() {
        if !item.item_type.is_empty() {
            selected.insert(item.item_type.to_lowercase());
        }
        for style in item.style.iter().filter(|style| !style.is_empty()) {
            selected.insert(style.to_lowercase());
        }
    }
    selected
        .iter()
        .filter(|item| SENSITIVE_STRINGS.iter().any(|word| item.contains(word)))
        .count()
}

fn push_if_set(parts: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        parts.push(value.to_string());
    }
}

fn push_made_of(parts: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        parts.push(format!("made of {value}"));
    }
}

fn garment_attributes(item: &ClothingItem) -> String {
    let mut parts = Vec::new();
    push_if_set(&mut parts, &item.item_type);
    parts.extend(item.style.iter().filter(|s| !s.is_empty()).cloned());
    push_made_of(&mut parts, &item.fabric);
    push_if_set(&mut parts, &item.color);
    push_if_set(&mut parts, &item.pattern);
    parts.join(", ")
}

fn traditional_attributes(item: &ClothingItem) -> String {
    if item.item_type.is_empty() {
        return String::new();
    }
    let mut parts = vec![item.item_type.clone()];
    push_if_set(&mut parts, &item.headwear);
    push_if_set(&mut parts, &item.top);
    push_if_set(&mut parts, &item.bottom);
    if !item.feather_colors.is_empty() {
        parts.push(format!("with {} feathers", item.feather_colors.join(" and ")));
    }
    if !item.body_paint_colors.is_empty() {
        parts.push(format!(
            "with {} body paint",
            item.body_paint_colors.join(" and ")
        ));
    }
    parts.join(", ")
}

fn has_full_outfit(selections: &WardrobeSelections) -> bool {
    let fantasy = &selections.clothing.fantasy.item_type;
    !selections.clothing.one_piece.item_type.is_empty()
        || !selections.clothing.suits.item_type.is_empty()
        || !selections.theme_costume.is_empty()
        || fantasy.contains("costume")
        || fantasy.contains("armor")
}

fn artistic_section(selections: &WardrobeSelections, parts: &mut Vec<String>) {
    let image_style = &selections.image_style;
    if selections.visual_style.is_empty()
        && image_style.style.is_empty()
        && image_style.age.is_empty()
    {
        parts.push(t::CRITICAL_INSTRUCTION.to_string());
        return;
    }

    parts.push(format!("\n## {}", t::MAIN_GOAL_ARTISTIC));
    let mut style = if selections.visual_style.is_empty() {
        t::ARTISTIC_STYLE_DEFAULT.to_string()
    } else {
        selections.visual_style.trim_end_matches('.').to_string()
    };
    if !image_style.style.is_empty() {
        style = format!("{style} in the style of {}", image_style.style);
    }
    let mut instruction = t::MAIN_GOAL_ARTISTIC_INSTRUCTION.replace("{style}", &style);
    if !image_style.age.is_empty() {
        let age = t::MAIN_GOAL_ARTISTIC_AGE_INSTRUCTION.replace("{age}", &image_style.age);
        instruction.push_str(&age);
    }
    parts.push(instruction);
    parts.push(format!("\n{}", t::DETAILED_TRANSFORMATION_RULES));
    parts.push(t::RULE_KEEP_POSE.to_string());
    parts.push(t::RULE_REINTERPRET.to_string());
    parts.push(t::RULE_APPLY_MODIFICATIONS.to_string());
}

fn decade_section(selections: &WardrobeSelections, parts: &mut Vec<String>) {
    let decade = selections.decade.as_str();
    if decade.is_empty() || decade == "current" {
        return;
    }
    let instruction = if !selections.theme_costume.is_empty() {
        t::DECADE_THEME_INSTRUCTION_WITH_COSTUME
            .replace("{decade}", decade)
            .replace("{costume}", &selections.theme_costume)
    } else if emptiness::is_empty(&selections.clothing) {
        t::DECADE_THEME_INSTRUCTION_NO_CLOTHES.replace("{decade}", decade)
    } else {
        t::DECADE_THEME_INSTRUCTION.replace("{decade}", decade)
    };
    parts.push(format!("- **{}:** {instruction}", t::DECADE_THEME));
}

fn clothing_sections(selections: &WardrobeSelections, parts: &mut Vec<String>) {
    let mut sections = Vec::new();
    for (category, item) in selections.clothing.iter() {
        let attributes = match category {
            ClothingCategory::Traditional => traditional_attributes(item),
            _ => garment_attributes(item),
        };
        if !attributes.is_empty() {
            sections.push(format!("### {}", t::clothing_title(category)));
            sections.push(format!("- {attributes}"));
        }
    }
    if sections.is_empty() {
        return;
    }
    if has_full_outfit(selections) {
        parts.push(format!("### {}", t::CLOTHING));
        parts.push(t::RULE_REMOVE_OUTFIT.to_string());
    }
    parts.extend(sections);
}

fn footwear_section(selections: &WardrobeSelections, parts: &mut Vec<String>) {
    let footwear = &selections.footwear;
    let mut attributes = Vec::new();
    push_if_set(&mut attributes, &footwear.item_type);
    push_made_of(&mut attributes, &footwear.material);
    push_if_set(&mut attributes, &footwear.color);
    if !attributes.is_empty() {
        parts.push(format!("### {}", t::FOOTWEAR));
        parts.push(format!("- {}", attributes.join(", ")));
    }
}

fn accessories_section(selections: &WardrobeSelections, parts: &mut Vec<String>) {
    let lines: Vec<String> = AccessorySlot::ALL
        .into_iter()
        .filter_map(|slot| {
            let choice = selections.accessories.get(slot);
            let mut attributes = Vec::new();
            push_if_set(&mut attributes, &choice.item_type);
            push_made_of(&mut attributes, &choice.material);
            (!attributes.is_empty()).then(|| {
                format!("- **{}:** {}", t::accessory_title(slot), attributes.join(", "))
            })
        })
        .collect();
    if !lines.is_empty() {
        parts.push(format!("### {}", t::ACCESSORIES));
        parts.extend(lines);
    }
}

fn scene_section(selections: &WardrobeSelections, background: &str, parts: &mut Vec<String>) {
    let pose = selections.pose.as_str();
    let details = selections.pose_detail.join(", ");

    if !pose.is_empty() && !background.is_empty() {
        let details_text = if details.is_empty() {
            String::new()
        } else {
            t::POSE_DETAILS_JOINER.replace("{details}", &details)
        };
        let instruction = t::FASHION_PHOTO_INSTRUCTION
            .replace("{pose}", pose)
            .replace("{poseDetailsText}", &details_text)
            .replace("{background}", background);
        parts.push(format!("\n### {}", t::FASHION_PHOTO_DIRECTION));
        parts.push(instruction);
        return;
    }

    if !pose.is_empty() {
        let mut instruction = t::POSE_INSTRUCTION.replace("{pose}", pose);
        if !details.is_empty() {
            instruction.push(' ');
            instruction.push_str(&t::POSE_DETAILS_INSTRUCTION.replace("{details}", &details));
        }
        parts.push(format!("### {}", t::POSE));
        parts.push(format!("- {instruction}"));
    }
    if !background.is_empty() {
        parts.push(format!("### {}", t::BACKGROUND));
        parts.push(format!(
            "- {}",
            t::BACKGROUND_INSTRUCTION.replace("{background}", background)
        ));
    }
}

/// Builds the editing instruction for canonical (English) selections. The
/// only nondeterminism is the suggested background, which goes through
/// `picker` when the user did not choose one.
pub fn compile_prompt(
    selections: &WardrobeSelections,
    gender: Gender,
    picker: &dyn CandidatePicker,
) -> String {
    let mut selections = selections.clone();
    disambiguate_gender(&mut selections, gender);

    let mut parts = vec![t::SAFETY_PREAMBLE.to_string()];

    match sensitive_item_count(&selections) {
        0 => {}
        1 => parts.push(t::SENSITIVE_CATEGORY_INSTRUCTION.to_string()),
        _ => parts.push(t::MULTIPLE_SENSITIVE_CATEGORIES_INSTRUCTION.to_string()),
    }
    if !selections.clothing.traditional.item_type.is_empty() {
        parts.push(t::CULTURAL_ATTIRE_INSTRUCTION.to_string());
    }

    artistic_section(&selections, &mut parts);

    parts.push(format!("\n{}", t::REQUESTED_MODIFICATIONS));
    parts.push(t::REQUESTED_MODIFICATIONS_INSTRUCTION.to_string());

    decade_section(&selections, &mut parts);

    let hair = &selections.hair;
    let mut hair_attributes = Vec::new();
    push_if_set(&mut hair_attributes, &hair.style);
    push_if_set(&mut hair_attributes, &hair.length);
    push_if_set(&mut hair_attributes, &hair.color);
    if !hair_attributes.is_empty() {
        parts.push(format!("### {}", t::HAIR));
        parts.push(format!("- {}", hair_attributes.join(", ")));
    }

    clothing_sections(&selections, &mut parts);
    footwear_section(&selections, &mut parts);
    accessories_section(&selections, &mut parts);

    let background = if selections.background.is_empty() {
        suggest_background(&selections, picker).unwrap_or_default()
    } else {
        selections.background.clone()
    };
    scene_section(&selections, &background, &mut parts);

    if !selections.lighting.is_empty() {
        parts.push(format!("### {}", t::LIGHTING));
        parts.push(format!(
            "- {}",
            t::LIGHTING_INSTRUCTION.replace("{lighting}", &selections.lighting)
        ));
    }

    if !selections.fine_tuning.is_empty() {
        parts.push(format!("### {}", t::ADDITIONAL_INSTRUCTIONS));
        parts.push(format!("- {}", selections.fine_tuning));
    }

    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wardrobe::background::{FirstCandidatePicker, FixedPicker, RandomPicker};

    fn scenario() -> WardrobeSelections {
        let mut selections = WardrobeSelections::default();
        selections.hair.color = "red".to_string();
        selections.clothing.tops.item_type = "T-shirt".to_string();
        selections.clothing.tops.color = "blue".to_string();
        selections.pose = "standing".to_string();
        selections
    }

    #[test]
    fn gender_parse_is_lenient() {
        assert_eq!(Gender::parse(" Female.\n"), Gender::Female);
        assert_eq!(Gender::parse("MALE"), Gender::Male);
        assert_eq!(Gender::parse("**Uncertain**"), Gender::Uncertain);
        assert_eq!(Gender::parse("it depends"), Gender::Uncertain);
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn simple_edit_compiles_every_expected_section() {
        let prompt = compile_prompt(&scenario(), Gender::Uncertain, &FirstCandidatePicker);

        assert!(prompt.starts_with(t::SAFETY_PREAMBLE));
        assert!(prompt.contains(t::CRITICAL_INSTRUCTION));
        assert!(!prompt.contains(t::MAIN_GOAL_ARTISTIC));
        assert!(prompt.contains("### Hair\n\n- red"));
        assert!(prompt.contains("### Tops\n\n- T-shirt, blue"));
        assert!(!prompt.contains(t::RULE_REMOVE_OUTFIT));
        assert!(prompt.contains("### Fashion Photo Direction"));
        assert!(prompt.contains("the person is standing, set in a minimalist urban backdrop."));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let mut selections = scenario();
        selections.decade = "1980s".to_string();
        selections.footwear.item_type = "sneakers".to_string();
        selections.accessories.head.item_type = "cap".to_string();
        selections.lighting = "soft studio light".to_string();
        selections.fine_tuning = "make it pop".to_string();

        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        let order = [
            t::SAFETY_PREAMBLE,
            t::CRITICAL_INSTRUCTION,
            t::REQUESTED_MODIFICATIONS,
            "**Decade / Theme:**",
            "### Hair",
            "### Tops",
            "### Footwear",
            "### Accessories",
            "### Fashion Photo Direction",
            "### Lighting",
            "### Additional Instructions",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("{needle} missing")))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(prompt.ends_with("### Additional Instructions\n\n- make it pop"));
        assert!(prompt.contains("- **Headwear:** cap"));
    }

    #[test]
    fn a_fixed_picker_makes_compilation_deterministic() {
        let selections = scenario();
        let first = compile_prompt(&selections, Gender::Male, &FixedPicker(1));
        let second = compile_prompt(&selections, Gender::Male, &FixedPicker(1));
        assert_eq!(first, second);
    }

    #[test]
    fn user_background_overrides_the_suggestion() {
        let mut selections = scenario();
        selections.background = "a snowy mountain".to_string();
        for _ in 0..10 {
            let prompt = compile_prompt(&selections, Gender::Uncertain, &RandomPicker);
            assert!(prompt.contains("set in a snowy mountain."));
        }
    }

    #[test]
    fn unmatched_pose_gets_its_own_section_with_details() {
        let mut selections = WardrobeSelections::default();
        selections.pose = "floating".to_string();
        selections.pose_detail = vec!["arms wide".to_string(), "eyes closed".to_string()];
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains(
            "### Pose\n\n- Change the person's pose to floating. Specifically: arms wide, eyes closed."
        ));
        assert!(!prompt.contains("### Background"));
        assert!(!prompt.contains("Fashion Photo Direction"));
    }

    #[test]
    fn background_without_pose_is_its_own_section() {
        let mut selections = WardrobeSelections::default();
        selections.background = "a neon-lit street".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains("### Background\n\n- Replace the background with a neon-lit street"));
    }

    #[test]
    fn pose_details_join_the_fashion_direction() {
        let mut selections = scenario();
        selections.pose_detail = vec!["with hands on hips".to_string()];
        selections.background = "a rooftop".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains("the person is standing, with hands on hips, set in a rooftop."));
    }

    #[test]
    fn one_sensitive_item_gets_the_mild_instruction_only() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.swimwear.item_type = "bikini".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains(t::SENSITIVE_CATEGORY_INSTRUCTION));
        assert!(!prompt.contains(t::MULTIPLE_SENSITIVE_CATEGORIES_INSTRUCTION));
    }

    #[test]
    fn several_sensitive_items_get_the_strong_instruction_only() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.underwear.item_type = "corset".to_string();
        selections.clothing.stockings.item_type = "Stockings".to_string();
        selections.clothing.stockings.style = vec!["sheer".to_string()];
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains(t::MULTIPLE_SENSITIVE_CATEGORIES_INSTRUCTION));
        assert!(!prompt.contains(t::SENSITIVE_CATEGORY_INSTRUCTION));
    }

    #[test]
    fn duplicate_sensitive_values_count_once() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.swimwear.item_type = "Bikini".to_string();
        selections.clothing.underwear.item_type = "bikini".to_string();
        assert_eq!(sensitive_item_count(&selections), 1);
    }

    #[test]
    fn remove_outfit_rule_precedes_all_clothing_sections_once() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.one_piece.item_type = "dress".to_string();
        selections.clothing.outerwear.item_type = "trench coat".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);

        assert_eq!(prompt.matches(t::RULE_REMOVE_OUTFIT).count(), 1);
        let rule = prompt.find(t::RULE_REMOVE_OUTFIT).unwrap();
        assert!(prompt.find("### Clothing").unwrap() < rule);
        assert!(rule < prompt.find("### One-Piece").unwrap());
        assert!(rule < prompt.find("### Outerwear").unwrap());
    }

    fn assert_single_rule_before_separates(prompt: &str) {
        assert_eq!(prompt.matches(t::RULE_REMOVE_OUTFIT).count(), 1);
        let rule = prompt.find(t::RULE_REMOVE_OUTFIT).unwrap();
        assert!(rule < prompt.find("### Tops").unwrap());
        assert!(rule < prompt.find("### Bottoms").unwrap());
    }

    #[test]
    fn a_suit_with_separates_gets_one_remove_outfit_rule() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.suits.item_type = "tuxedo".to_string();
        selections.clothing.tops.item_type = "T-shirt".to_string();
        selections.clothing.bottoms.item_type = "jeans".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);

        assert_single_rule_before_separates(&prompt);
        let rule = prompt.find(t::RULE_REMOVE_OUTFIT).unwrap();
        assert!(rule < prompt.find("### Suit / Formalwear").unwrap());
    }

    #[test]
    fn a_theme_costume_with_separates_gets_one_remove_outfit_rule() {
        let mut selections = WardrobeSelections::default();
        selections.decade = "1980s".to_string();
        selections.theme_costume = "an aerobics instructor outfit".to_string();
        selections.clothing.tops.item_type = "T-shirt".to_string();
        selections.clothing.bottoms.item_type = "jeans".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);

        assert_single_rule_before_separates(&prompt);
        assert!(prompt.contains("an aerobics instructor outfit"));
    }

    #[test]
    fn fantasy_armor_counts_as_a_full_outfit() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.fantasy.item_type = "knight armor".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains(t::RULE_REMOVE_OUTFIT));
    }

    #[test]
    fn dual_costumes_follow_detected_gender() {
        let mut selections = WardrobeSelections::default();
        selections.clothing.fantasy.item_type = "Batman or Batgirl costume".to_string();
        selections.clothing.fantasy.style = vec!["classic 1960s (Adam West) style".to_string()];

        let female = compile_prompt(&selections, Gender::Female, &FirstCandidatePicker);
        assert!(female.contains("- Batgirl costume, classic 1960s (Yvonne Craig) style"));

        let male = compile_prompt(&selections, Gender::Male, &FirstCandidatePicker);
        assert!(male.contains("- Batman costume, classic 1960s (Adam West) style"));

        let unknown = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(unknown.contains("- Batman or Batgirl costume, classic 1960s (Adam West) style"));
    }

    #[test]
    fn dual_theme_costumes_resolve_for_a_female_subject() {
        let mut selections = WardrobeSelections::default();
        selections.decade = "1960s".to_string();
        selections.theme_costume = "Batman or Batgirl costume".to_string();

        let prompt = compile_prompt(&selections, Gender::Female, &FirstCandidatePicker);
        assert!(prompt.contains("Batgirl costume"));
        assert!(!prompt.contains("Batman"));
        assert!(!prompt.contains("Batman or Batgirl"));
    }

    #[test]
    fn decade_wording_depends_on_costume_and_clothing() {
        let mut selections = WardrobeSelections::default();
        selections.decade = "1970s".to_string();
        let bare = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(bare.contains(&t::DECADE_THEME_INSTRUCTION_NO_CLOTHES.replace("{decade}", "1970s")));

        selections.clothing.bottoms.item_type = "flared jeans".to_string();
        let dressed = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(dressed.contains(&t::DECADE_THEME_INSTRUCTION.replace("{decade}", "1970s")));

        selections.decade = "current".to_string();
        let current = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(!current.contains(t::DECADE_THEME));
    }

    #[test]
    fn costume_placeholders_are_filled_for_the_gender() {
        let mut selections = WardrobeSelections::default();
        selections.decade = "Ancient Roman".to_string();
        selections.theme_costume =
            "Authentic gladiator gear: {{gladiator_chest}}, a subligaculum (loincloth)".to_string();

        let male = compile_prompt(&selections, Gender::Male, &FirstCandidatePicker);
        assert!(male.contains("Authentic gladiator gear: a bare, muscular chest, a subligaculum"));

        let female = compile_prompt(&selections, Gender::Female, &FirstCandidatePicker);
        assert!(female.contains(
            "Authentic gladiator gear: a fitted leather chest wrap (strophium) covering the chest, a subligaculum"
        ));
        assert!(!female.contains("a bare, muscular chest"));

        let neutral = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(neutral.contains("a leather chest harness"));
        assert!(!neutral.contains("{{"));
    }

    #[test]
    fn artistic_section_combines_style_filter_and_age() {
        let mut selections = WardrobeSelections::default();
        selections.image_style.style = "Studio Ghibli".to_string();
        selections.image_style.age = "a child".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);

        assert!(prompt.contains(&format!("## {}", t::MAIN_GOAL_ARTISTIC)));
        assert!(prompt.contains("as a new artistic style in the style of Studio Ghibli. The whole picture"));
        assert!(prompt.contains("Depict the person as a child"));
        assert!(prompt.contains(t::RULE_KEEP_POSE));
        assert!(prompt.contains(t::RULE_APPLY_MODIFICATIONS));
        assert!(!prompt.contains(t::CRITICAL_INSTRUCTION));
    }

    #[test]
    fn catalog_visual_styles_read_as_one_sentence() {
        let mut selections = WardrobeSelections::default();
        selections.visual_style = "A classical oil painting with rich textures.".to_string();
        selections.image_style.style = "Pixar animated movie style".to_string();
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);
        assert!(prompt.contains(
            "as A classical oil painting with rich textures in the style of Pixar animated movie style. The whole"
        ));
    }

    #[test]
    fn traditional_attire_lists_its_parts_and_asks_for_respect() {
        let mut selections = WardrobeSelections::default();
        let item = &mut selections.clothing.traditional;
        item.item_type = "Plains Nations Inspired (USA)".to_string();
        item.headwear = "feathered headdress".to_string();
        item.feather_colors = vec!["white".to_string(), "black".to_string()];
        item.body_paint_colors = vec!["red".to_string()];
        let prompt = compile_prompt(&selections, Gender::Uncertain, &FirstCandidatePicker);

        assert!(prompt.contains(t::CULTURAL_ATTIRE_INSTRUCTION));
        assert!(prompt.contains(
            "- Plains Nations Inspired (USA), feathered headdress, with white and black feathers, with red body paint"
        ));
    }

    #[test]
    fn empty_selections_still_produce_the_frame() {
        let prompt = compile_prompt(&WardrobeSelections::default(), Gender::Uncertain, &RandomPicker);
        assert!(prompt.starts_with(t::SAFETY_PREAMBLE));
        assert!(prompt.contains(t::REQUESTED_MODIFICATIONS_INSTRUCTION));
        assert!(!prompt.contains("###"));
    }
}
