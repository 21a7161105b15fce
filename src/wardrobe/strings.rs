//! Fixed English wording of the compiled prompt. Placeholders in braces are
//! filled by the compiler.

use crate::catalog::{AccessorySlot, ClothingCategory};

pub const SAFETY_PREAMBLE: &str = "You are a professional photo editor. Edit the provided photo of a real person. It is essential that you preserve the person's identity: keep their face, facial features, skin tone, body shape and proportions exactly as they are in the original photo. Do not change their ethnicity, age appearance or body type unless explicitly asked below.";

pub const SENSITIVE_CATEGORY_INSTRUCTION: &str = "The requested outfit includes an intimate or revealing garment. Render it tastefully, as it would appear in a mainstream fashion catalog, with no nudity and no sexualized posing.";

pub const MULTIPLE_SENSITIVE_CATEGORIES_INSTRUCTION: &str = "The requested outfit combines several intimate or revealing garments. Treat this as a professional fashion or swimwear catalog shoot: keep the result tasteful and non-explicit, ensure full coverage where the garments are designed to cover, avoid any nudity or sheer see-through effects on private areas, and keep the pose and expression neutral and non-sexual.";

pub const CULTURAL_ATTIRE_INSTRUCTION: &str = "The request includes culturally significant traditional attire. Depict it respectfully and authentically, as an appreciation of the culture it comes from, avoiding caricature, costume-party exaggeration or stereotypes.";

pub const MAIN_GOAL_ARTISTIC: &str = "Main Goal: Artistic Transformation";

pub const ARTISTIC_STYLE_DEFAULT: &str = "a new artistic style";

pub const MAIN_GOAL_ARTISTIC_INSTRUCTION: &str = "Completely re-render the entire image as {style}. The whole picture, including the person, their clothing and the background, must adopt this style.";

pub const MAIN_GOAL_ARTISTIC_AGE_INSTRUCTION: &str = " Depict the person as {age}, while keeping them recognizable.";

pub const DETAILED_TRANSFORMATION_RULES: &str = "Detailed Transformation Rules:";

pub const RULE_KEEP_POSE: &str = "1. Keep the person's original pose and the overall composition of the photo unless a new pose is requested below.";

pub const RULE_REINTERPRET: &str = "2. Reinterpret every element in the new style instead of pasting a filter over the photo.";

pub const RULE_APPLY_MODIFICATIONS: &str = "3. Apply all requested modifications below on top of the new artistic rendering.";

pub const CRITICAL_INSTRUCTION: &str = "CRITICAL INSTRUCTION: This is a realistic photo edit. Keep the photographic style of the original image and change only what is requested below. Do not reinterpret the image artistically.";

pub const REQUESTED_MODIFICATIONS: &str = "## Requested Modifications";

pub const REQUESTED_MODIFICATIONS_INSTRUCTION: &str = "Apply the following changes. Anything not mentioned must stay as it is in the original photo.";

pub const DECADE_THEME: &str = "Decade / Theme";

pub const DECADE_THEME_INSTRUCTION: &str = "Style the outfit and hair so they clearly evoke the {decade}.";

pub const DECADE_THEME_INSTRUCTION_NO_CLOTHES: &str = "Dress the person in a complete, iconic outfit from the {decade}, with matching hair and accessories.";

pub const DECADE_THEME_INSTRUCTION_WITH_COSTUME: &str = "Dress the person as {costume}, as it would have looked in the {decade}.";

pub const HAIR: &str = "Hair";

pub const CLOTHING: &str = "Clothing";

pub const RULE_REMOVE_OUTFIT: &str = "Important: first remove the person's current outfit completely, then dress them in the new clothing described below. Do not layer the new clothes over the old ones.";

pub const FOOTWEAR: &str = "Footwear";

pub const ACCESSORIES: &str = "Accessories";

pub const FASHION_PHOTO_DIRECTION: &str = "Fashion Photo Direction";

pub const FASHION_PHOTO_INSTRUCTION: &str = "Recompose the shot as a professional fashion photograph: the person is {pose}{poseDetailsText}, set in {background}. Adjust the body naturally to the new pose and blend the person seamlessly into the scene with consistent perspective, shadows and lighting.";

pub const POSE_DETAILS_JOINER: &str = ", {details}";

pub const POSE: &str = "Pose";

pub const POSE_INSTRUCTION: &str = "Change the person's pose to {pose}.";

pub const POSE_DETAILS_INSTRUCTION: &str = "Specifically: {details}.";

pub const BACKGROUND: &str = "Background";

pub const BACKGROUND_INSTRUCTION: &str = "Replace the background with {background}, matching perspective and lighting to the person.";

pub const LIGHTING: &str = "Lighting";

pub const LIGHTING_INSTRUCTION: &str = "Relight the scene with {lighting}.";

pub const ADDITIONAL_INSTRUCTIONS: &str = "Additional Instructions";

pub fn clothing_title(category: ClothingCategory) -> &'static str {
    match category {
        ClothingCategory::OnePiece => "One-Piece",
        ClothingCategory::Tops => "Tops",
        ClothingCategory::Bottoms => "Bottoms",
        ClothingCategory::Stockings => "Hosiery",
        ClothingCategory::Outerwear => "Outerwear",
        ClothingCategory::Suits => "Suit / Formalwear",
        ClothingCategory::Swimwear => "Swimwear",
        ClothingCategory::Activewear => "Activewear",
        ClothingCategory::Sleepwear => "Sleepwear / Loungewear",
        ClothingCategory::Underwear => "Underwear / Lingerie",
        ClothingCategory::Fantasy => "Fantasy & Costumes",
        ClothingCategory::Traditional => "Cultural & Traditional Attire",
    }
}

pub fn accessory_title(slot: AccessorySlot) -> &'static str {
    match slot {
        AccessorySlot::Head => "Headwear",
        AccessorySlot::Neck => "Neckwear",
        AccessorySlot::Ears => "Earrings",
        AccessorySlot::Wrists => "Wristwear",
        AccessorySlot::Hands => "Handwear",
        AccessorySlot::Fingers => "Rings",
        AccessorySlot::Waist => "Belts",
        AccessorySlot::Other => "Other",
    }
}
