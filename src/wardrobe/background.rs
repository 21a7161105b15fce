use rand::Rng;

use crate::catalog::ClothingCategory;
use crate::wardrobe::selections::WardrobeSelections;

type Table = &'static [(&'static str, &'static [&'static str])];

const TRADITIONAL_BACKGROUNDS: Table = &[
    (
        "Plains Nations",
        &[
            "a vast, open prairie at sunset with rolling hills",
            "a tipi village on the Great Plains under a wide-open sky",
        ],
    ),
    (
        "Kayapo",
        &[
            "a traditional village clearing in the Amazon rainforest",
            "beside a winding river in the heart of the jungle",
        ],
    ),
    (
        "Japanese Kimono",
        &[
            "a tranquil japanese garden with a koi pond",
            "a traditional Japanese tea house",
            "a street in Kyoto during cherry blossom season",
        ],
    ),
    (
        "Indian Sari",
        &[
            "the steps of a grand Indian palace",
            "a bustling market in Delhi",
            "in front of the Taj Mahal at sunrise",
        ],
    ),
    (
        "Scottish Highland Dress",
        &[
            "the misty Scottish Highlands with rolling green hills",
            "in front of a historic Scottish castle like Eilean Donan",
            "a traditional Highland Games event",
        ],
    ),
    (
        "Maasai",
        &[
            "the Maasai Mara savanna at sunrise with acacia trees",
            "a traditional Maasai village (Kraal) with mud huts",
            "observing wildlife on the Serengeti plains",
        ],
    ),
    (
        "South Korean Hanbok",
        &[
            "the courtyard of Gyeongbok Palace in Seoul",
            "a traditional Hanok village with curved tile roofs",
            "a serene bamboo forest",
        ],
    ),
    (
        "Vietnamese Áo Dài",
        &[
            "a street in the Old Quarter of Hanoi with bustling cyclos",
            "floating down the Mekong Delta on a sampan boat",
            "the ancient town of Hoi An with its colorful lanterns",
        ],
    ),
    (
        "Andean",
        &[
            "the ancient ruins of Machu Picchu at dawn",
            "the streets of Cusco, Peru with Inca stonework",
            "the salt flats of Salar de Uyuni, Bolivia",
        ],
    ),
];

const POSE_DETAIL_BACKGROUNDS: Table = &[
    (
        "with arms crossed",
        &[
            "a dark, gritty urban alleyway with moody lighting",
            "a rooftop overlooking a city at night",
        ],
    ),
    (
        "meditating peacefully",
        &[
            "a tranquil Japanese garden with a koi pond",
            "a serene temple interior",
            "a secluded waterfall oasis",
        ],
    ),
    (
        "leaning against a wall",
        &[
            "a gritty brick wall in an urban alley",
            "the exterior of a modern art gallery",
        ],
    ),
    (
        "sprinting",
        &[
            "an olympic running track",
            "escaping down a futuristic spaceship corridor",
        ],
    ),
    (
        "twirling",
        &[
            "an opulent ballroom with crystal chandeliers",
            "an open field of wildflowers",
        ],
    ),
    (
        "looking up",
        &[
            "the base of a towering skyscraper",
            "stargazing in a clear night sky",
            "looking up at a cathedral ceiling",
        ],
    ),
];

const BATCAVE_CITY: &[&str] = &[
    "a dark, gritty urban alleyway with moody lighting",
    "a rooftop overlooking a gothic city at night",
];
const GYM: &[&str] = &["a modern gym", "a yoga studio"];
const METROPOLIS_SKY: &[&str] = &["the sky above a metropolis"];

const CLOTHING_BACKGROUNDS: Table = &[
    ("ball gown", &["an opulent ballroom with crystal chandeliers"]),
    ("jumpsuit", &["a rooftop party at sunset", "a modern art gallery"]),
    (
        "business suit",
        &["a professional office setting", "a modern skyscraper lobby"],
    ),
    (
        "tuxedo",
        &["a grand ballroom with ornate decor", "a red carpet event"],
    ),
    (
        "tracksuit",
        &["a city park running track", "an urban basketball court"],
    ),
    ("sports bra", GYM),
    ("activewear leggings", GYM),
    (
        "pajama set",
        &[
            "a luxurious bedroom with silk sheets",
            "a cozy living room with a fireplace",
        ],
    ),
    ("nightgown", &["a luxurious bedroom with silk sheets"]),
    ("superman", METROPOLIS_SKY),
    ("supergirl", METROPOLIS_SKY),
    ("batman", BATCAVE_CITY),
    ("batgirl", BATCAVE_CITY),
    ("wonder woman", &["the ruins of an ancient Greek temple"]),
    (
        "darth vader",
        &["the command bridge of a futuristic spaceship"],
    ),
    (
        "loki",
        &["a grand, historic church", "a mischievous magical forest"],
    ),
    (
        "maleficent",
        &[
            "an enchanted, magical forest at twilight",
            "a dark throne room in a gothic castle",
        ],
    ),
    (
        "rags",
        &[
            "a dark and moody gothic dungeon with stone walls and chains",
            "a dark, oppressive prison cell with a single barred window",
            "a crumbling castle crypt filled with cobwebs",
        ],
    ),
    (
        "tunic",
        &[
            "an ancient, moss-covered dungeon corridor lit by torches",
            "an enchanted, magical forest at twilight",
        ],
    ),
    (
        "prisoner",
        &[
            "a dark, oppressive prison cell with a single barred window",
            "a torture chamber with ominous devices in the shadows",
            "a dark, damp underground sewer tunnel",
        ],
    ),
];

const POSE_BACKGROUNDS: Table = &[
    (
        "standing",
        &[
            "a minimalist urban backdrop",
            "a professional office setting",
            "a bustling city street during golden hour",
        ],
    ),
    (
        "sitting",
        &[
            "an elegant lounge with a plush armchair",
            "a cozy cafe",
            "a park bench in autumn",
        ],
    ),
    (
        "lying down",
        &[
            "a luxurious bedroom with silk sheets",
            "a sun-drenched beach",
            "a plush rug in front of a fireplace",
            "a modern hotel bathroom by a large bathtub",
        ],
    ),
    (
        "kneeling",
        &[
            "a serene garden",
            "a grand, historic church",
            "the stone floor of a dark dungeon",
        ],
    ),
    (
        "running",
        &[
            "a city park running track",
            "a scenic coastal path",
            "a dark alleyway at night",
        ],
    ),
    (
        "jumping",
        &[
            "an open field with a clear blue sky",
            "a music festival crowd",
            "a vibrant, graffiti-covered skatepark",
        ],
    ),
    (
        "dancing",
        &[
            "a grand ballroom with ornate decor",
            "a vibrant nightclub with neon lights",
            "a rooftop party at sunset",
        ],
    ),
    (
        "walking",
        &[
            "a bustling city street during golden hour",
            "a quiet forest trail",
            "a futuristic cyberpunk city street",
        ],
    ),
];

/// Clothing categories whose type can imply a setting.
const SCENE_SETTING_CATEGORIES: [ClothingCategory; 5] = [
    ClothingCategory::OnePiece,
    ClothingCategory::Suits,
    ClothingCategory::Activewear,
    ClothingCategory::Sleepwear,
    ClothingCategory::Fantasy,
];

fn lookup(table: Table, key: &str) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, backgrounds)| *backgrounds)
}

/// Which association table produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundTier {
    Traditional,
    PoseDetail,
    Clothing,
    Pose,
}

/// Chooses one entry out of a non-empty candidate list.
pub trait CandidatePicker {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice using the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl CandidatePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidatePicker;

impl CandidatePicker for FirstCandidatePicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Always the same index, clamped to the list.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl CandidatePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Matched tier and its full candidate pool, in table order. Pooled tiers
/// may repeat a background when two keys share it.
pub fn suggest_background_candidates(
    selections: &WardrobeSelections,
) -> Option<(BackgroundTier, Vec<&'static str>)> {
    let traditional_type = selections.clothing.traditional.item_type.as_str();
    if !traditional_type.is_empty() {
        if let Some((_, backgrounds)) = TRADITIONAL_BACKGROUNDS
            .iter()
            .find(|(culture, _)| traditional_type.contains(culture))
        {
            return Some((BackgroundTier::Traditional, backgrounds.to_vec()));
        }
    }

    let from_details: Vec<&'static str> = selections
        .pose_detail
        .iter()
        .filter_map(|detail| lookup(POSE_DETAIL_BACKGROUNDS, detail))
        .flatten()
        .copied()
        .collect();
    if !from_details.is_empty() {
        return Some((BackgroundTier::PoseDetail, from_details));
    }

    let mut from_clothing = Vec::new();
    for category in SCENE_SETTING_CATEGORIES {
        let item_type = selections.clothing.get(category).item_type.to_lowercase();
        if item_type.is_empty() {
            continue;
        }
        for (keyword, backgrounds) in CLOTHING_BACKGROUNDS {
            if item_type.contains(keyword) {
                from_clothing.extend_from_slice(backgrounds);
            }
        }
    }
    if !from_clothing.is_empty() {
        return Some((BackgroundTier::Clothing, from_clothing));
    }

    lookup(POSE_BACKGROUNDS, &selections.pose)
        .map(|backgrounds| (BackgroundTier::Pose, backgrounds.to_vec()))
}

pub fn suggest_background(
    selections: &WardrobeSelections,
    picker: &dyn CandidatePicker,
) -> Option<String> {
    let (_, candidates) = suggest_background_candidates(selections)?;
    let index = picker.pick(candidates.len());
    candidates.get(index).map(|background| background.to_string())
}
