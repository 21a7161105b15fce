pub mod gemini;
pub mod media;

pub use gemini::{
    describe_image, detect_gender, edit_image, translate_to_english, try_on, GeneratedImage,
    GenerationError,
};
pub use media::{load_image, LoadedImage, MediaError};
