pub mod background;
pub mod emptiness;
pub mod prompt;
pub mod selections;
pub mod strings;
pub mod translation;

pub use background::{CandidatePicker, RandomPicker};
pub use prompt::{compile_prompt, Gender};
pub use selections::{FieldPath, SelectionError, WardrobeSelections};
pub use translation::TranslationMap;
