pub mod audio;
pub mod layout;

pub use audio::AudioClip;
pub use layout::{Category, DatasetLayout, Split};
