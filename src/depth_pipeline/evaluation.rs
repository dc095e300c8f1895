//! Dataset conventions shared by replay and offline evaluation

pub mod manifest;
pub mod preset;

pub use manifest::DatasetManifest;
pub use preset::DatasetPreset;
