//! Configuration module for schemagen

pub mod defaults;
mod options;
mod settings;

pub use options::{GenerationOptions, LayerPaths};
pub use settings::*;
