//! Code generation module

mod artifact;
mod code_generator;
mod emitter;
mod naming;
mod type_mapper;

pub use artifact::*;
pub use code_generator::*;
pub use emitter::*;
pub use naming::*;
pub use type_mapper::*;
