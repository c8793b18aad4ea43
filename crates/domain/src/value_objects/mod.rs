//! Value Objects - Immutable, identity-less domain primitives

mod generation_params;

pub use generation_params::GenerationParams;
