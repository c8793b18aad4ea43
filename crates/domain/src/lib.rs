//! Domain layer for VoiceDesk
//!
//! Contains the conversation message model, generation parameters and domain errors.
//! This layer has no knowledge of providers, transports or I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
