//! Speech provider implementations

pub mod command;
pub mod console;
pub mod openai;
pub mod recorder;
