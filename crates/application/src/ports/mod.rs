//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod inference_port;
mod voice_port;

#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult};
#[cfg(test)]
pub use voice_port::{MockVoiceInputPort, MockVoiceOutputPort};
pub use voice_port::{ListenOutcome, VoiceInputPort, VoiceOutputPort};
