//! Tool invocation: lookup, validation, prompting, completion, shaping

pub mod error;
pub mod service;

pub use error::DispatchError;
pub use service::{Invocation, OptionsView, ToolDispatcher, SAMPLING_TEMPERATURE};
