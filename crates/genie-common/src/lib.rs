//! Shared domain types for readme-genie.
//!
//! These types carry no I/O. They are shared between the pipeline, the
//! repository file source and the transports (HTTP server and CLI).

pub mod file;
pub mod request;

pub use file::FileRecord;
pub use request::{GenerationRequest, OutputSpec, OutputSpecError};
