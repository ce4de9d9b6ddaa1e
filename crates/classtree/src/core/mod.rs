//! Core abstractions shared by every pipeline stage
//!
//! Input and output types, configuration, error types, text helpers and
//! logging setup.

mod error;
pub mod logging;
mod source;
mod text;
mod types;

pub use error::*;
pub use logging::*;
pub use source::*;
pub use text::*;
pub use types::*;
