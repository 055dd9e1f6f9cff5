//! Data Models
//!
//! Configuration and command response structures.

pub mod response;
pub mod settings;

pub use response::*;
pub use settings::*;
