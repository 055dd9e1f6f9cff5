//! CLI Commands
//!
//! Handlers behind each subcommand. Every handler returns a
//! `CommandResponse` so `--json` output and text output share one shape.

pub mod capture;
pub mod health;
pub mod report;
pub mod scan;
pub mod settings;

pub use capture::*;
pub use health::*;
pub use report::*;
pub use scan::*;
pub use settings::*;
