//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (settings, record store, argument parsing)
//! - `forecast` - Run the engine and print or write the forecast table
//! - `impacts` - Impact list, matrix and validation
//! - `targets` - Target progress and forecast gap
//! - `status` - Status and config commands

pub mod common;
pub mod forecast;
pub mod impacts;
pub mod status;
pub mod targets;

// Re-export command functions for main.rs
pub use common::*;
pub use forecast::*;
pub use impacts::*;
pub use status::*;
pub use targets::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
