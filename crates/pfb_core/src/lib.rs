//! PFB Core - Backend logic for the posture feedback pipeline
//!
//! This crate contains all business logic with zero UI dependencies:
//! frame capture, remote inference submission, result correlation, and
//! skeleton overlay rendering. It can be used by a GUI application or
//! the bundled CLI tool.

pub mod capture;
pub mod config;
pub mod correlate;
pub mod inference;
pub mod logging;
pub mod models;
pub mod overlay;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
