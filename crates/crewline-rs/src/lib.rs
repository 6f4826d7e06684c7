//! Public SDK surface for Crewline.
//!
//! This crate re-exports the core building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use crewline_rs_config as config;
/// Re-export for convenience.
pub use crewline_rs_knowledge as knowledge;
/// Re-export for convenience.
pub use crewline_rs_llm as llm;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
