//! Host-attributable fatal errors (SPEC_FULL.md §7).
//!
//! Distinct from `cc_state::ValidationError`: these abort the match with no
//! replay, rather than being recorded against a player and logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to initialize shared-memory region {name:?}: {message}")]
    SharedMemoryInit { name: String, message: String },

    #[error("path graph internal inconsistency: {0}")]
    PathGraphInconsistent(String),

    #[error("failed to write replay")]
    ReplayWrite(#[source] std::io::Error),
}
