// Types representing deadline sections, checklist items and diagnostics

mod error;
mod types;

// Re-export all public symbols
pub use error::*;
pub use types::*;
