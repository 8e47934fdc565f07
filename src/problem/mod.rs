// Program wide presentation of diagnostics and errors

mod format;

// Re-export all public symbols
pub use format::*;
