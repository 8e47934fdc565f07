pub mod language;
pub mod parsing;
