pub mod binding;
pub mod caret;
pub mod engine;
pub mod field;
