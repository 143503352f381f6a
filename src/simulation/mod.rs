pub mod memory_field;
pub mod typing;
