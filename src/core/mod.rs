pub mod currency;
pub mod error;
pub mod format_spec;
pub mod locale;
pub mod options;
