//! # currency-input
//!
//! Currency formatting engine for text input fields.
//!
//! Attached to a host text field, the engine keeps the display formatted as
//! a currency amount while the user types, parses it back to a decimal
//! value, and strips decorations while the field has focus so editing is
//! not disturbed by symbols and separators.
//!
//! ## Architecture
//!
//! - **core**: Options, locale and currency tables, derived format, errors
//! - **format**: Rendering values and parsing display strings
//! - **mask**: Positional input masks and the conformer seam
//! - **controller**: Field bindings and the event-driven controller
//! - **simulation**: In-memory host field and typing sessions

pub mod controller;
pub mod core;
pub mod format;
pub mod mask;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::controller::engine::{CurrencyInput, DeferredRender};
    pub use crate::controller::field::{FieldContainer, FieldEvent, FieldId, TextField};
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::error::{AttachError, OptionsError};
    pub use crate::core::format_spec::FormatSpec;
    pub use crate::core::options::{
        CurrencyInputOptions, CurrencyOption, DistractionFree, DistractionFreeRules, Precision,
        ValueRange,
    };
    pub use crate::format::number::{format_value, parse};
    pub use crate::simulation::memory_field::{MemoryContainer, MemoryField};
}
