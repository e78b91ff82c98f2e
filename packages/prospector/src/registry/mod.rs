//! Attribute registry: per-site testers and processors.
//!
//! A site registers, for each attribute it knows, a tester deciding whether
//! an element carries that attribute and an optional processor turning the
//! element into the stored value. The mining engine dispatches through this
//! table instead of looking up behaviour by name at runtime.

mod core;
mod handler;

pub use self::core::AttributeRegistry;
pub use handler::{AttributeHandler, ElementTest, ExtractError, Processor};
