//! The EWS type registry
//!
//! Process-wide, initialize-once table of EWS types, derived translation
//! tables, the operation catalog, and the hook registries. Both translators
//! hold read-only references into it; nothing here changes after the
//! one-shot initializer has run.

mod data;
mod hooks;
mod operations;
mod schema;

pub use operations::Operation;
pub use schema::{
    AttrDef, Choice, JsonElement, JsonObject, JsonPostHook, JsonType, Registry, SimpleKind,
    TypeDef, TypeId, XmlChild, XmlChoiceHook,
};

use once_cell::sync::Lazy;

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::build(data::types(), data::operations()));

/// The process-wide registry, built on first use
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Look up an operation descriptor by EWS action name
pub fn lookup_operation(action: &str) -> Option<&'static Operation> {
    registry().lookup_operation(action)
}
