//! # voxkit_core - Voxkit Core
//!
//! Small shared primitives used by the rest of the workspace:
//! - **Type tokens**: [`StateType`] identifies a concrete type at runtime
//! - **Type keys**: reversible string keys derived from type names
//! - **Registries**: keyed factory tables, explicitly constructed and owned
//! - **Errors**: the workspace-wide [`Error`] and [`Result`]

pub mod error;
pub mod key;
pub mod type_registry;

pub use error::*;
pub use key::{escape_type_name, type_key, unescape_type_name};
pub use type_registry::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::key::type_key;
    pub use crate::type_registry::{StateType, TypeRegistry};
}
