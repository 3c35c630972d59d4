//! Field schema for tree-structured forms: descriptors, keys, paths,
//! dependency bindings and the value tree exchanged with the form.

/// Dependency bindings between fields.
pub mod dependency;

/// Field descriptors.
pub mod field;

/// Field key type and validation.
pub mod key;

/// Loading schemas from JSON.
pub mod load;

/// Typed paths into the form tree.
pub mod path;

/// Schema container and validation.
pub mod schema;

/// Value tree and numeric text parsing.
pub mod value;

pub use dependency::{Dependency, DependencySet, Setter};
pub use field::{Attrs, Field, FieldKind};
pub use key::{FieldKey, FieldKeyError};
pub use load::SchemaLoadError;
pub use path::{FieldPath, PathSegment};
pub use schema::{Schema, SchemaError, SchemaErrorKind};
pub use value::{FormValue, ValueKind};
