//! A schema-driven form editor.
//!
//! An [`Editor`] turns a [`Schema`](dynform_schema::Schema) into a live tree
//! of controls, reads it back as a [`FormValue`](dynform_schema::FormValue)
//! with [`Editor::collect`] and fills it from one with [`Editor::populate`].
//! Fields may depend on the value of a choice elsewhere in the form; changing
//! that choice re-renders them.

mod builder;
mod collect;
pub mod config;
mod dependency;
mod editor;
mod html;
pub mod overlay;
mod populate;
pub mod tree;

pub use config::EditorConfig;
pub use editor::Editor;
pub use overlay::{FieldOverlay, OverlayStore};
pub use tree::{Element, ElementId, NodeId, Role, UiNode, UiTree};
