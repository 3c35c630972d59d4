//! Reads the live tree back into a value tree.

use dynform_schema::{Field, FieldKind, FieldPath, FormValue};
use indexmap::IndexMap;
use tracing::trace;

use crate::builder::items;
use crate::tree::{ElementId, NodeId, UiTree};

/// Collects `fields` found under `scope`. Fields without a materialized
/// element are left out.
pub(crate) fn collect_fields(
    tree: &UiTree,
    fields: &[Field],
    scope: NodeId,
    prefix: &FieldPath,
) -> IndexMap<String, FormValue> {
    let mut out = IndexMap::new();
    for field in fields {
        let Some(key) = &field.key else {
            continue;
        };
        let path = prefix.child(key);
        let value = match &field.kind {
            FieldKind::Object { fields } => tree
                .find(scope, &ElementId::group(&path))
                .map(|group| FormValue::Object(collect_fields(tree, fields, group, &path))),
            FieldKind::Array { fields } => tree
                .find(scope, &ElementId::group(&path))
                .map(|group| collect_array(tree, field, fields, group, &path)),
            _ => read_control(tree, scope, &path),
        };
        match value {
            Some(value) => {
                out.insert(key.as_str().to_string(), value);
            }
            None => trace!(path = %path, "no element, omitting"),
        }
    }
    out
}

fn collect_array(
    tree: &UiTree,
    field: &Field,
    shape: &[Field],
    group: NodeId,
    path: &FieldPath,
) -> FormValue {
    let bare = field.has_bare_items();
    let values = items(tree, group, path)
        .into_iter()
        .filter_map(|(item, item_path)| {
            if bare {
                read_control(tree, item, &item_path)
            } else {
                Some(FormValue::Object(collect_fields(
                    tree, shape, item, &item_path,
                )))
            }
        })
        .collect();
    FormValue::Array(values)
}

fn read_control(tree: &UiTree, scope: NodeId, path: &FieldPath) -> Option<FormValue> {
    let node = tree.find(scope, &ElementId::control(path))?;
    tree.widget(node).map(|widget| widget.read())
}
