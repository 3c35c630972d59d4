//! Writes a value tree into the live tree, materializing array items.

use dynform_schema::{Field, FieldKind, FieldPath, FormValue};
use tracing::trace;

use crate::builder::TreeBuilder;
use crate::tree::{ElementId, NodeId};

/// Mirrors [`collect_fields`](crate::collect::collect_fields). Leaves whose
/// key is missing from `value` are cleared; absent elements are skipped.
pub(crate) fn populate_fields(
    builder: &mut TreeBuilder<'_>,
    fields: &[Field],
    scope: NodeId,
    prefix: &FieldPath,
    value: &FormValue,
) {
    for field in fields {
        let Some(key) = &field.key else {
            continue;
        };
        let path = prefix.child(key);
        let current = value.get(key.as_str());
        match &field.kind {
            FieldKind::Object { fields } => {
                let Some(group) = builder.tree.find(scope, &ElementId::group(&path)) else {
                    trace!(path = %path, "no group, skipping");
                    continue;
                };
                if let Some(current) = current.filter(|v| v.truthy()) {
                    populate_fields(builder, fields, group, &path, current);
                }
            }
            FieldKind::Array { fields: shape } => {
                let Some(group) = builder.tree.find(scope, &ElementId::group(&path)) else {
                    trace!(path = %path, "no group, skipping");
                    continue;
                };
                let Some(elements) = current.and_then(FormValue::as_array) else {
                    continue;
                };
                for element in elements {
                    let (item, item_path) = builder.add_array_item(field, group, &path);
                    if field.has_bare_items() {
                        write_control(builder, item, &item_path, element);
                    } else {
                        populate_fields(builder, shape, item, &item_path, element);
                    }
                }
            }
            _ => write_control(
                builder,
                scope,
                &path,
                current.unwrap_or(&FormValue::Null),
            ),
        }
    }
}

fn write_control(builder: &mut TreeBuilder<'_>, scope: NodeId, path: &FieldPath, value: &FormValue) {
    let Some(node) = builder.tree.find(scope, &ElementId::control(path)) else {
        trace!(path = %path, "no control, skipping");
        return;
    };
    if let Some(widget) = builder.tree.widget_mut(node) {
        widget.write(value);
    }
}
