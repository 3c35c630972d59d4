//! Instantiates the UI tree from the schema.

use dynform_input::render_input;
use dynform_schema::{Field, FieldKind, FieldPath, FormValue, PathSegment};
use tracing::trace;

use crate::config::EditorConfig;
use crate::overlay::OverlayStore;
use crate::tree::{Element, ElementId, NodeId, UiTree};

/// Schema-shape path of an element path: root prefix and indices dropped.
pub(crate) fn schema_path(element_path: &FieldPath) -> FieldPath {
    element_path.strip_prefix(1).without_indices()
}

pub(crate) struct TreeBuilder<'a> {
    pub tree: &'a mut UiTree,
    pub overlays: &'a OverlayStore,
    pub config: &'a EditorConfig,
}

impl TreeBuilder<'_> {
    /// Appends a list with one entry per field under `container`.
    pub fn build_fields(&mut self, fields: &[Field], container: NodeId, prefix: &FieldPath) {
        let list = self.tree.append(container, None, Element::List);
        for field in fields {
            let Some(key) = &field.key else {
                continue;
            };
            let path = prefix.child(key);
            let entry = self
                .tree
                .append(list, Some(ElementId::entry(&path)), Element::Entry);
            let field = self.overlays.effective(&path.strip_prefix(1), field);

            match &field.kind {
                FieldKind::Object { fields } => {
                    let group = self.append_group(entry, &path, &field.text, false);
                    self.build_fields(fields, group, &path);
                }
                FieldKind::Array { .. } => {
                    let group = self.append_group(entry, &path, &field.text, true);
                    self.tree.append(
                        group,
                        None,
                        Element::AddButton {
                            label: self.config.add_label.clone(),
                        },
                    );
                }
                _ => {
                    self.append_widget(entry, &field, &path, field.value.as_ref());
                }
            }
        }
    }

    fn append_group(&mut self, entry: NodeId, path: &FieldPath, label: &str, array: bool) -> NodeId {
        self.tree.append(
            entry,
            Some(ElementId::group(path)),
            Element::Group {
                label: label.to_string(),
                open: self.config.open,
                array,
            },
        )
    }

    pub fn append_widget(
        &mut self,
        entry: NodeId,
        field: &Field,
        path: &FieldPath,
        current: Option<&FormValue>,
    ) -> NodeId {
        let widget = render_input(field, path, current);
        self.tree.append(
            entry,
            Some(ElementId::control(path)),
            Element::Widget(widget),
        )
    }

    /// Appends a new item to the array `field` whose group is `group` and whose
    /// element path is `array_path`. Returns the item node and its path.
    ///
    /// The index is the current item count, moved past any index still held
    /// by a surviving item so identifiers never collide.
    pub fn add_array_item(
        &mut self,
        field: &Field,
        group: NodeId,
        array_path: &FieldPath,
    ) -> (NodeId, FieldPath) {
        let taken: Vec<usize> = self
            .tree
            .children(group)
            .iter()
            .filter_map(|child| item_index(self.tree, *child, array_path))
            .collect();
        let mut index = taken.len();
        while taken.contains(&index) {
            index += 1;
        }
        let item_path = array_path.index(index);
        trace!(path = %item_path, "adding array item");

        let item = self
            .tree
            .append(group, Some(ElementId::item(&item_path)), Element::Item);
        let shape = field.kind.children();
        if field.has_bare_items() {
            let entry = self
                .tree
                .append(item, Some(ElementId::entry(&item_path)), Element::Entry);
            self.append_widget(entry, &shape[0], &item_path, shape[0].value.as_ref());
        } else {
            self.build_fields(shape, item, &item_path);
        }
        self.tree.append(
            item,
            None,
            Element::RemoveButton {
                label: self.config.remove_label.clone(),
            },
        );
        (item, item_path)
    }
}

/// Index of `node` if it is an item container directly under `array_path`.
pub(crate) fn item_index(tree: &UiTree, node: NodeId, array_path: &FieldPath) -> Option<usize> {
    let id = tree.node(node)?.id.as_ref()?;
    if id.role != crate::tree::Role::Item || id.path.parent().as_ref() != Some(array_path) {
        return None;
    }
    match id.path.last()? {
        PathSegment::Index(index) => Some(*index),
        PathSegment::Key(_) => None,
    }
}

/// Item containers of the array group `group`, in document order.
pub(crate) fn items(tree: &UiTree, group: NodeId, array_path: &FieldPath) -> Vec<(NodeId, FieldPath)> {
    tree.children(group)
        .iter()
        .filter(|child| item_index(tree, **child, array_path).is_some())
        .filter_map(|child| Some((*child, tree.node(*child)?.id.as_ref()?.path.clone())))
        .collect()
}
