//! The dependency engine: change events on reactive controls re-derive the
//! descriptors of their dependents and re-render them in place.
//!
//! A controller inside an array item only affects dependents of that same
//! item; a controller outside arrays affects every instance of a dependent.

use dynform_schema::{Field, FieldPath, FormValue};
use tracing::{debug, trace};

use crate::builder::TreeBuilder;
use crate::editor::Editor;
use crate::overlay::{override_keys, scoped_key};
use crate::tree::{Element, ElementId, NodeId, Role};

impl Editor {
    /// Runs every binding triggered by the control `node` at `control_path`.
    /// Returns the element paths of the re-rendered dependents.
    pub(crate) fn dispatch_change(&mut self, node: NodeId, control_path: &FieldPath) -> Vec<FieldPath> {
        let Some(controller) = self.tree.widget(node).map(|widget| widget.read()) else {
            return Vec::new();
        };
        let trigger = control_path.strip_prefix(1);
        let trigger_shape = trigger.without_indices();

        let mut dependents: Vec<(FieldPath, &Field)> = Vec::new();
        self.schema.walk(|path, field| {
            if field
                .depends_on
                .as_ref()
                .is_some_and(|dependency| dependency.is_triggered_by(&trigger_shape))
            {
                dependents.push((path.clone(), field));
            }
        });
        debug!(trigger = %trigger, dependents = dependents.len(), "dispatching change");

        let mut rerendered = Vec::new();
        for (path, field) in dependents {
            let Some(dependency) = &field.depends_on else {
                continue;
            };
            let key = scoped_key(&trigger, &path);
            self.overlays.record(&key, &dependency.set, &controller);

            let entries: Vec<(FieldPath, NodeId)> = self
                .tree
                .find_by_role(Role::Entry)
                .into_iter()
                .filter(|(element_path, _)| override_keys(&element_path.strip_prefix(1)).contains(&key))
                .collect();
            for (element_path, entry) in entries {
                let instance = element_path.strip_prefix(1);
                let effective = self.overlays.effective(&instance, field);
                if field.kind.is_leaf() {
                    let assigned = self
                        .overlays
                        .merged(&instance)
                        .and_then(|overlay| overlay.value);
                    let previous = self
                        .tree
                        .find(entry, &ElementId::control(&element_path))
                        .and_then(|control| self.tree.widget(control))
                        .map(|widget| widget.read())
                        .filter(|value| *value != FormValue::NotANumber);
                    let current = assigned.or(previous);
                    for removed in self.tree.clear_children(entry) {
                        self.listeners.remove(&removed);
                    }
                    TreeBuilder {
                        tree: &mut self.tree,
                        overlays: &self.overlays,
                        config: &self.config,
                    }
                    .append_widget(entry, &effective, &element_path, current.as_ref());
                } else if let Some(group) = self.tree.find(entry, &ElementId::group(&element_path))
                    && let Some(Element::Group { label, .. }) = self.tree.element_mut(group)
                {
                    label.clone_from(&effective.text);
                } else {
                    continue;
                }
                trace!(path = %element_path, "re-rendered dependent");
                rerendered.push(element_path);
            }
        }
        self.wire_listeners();
        rerendered
    }
}
