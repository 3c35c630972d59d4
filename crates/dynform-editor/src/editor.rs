use std::borrow::Cow;
use std::collections::HashSet;

use dynform_input::{Ipv4Key, KeyAction, Widget, ipv4_keydown};
use dynform_schema::{Field, FieldKind, FieldPath, FormValue, Schema, SchemaError};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::builder::{TreeBuilder, items, schema_path};
use crate::collect::collect_fields;
use crate::config::EditorConfig;
use crate::overlay::OverlayStore;
use crate::populate::populate_fields;
use crate::tree::{Element, ElementId, NodeId, Role, UiTree};

/// A form editor bound to one schema.
///
/// The editor owns the live UI tree. The host drives it with the event
/// methods ([`input_text`](Self::input_text), [`select`](Self::select),
/// [`toggle`](Self::toggle), ...) and reads it back with
/// [`collect`](Self::collect) or [`render_html`](Self::render_html).
#[derive(Debug)]
pub struct Editor {
    pub(crate) schema: Schema,
    pub(crate) config: EditorConfig,
    pub(crate) tree: UiTree,
    pub(crate) mount: NodeId,
    pub(crate) overlays: OverlayStore,
    /// Controls wired to the dependency engine.
    pub(crate) listeners: HashSet<NodeId>,
}

impl Editor {
    /// Validates `schema` and lays out the editor chrome. The form itself is
    /// empty until [`build`](Self::build) is called.
    pub fn new(schema: Schema, config: EditorConfig) -> Result<Self, SchemaError> {
        schema.validate()?;
        let mut tree = UiTree::new(Element::Chrome {
            container: config.container.clone(),
        });
        let mount = tree.append(
            tree.root(),
            None,
            Element::Mount {
                container: config.container.clone(),
            },
        );
        Ok(Self {
            schema,
            config,
            tree,
            mount,
            overlays: OverlayStore::default(),
            listeners: HashSet::new(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    /// Path every element identifier starts with.
    pub fn root_path(&self) -> FieldPath {
        FieldPath::root().child(&self.config.prefix)
    }

    /// Discards the current form and builds it again from the schema.
    /// Dependency overrides recorded so far are kept.
    pub fn build(&mut self) {
        let removed = self.tree.clear_children(self.mount);
        self.unwire(&removed);
        let root = self.root_path();
        TreeBuilder {
            tree: &mut self.tree,
            overlays: &self.overlays,
            config: &self.config,
        }
        .build_fields(&self.schema.fields, self.mount, &root);
        self.wire_listeners();
        debug!(nodes = self.tree.len(), "built form");
    }

    /// The current value tree. Fields without a materialized element are
    /// omitted.
    pub fn collect(&self) -> FormValue {
        let value = collect_fields(&self.tree, &self.schema.fields, self.mount, &self.root_path());
        debug!(fields = value.len(), "collected form");
        FormValue::Object(value)
    }

    pub fn collect_json(&self) -> JsonValue {
        self.collect().to_json()
    }

    /// Writes `value` into the form. Array elements are appended as new
    /// items; existing items are never removed.
    pub fn populate(&mut self, value: &FormValue) {
        let root = self.root_path();
        let mut builder = TreeBuilder {
            tree: &mut self.tree,
            overlays: &self.overlays,
            config: &self.config,
        };
        populate_fields(&mut builder, &self.schema.fields, self.mount, &root, value);
        self.wire_listeners();
        debug!(nodes = self.tree.len(), "populated form");
    }

    pub fn populate_json(&mut self, value: &JsonValue) {
        self.populate(&FormValue::from_json(value));
    }

    /// Expands or collapses every group.
    pub fn details(&mut self, open: bool) {
        for node in self.tree.descendants(self.mount) {
            if let Some(Element::Group { open: state, .. }) = self.tree.element_mut(node) {
                *state = open;
            }
        }
    }

    /// Expands or collapses the group at `path`.
    pub fn set_open(&mut self, path: &FieldPath, open: bool) -> bool {
        let Some(node) = self.tree.find(self.mount, &ElementId::group(path)) else {
            return false;
        };
        match self.tree.element_mut(node) {
            Some(Element::Group { open: state, .. }) => {
                *state = open;
                true
            }
            _ => false,
        }
    }

    /// Appends an item to the array whose group is at `path`. Returns the
    /// new item's path.
    pub fn add_array_item(&mut self, path: &FieldPath) -> Option<FieldPath> {
        let group = self.tree.find(self.mount, &ElementId::group(path))?;
        let field = self.schema.find(&schema_path(path))?;
        if !matches!(field.kind, FieldKind::Array { .. }) {
            return None;
        }
        let (_, item_path) = TreeBuilder {
            tree: &mut self.tree,
            overlays: &self.overlays,
            config: &self.config,
        }
        .add_array_item(field, group, path);
        self.wire_listeners();
        Some(item_path)
    }

    /// Removes the array item at `path` and everything in it. Siblings keep
    /// their indices.
    pub fn remove_item(&mut self, path: &FieldPath) -> bool {
        let Some(item) = self.tree.find(self.mount, &ElementId::item(path)) else {
            return false;
        };
        let removed = self.tree.remove(item);
        self.unwire(&removed);
        debug!(path = %path, "removed array item");
        true
    }

    /// Paths of the items of the array at `path`, in document order.
    pub fn item_paths(&self, path: &FieldPath) -> Vec<FieldPath> {
        match self.tree.find(self.mount, &ElementId::group(path)) {
            Some(group) => items(&self.tree, group, path)
                .into_iter()
                .map(|(_, item_path)| item_path)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Types `text` into the control at `path`, filtered the way the control
    /// filters keystrokes.
    pub fn input_text(&mut self, path: &FieldPath, text: &str) -> bool {
        self.change(path, |widget| widget.input_text(text))
    }

    pub fn toggle(&mut self, path: &FieldPath, on: bool) -> bool {
        self.change(path, |widget| widget.toggle(on))
    }

    pub fn select(&mut self, path: &FieldPath, option: &str) -> bool {
        self.change(path, |widget| widget.select(option))
    }

    /// Feeds a keystroke to the address control at `path`, with the caret at
    /// the end of the text. Returns what the control did with it, or `None`
    /// when there is no address control at `path`.
    pub fn ipv4_key(&mut self, path: &FieldPath, key: Ipv4Key, modifier: bool) -> Option<KeyAction> {
        let node = self.tree.find(self.mount, &ElementId::control(path))?;
        let widget = self.tree.widget_mut(node).filter(|widget| widget.is_ipv4())?;
        let current = widget.text().unwrap_or_default().to_string();
        let action = ipv4_keydown(&current, &key, modifier);
        let next = match (&action, &key) {
            (KeyAction::Replace(next), _) => Some(next.clone()),
            (KeyAction::Allow, Ipv4Key::Char(c)) if !modifier => Some(format!("{current}{c}")),
            (KeyAction::Allow, Ipv4Key::Backspace) => {
                let mut next = current;
                next.pop();
                Some(next)
            }
            _ => None,
        };
        if let Some(next) = next {
            widget.input_text(&next);
        }
        Some(action)
    }

    fn change(&mut self, path: &FieldPath, apply: impl FnOnce(&mut Widget) -> bool) -> bool {
        let Some(node) = self.tree.find(self.mount, &ElementId::control(path)) else {
            return false;
        };
        let Some(widget) = self.tree.widget_mut(node) else {
            return false;
        };
        if !apply(widget) {
            return false;
        }
        if self.listeners.contains(&node) {
            self.dispatch_change(node, path);
        }
        true
    }

    /// The control at `path`.
    pub fn widget(&self, path: &FieldPath) -> Option<&Widget> {
        let node = self.tree.find(self.mount, &ElementId::control(path))?;
        self.tree.widget(node)
    }

    /// The descriptor rendered for the field at the element path `path`,
    /// with dependency overrides applied.
    pub fn effective_field(&self, path: &FieldPath) -> Option<Cow<'_, Field>> {
        let field = self.schema.find(&schema_path(path))?;
        Some(self.overlays.effective(&path.strip_prefix(1), field))
    }

    /// Drops every dependency override. Takes effect on the next build.
    pub fn reset_overlays(&mut self) {
        self.overlays.clear();
    }

    /// Number of controls wired to the dependency engine.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drops the listeners of removed nodes. Must run before the freed
    /// slots are reused.
    pub(crate) fn unwire(&mut self, removed: &[NodeId]) {
        for node in removed {
            self.listeners.remove(node);
        }
    }

    /// Wires every control that still carries the reactive marker, once.
    pub(crate) fn wire_listeners(&mut self) {
        for (_, node) in self.tree.find_by_role(Role::Control) {
            if let Some(widget) = self.tree.widget_mut(node)
                && widget.reactive
            {
                widget.reactive = false;
                self.listeners.insert(node);
            }
        }
    }
}
