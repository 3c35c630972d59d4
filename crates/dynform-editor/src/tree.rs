//! The live UI tree: an arena of elements mirroring the schema.

use std::collections::HashMap;

use dynform_input::Widget;
use dynform_schema::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// What an identified element stands for at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The list entry holding a field's content.
    Entry,
    /// The collapsible group of an object or array.
    Group,
    /// A leaf control.
    Control,
    /// One array item container.
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub path: FieldPath,
    pub role: Role,
}

impl ElementId {
    pub fn entry(path: &FieldPath) -> Self {
        Self {
            path: path.clone(),
            role: Role::Entry,
        }
    }

    pub fn group(path: &FieldPath) -> Self {
        Self {
            path: path.clone(),
            role: Role::Group,
        }
    }

    pub fn control(path: &FieldPath) -> Self {
        Self {
            path: path.clone(),
            role: Role::Control,
        }
    }

    pub fn item(path: &FieldPath) -> Self {
        Self {
            path: path.clone(),
            role: Role::Item,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// The editor frame with its expand/collapse toolbar.
    Chrome { container: String },
    /// Where the form tree is mounted.
    Mount { container: String },
    List,
    Entry,
    Group { label: String, open: bool, array: bool },
    AddButton { label: String },
    Item,
    RemoveButton { label: String },
    Widget(Widget),
}

#[derive(Debug, Clone)]
pub struct UiNode {
    pub id: Option<ElementId>,
    pub element: Element,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Removed nodes leave a vacant slot that later appends reuse. Looking up a
/// vacant slot yields `None`; holders of a removed id must drop it before the
/// next append.
#[derive(Debug, Clone)]
pub struct UiTree {
    root: NodeId,
    nodes: Vec<Option<UiNode>>,
    free: Vec<NodeId>,
    index: HashMap<ElementId, NodeId>,
}

impl UiTree {
    pub fn new(root: Element) -> Self {
        Self {
            root: NodeId(0),
            nodes: vec![Some(UiNode {
                id: None,
                element: root,
                parent: None,
                children: Vec::new(),
            })],
            free: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id.0)?.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut UiNode> {
        self.nodes.get_mut(id.0)?.as_mut()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|node| &node.element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|node| &mut node.element)
    }

    pub fn widget(&self, id: NodeId) -> Option<&Widget> {
        match self.element(id)? {
            Element::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        match self.element_mut(id)? {
            Element::Widget(widget) => Some(widget),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of slots, vacant ones included.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a new element as the last child of `parent`.
    ///
    /// An identifier already in use is re-pointed at the new element.
    pub fn append(&mut self, parent: NodeId, id: Option<ElementId>, element: Element) -> NodeId {
        let node_id = self.free.pop().unwrap_or(NodeId(self.nodes.len()));
        if let Some(id) = &id {
            self.index.insert(id.clone(), node_id);
        }
        let node = Some(UiNode {
            id,
            element,
            parent: Some(parent),
            children: Vec::new(),
        });
        if node_id.0 == self.nodes.len() {
            self.nodes.push(node);
        } else {
            self.nodes[node_id.0] = node;
        }
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(node_id);
        }
        node_id
    }

    /// Detaches and destroys `id` with its whole subtree. Returns the removed
    /// node ids; removing the root only clears its children.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root {
            return self.clear_children(id);
        }
        let parent = self.node(id).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|child| *child != id);
        }
        self.destroy(id)
    }

    /// Destroys every child subtree of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return Vec::new(),
        };
        children
            .into_iter()
            .flat_map(|child| self.destroy(child))
            .collect()
    }

    fn destroy(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) else {
                continue;
            };
            if let Some(element_id) = &node.id
                && self.index.get(element_id) == Some(&current)
            {
                self.index.remove(element_id);
            }
            stack.extend(node.children);
            self.free.push(current);
            removed.push(current);
        }
        removed
    }

    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.node(node).and_then(|n| n.parent);
        }
        false
    }

    /// Finds the element identified by `id` inside the subtree of `scope`.
    pub fn find(&self, scope: NodeId, id: &ElementId) -> Option<NodeId> {
        let node = *self.index.get(id)?;
        self.is_descendant(node, scope).then_some(node)
    }

    /// All identified elements with the given role, ordered by node id.
    pub fn find_by_role(&self, role: Role) -> Vec<(FieldPath, NodeId)> {
        let mut found: Vec<_> = self
            .index
            .iter()
            .filter(|(id, _)| id.role == role)
            .map(|(id, node)| (id.path.clone(), *node))
            .collect();
        found.sort_by_key(|(_, node)| *node);
        found
    }

    /// Node ids of the subtree under `id`, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse_slash(s).unwrap()
    }

    #[test]
    fn test_append_and_find() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let entry = tree.append(root, Some(ElementId::entry(&path("data/a"))), Element::Entry);
        assert_eq!(tree.find(root, &ElementId::entry(&path("data/a"))), Some(entry));
        assert_eq!(tree.find(root, &ElementId::group(&path("data/a"))), None);
    }

    #[test]
    fn test_find_is_scoped() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let left = tree.append(root, None, Element::Item);
        let right = tree.append(root, None, Element::Item);
        let id = ElementId::entry(&path("data/x"));
        let x = tree.append(left, Some(id.clone()), Element::Entry);
        assert_eq!(tree.find(left, &id), Some(x));
        assert_eq!(tree.find(right, &id), None);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let item = tree.append(root, Some(ElementId::item(&path("data/l/0"))), Element::Item);
        tree.append(item, Some(ElementId::entry(&path("data/l/0/a"))), Element::Entry);
        let removed = tree.remove(item);
        assert_eq!(removed.len(), 2);
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.find(root, &ElementId::entry(&path("data/l/0/a"))), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let a = tree.append(root, None, Element::Entry);
        let a1 = tree.append(a, None, Element::Item);
        let b = tree.append(root, None, Element::Entry);
        assert_eq!(tree.descendants(root), vec![a, a1, b]);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let item = tree.append(root, Some(ElementId::item(&path("data/l/0"))), Element::Item);
        tree.append(item, None, Element::Entry);
        let capacity = tree.capacity();

        for _ in 0..10 {
            tree.clear_children(root);
            let item = tree.append(root, Some(ElementId::item(&path("data/l/0"))), Element::Item);
            tree.append(item, None, Element::Entry);
        }
        assert_eq!(tree.capacity(), capacity);
        assert_eq!(tree.len(), 3);
        assert!(tree.find(root, &ElementId::item(&path("data/l/0"))).is_some());
    }

    #[test]
    fn test_clear_children_keeps_node() {
        let mut tree = UiTree::new(Element::List);
        let root = tree.root();
        let a = tree.append(root, None, Element::Entry);
        tree.append(a, None, Element::Item);
        tree.clear_children(a);
        assert!(tree.node(a).is_some());
        assert!(tree.children(a).is_empty());
    }
}
