//! HTML rendering of the live tree.

use maud::{Markup, html};

use crate::editor::Editor;
use crate::tree::{Element, NodeId, UiTree};

impl Editor {
    /// Renders the whole editor, chrome included.
    pub fn render_html(&self) -> String {
        render_node(&self.tree, self.tree.root()).into_string()
    }

    /// Renders the form only, without the chrome.
    pub fn render_form_html(&self) -> String {
        render_children(&self.tree, self.mount).into_string()
    }
}

fn render_children(tree: &UiTree, node: NodeId) -> Markup {
    html! {
        @for child in tree.children(node) {
            (render_node(tree, *child))
        }
    }
}

fn element_id(tree: &UiTree, node: NodeId) -> Option<String> {
    tree.node(node)?.id.as_ref().map(|id| id.path.to_string())
}

fn parent_id(tree: &UiTree, node: NodeId) -> Option<String> {
    element_id(tree, tree.node(node)?.parent?)
}

fn render_node(tree: &UiTree, node: NodeId) -> Markup {
    let Some(element) = tree.element(node) else {
        return html! {};
    };
    let id = element_id(tree, node);
    match element {
        Element::Chrome { container } => html! {
            div id=(container) {
                div class="dynform-toolbar" {
                    button type="button" id={ (container) "_btnExpand" } { "Expand all" }
                    " "
                    button type="button" id={ (container) "_btnCollapse" } { "Collapse all" }
                }
                (render_children(tree, node))
            }
        },
        Element::Mount { container } => html! {
            div id={ "edit_" (container) } { (render_children(tree, node)) }
        },
        Element::List => html! {
            ul { (render_children(tree, node)) }
        },
        Element::Entry => {
            let in_list = tree
                .node(node)
                .and_then(|n| n.parent)
                .and_then(|parent| tree.element(parent))
                .is_some_and(|parent| matches!(parent, Element::List));
            let cnt = id.map(|id| format!("{id}_cnt"));
            if in_list {
                html! { li id=[cnt] { (render_children(tree, node)) } }
            } else {
                html! { div id=[cnt] { (render_children(tree, node)) } }
            }
        }
        Element::Group { label, open, array } => html! {
            details id=[id] class=[array.then_some("array")] open[*open] {
                summary { (label) }
                (render_children(tree, node))
            }
        },
        Element::AddButton { label } => html! {
            button type="button" class="add" data-array=[parent_id(tree, node)] { (label) }
        },
        Element::Item => html! {
            div id=[id] class="array-item" { (render_children(tree, node)) }
        },
        Element::RemoveButton { label } => html! {
            button type="button" class="remove" data-item=[parent_id(tree, node)] { (label) }
        },
        Element::Widget(widget) => html! { (widget) },
    }
}
