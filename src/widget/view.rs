//! The view seam between [`ChatWidget`](super::ChatWidget) and whatever
//! displays it.
//!
//! [`ChatView`] mirrors the three DOM elements the widget needs: the
//! transcript container, the text input, and the scroll position of the
//! container. [`ChatBox`] is an in-memory implementation that also records
//! every mutation as a [`Patch`], so a server can replay them to a browser.

/// A rendered element of the transcript container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Reserved element identity, if any.
    pub id: Option<&'static str>,
    /// Rendered HTML for the element.
    pub html: String,
}

impl Node {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            id: None,
            html: html.into(),
        }
    }

    #[must_use]
    pub fn with_id(id: &'static str, html: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            html: html.into(),
        }
    }
}

/// Operations a chat widget performs on its display.
pub trait ChatView {
    /// Append a node at the end of the transcript container.
    fn append_node(&mut self, node: Node);

    /// Remove the node with the given id. Returns `false` if none existed.
    fn remove_node(&mut self, id: &str) -> bool;

    /// Whether a node with the given id is present.
    fn contains_node(&self, id: &str) -> bool;

    /// Current value of the text input.
    fn input_value(&self) -> &str;

    /// Empty the text input.
    fn clear_input(&mut self);

    /// Scroll the transcript container to its last node.
    fn scroll_to_end(&mut self);
}

/// A recorded view mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Append(Node),
    Remove(String),
    ClearInput,
    ScrollToEnd,
}

/// In-memory chat view.
#[derive(Debug, Clone, Default)]
pub struct ChatBox {
    nodes: Vec<Node>,
    input: String,
    /// Index one past the last node visible at the bottom of the viewport.
    scroll_end: usize,
    patches: Vec<Patch>,
}

impl ChatBox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes currently in the container, in display order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Replace the text input value, as typing would.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Whether the viewport shows the last node.
    #[must_use]
    pub fn is_scrolled_to_end(&self) -> bool {
        self.scroll_end == self.nodes.len()
    }

    /// Drain the mutations recorded since the last call.
    pub fn take_patches(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.patches)
    }
}

impl ChatView for ChatBox {
    fn append_node(&mut self, node: Node) {
        self.nodes.push(node.clone());
        self.patches.push(Patch::Append(node));
    }

    fn remove_node(&mut self, id: &str) -> bool {
        let Some(pos) = self.nodes.iter().position(|n| n.id == Some(id)) else {
            return false;
        };
        self.nodes.remove(pos);
        self.scroll_end = self.scroll_end.min(self.nodes.len());
        self.patches.push(Patch::Remove(id.to_string()));
        true
    }

    fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == Some(id))
    }

    fn input_value(&self) -> &str {
        &self.input
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.patches.push(Patch::ClearInput);
    }

    fn scroll_to_end(&mut self) {
        self.scroll_end = self.nodes.len();
        self.patches.push(Patch::ScrollToEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_only_matches_reserved_id() {
        let mut view = ChatBox::new();
        view.append_node(Node::new("<div>a</div>"));
        view.append_node(Node::with_id("marker", "<div id=\"marker\"></div>"));

        assert!(view.contains_node("marker"));
        assert!(view.remove_node("marker"));
        assert!(!view.remove_node("marker"));
        assert_eq!(view.nodes().len(), 1);
    }

    #[test]
    fn test_patches_are_drained() {
        let mut view = ChatBox::new();
        view.set_input("hello");
        view.append_node(Node::new("<p>x</p>"));
        view.clear_input();
        view.scroll_to_end();

        assert_eq!(view.input_value(), "");
        assert!(view.is_scrolled_to_end());
        assert_eq!(
            view.take_patches(),
            vec![
                Patch::Append(Node::new("<p>x</p>")),
                Patch::ClearInput,
                Patch::ScrollToEnd,
            ]
        );
        assert!(view.take_patches().is_empty());
    }

    #[test]
    fn test_appending_leaves_viewport_behind_until_scrolled() {
        let mut view = ChatBox::new();
        view.append_node(Node::new("<p>1</p>"));
        assert!(!view.is_scrolled_to_end());
        view.scroll_to_end();
        assert!(view.is_scrolled_to_end());
    }
}
