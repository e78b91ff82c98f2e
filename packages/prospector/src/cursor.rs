//! Document-order traversal over the elements of a loaded page.

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};

/// Position of the mining session inside the current document.
///
/// The cursor stores a node id rather than a borrow, so the document it
/// points into can be replaced on a page turn. `None` means exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: Option<NodeId>,
}

impl Cursor {
    /// Position a cursor at the root element of `document`.
    #[must_use]
    pub fn at_root(document: &Html) -> Self {
        Self {
            position: Some(document.root_element().id()),
        }
    }

    /// Position a cursor at a specific node.
    #[must_use]
    pub fn at(id: NodeId) -> Self {
        Self { position: Some(id) }
    }

    /// Returns true when traversal has run off the end of the document.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position.is_none()
    }

    /// Resolve the current position to an element of `document`.
    #[must_use]
    pub fn element<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.position
            .and_then(|id| document.tree.get(id))
            .and_then(ElementRef::wrap)
    }

    /// Move to the next element in document order, skipping text, comments
    /// and other non-element nodes. Advancing an exhausted cursor is a no-op.
    pub fn advance(&mut self, document: &Html) {
        let Some(current) = self.position.and_then(|id| document.tree.get(id)) else {
            self.position = None;
            return;
        };

        let mut next = next_in_order(current);
        while let Some(node) = next {
            if node.value().is_element() {
                self.position = Some(node.id());
                return;
            }
            next = next_in_order(node);
        }
        self.position = None;
    }
}

/// Next node in document order: first child, else the next sibling of the
/// node or of its nearest ancestor that has one.
fn next_in_order(node: NodeRef<'_, Node>) -> Option<NodeRef<'_, Node>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }

    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}
