//! Inspection and controlled mutation of a session's state.

use std::fmt;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

use crate::cursor::Cursor;
use crate::error::{ProspectorError, Result};
use crate::ore::Ore;

use super::Miner;

/// Read-only snapshot of a session.
#[derive(Debug, Clone, Copy)]
pub struct MineState<'a> {
    pub current_source: &'a str,
    /// Element under the cursor, `None` once the document is exhausted.
    pub current_tag: Option<ElementRef<'a>>,
    pub current_ore: &'a Ore,
    pub current_page: usize,
    pub document: &'a Html,
    pub is_finished: bool,
    /// Number of mining loop iterations over the whole session.
    pub num_mines: u64,
    /// Number of records in the ore cart.
    pub num_ore: usize,
}

/// Kind of value a writable state variable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Text,
    Integer,
    Element,
    Null,
}

impl StateKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Text => "text",
            StateKind::Integer => "integer",
            StateKind::Element => "element",
            StateKind::Null => "null",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value passed to [`Miner::set_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Text(String),
    Integer(i64),
    /// A node of the currently loaded document.
    Element(NodeId),
    Null,
}

impl StateValue {
    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            StateValue::Text(_) => StateKind::Text,
            StateValue::Integer(_) => StateKind::Integer,
            StateValue::Element(_) => StateKind::Element,
            StateValue::Null => StateKind::Null,
        }
    }
}

/// State variables that may be written, with the kind each accepts.
pub const WRITABLE_STATE: [(&str, StateKind); 3] = [
    ("current_source", StateKind::Text),
    ("current_tag", StateKind::Element),
    ("current_page", StateKind::Integer),
];

impl Miner {
    /// Snapshot of the session.
    #[must_use]
    pub fn state(&self) -> MineState<'_> {
        MineState {
            current_source: &self.current_source,
            current_tag: self.cursor.element(&self.document),
            current_ore: &self.current_ore,
            current_page: self.current_page,
            document: &self.document,
            is_finished: self.is_finished,
            num_mines: self.num_mines,
            num_ore: self.ore_cart.len(),
        }
    }

    /// Overwrite one of the [`WRITABLE_STATE`] variables.
    ///
    /// A new `current_source` takes effect on the next [`Miner::reload`].
    ///
    /// # Errors
    /// Returns `ReadOnlyState` for any other name and `TypeMismatch` for a
    /// value of the wrong kind, a negative page or a node outside the loaded
    /// document. Nothing is changed on error.
    pub fn set_state(&mut self, name: &str, value: StateValue) -> Result<()> {
        let expected = WRITABLE_STATE
            .iter()
            .find(|(writable, _)| *writable == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ProspectorError::ReadOnlyState(name.to_string()))?;

        let mismatch = |expected: &'static str, actual: &'static str| {
            ProspectorError::TypeMismatch {
                name: name.to_string(),
                expected,
                actual,
            }
        };

        if value.kind() != expected {
            return Err(mismatch(expected.as_str(), value.kind().as_str()));
        }

        match value {
            StateValue::Text(source) => {
                self.current_source = source;
            }
            StateValue::Integer(page) => {
                self.current_page = usize::try_from(page)
                    .map_err(|_| mismatch("non-negative integer", "negative integer"))?;
            }
            StateValue::Element(id) => {
                let element = self
                    .document
                    .tree
                    .get(id)
                    .and_then(ElementRef::wrap)
                    .ok_or_else(|| mismatch("element of the loaded document", "foreign node"))?;
                self.cursor = Cursor::at(element.id());
            }
            StateValue::Null => {}
        }

        tracing::debug!(site = %self.site_name, variable = name, "State changed");
        Ok(())
    }
}
