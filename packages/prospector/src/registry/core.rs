//! Attribute registry mapping attribute names to handlers.

use std::collections::{HashMap, HashSet};

use scraper::ElementRef;

use super::handler::{AttributeHandler, ElementTest, Processor};

/// Per-site table of attribute handlers plus the forum-end test.
///
/// Sites fill the registry once at session construction; the engine looks
/// up handlers by the attribute names of the configured schema.
#[derive(Default)]
pub struct AttributeRegistry {
    handlers: HashMap<String, AttributeHandler>,
    forum_end: Option<Box<dyn ElementTest>>,
}

impl AttributeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tester whose matches are stored as raw elements.
    pub fn register(&mut self, attribute: impl Into<String>, tester: impl ElementTest + 'static) {
        self.handlers
            .insert(attribute.into(), AttributeHandler::new(tester));
    }

    /// Register a tester together with a processor.
    pub fn register_with_processor(
        &mut self,
        attribute: impl Into<String>,
        tester: impl ElementTest + 'static,
        processor: impl Processor + 'static,
    ) {
        self.handlers.insert(
            attribute.into(),
            AttributeHandler::with_processor(tester, processor),
        );
    }

    /// Set the test for the element that marks the end of the forum.
    pub fn set_forum_end(&mut self, tester: impl ElementTest + 'static) {
        self.forum_end = Some(Box::new(tester));
    }

    /// Get the handler for an attribute.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&AttributeHandler> {
        self.handlers.get(attribute)
    }

    /// Check if a handler is registered for an attribute.
    #[must_use]
    pub fn has_handler(&self, attribute: &str) -> bool {
        self.handlers.contains_key(attribute)
    }

    /// Check if a forum-end test is registered.
    #[must_use]
    pub fn has_forum_end(&self) -> bool {
        self.forum_end.is_some()
    }

    /// Run the forum-end test. `None` if the site never registered one.
    #[must_use]
    pub fn is_forum_end(&self, element: ElementRef<'_>) -> Option<bool> {
        self.forum_end.as_ref().map(|test| test.test(element))
    }

    /// Return set of all registered attribute names.
    #[must_use]
    pub fn registered_attributes(&self) -> HashSet<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}
