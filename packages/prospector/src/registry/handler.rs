//! Tester and processor traits.

use scraper::ElementRef;
use thiserror::Error;

/// Why a processor could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExtractError(pub String);

impl ExtractError {
    /// Create an extraction error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Decides whether an element carries an attribute's data.
///
/// Implemented for any `Fn(ElementRef<'_>) -> bool`, so plain functions and
/// closures can be registered directly.
pub trait ElementTest: Send + Sync {
    fn test(&self, element: ElementRef<'_>) -> bool;
}

impl<F> ElementTest for F
where
    F: Fn(ElementRef<'_>) -> bool + Send + Sync,
{
    fn test(&self, element: ElementRef<'_>) -> bool {
        self(element)
    }
}

/// Turns a matched element into the value stored on the ore.
pub trait Processor: Send + Sync {
    fn process(&self, element: ElementRef<'_>) -> Result<String, ExtractError>;
}

impl<F> Processor for F
where
    F: Fn(ElementRef<'_>) -> Result<String, ExtractError> + Send + Sync,
{
    fn process(&self, element: ElementRef<'_>) -> Result<String, ExtractError> {
        self(element)
    }
}

/// Tester plus optional processor for one attribute.
pub struct AttributeHandler {
    tester: Box<dyn ElementTest>,
    processor: Option<Box<dyn Processor>>,
}

impl AttributeHandler {
    /// Handler that stores the raw element.
    pub fn new(tester: impl ElementTest + 'static) -> Self {
        Self {
            tester: Box::new(tester),
            processor: None,
        }
    }

    /// Handler that stores the processor's output.
    pub fn with_processor(
        tester: impl ElementTest + 'static,
        processor: impl Processor + 'static,
    ) -> Self {
        Self {
            tester: Box::new(tester),
            processor: Some(Box::new(processor)),
        }
    }

    /// Check whether the element carries this attribute.
    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        self.tester.test(element)
    }

    /// Returns true if a processor is registered.
    pub fn has_processor(&self) -> bool {
        self.processor.is_some()
    }

    /// Produce the stored value: the processor's output, or the element's
    /// outer HTML when no processor is registered.
    pub fn extract(&self, element: ElementRef<'_>) -> Result<String, ExtractError> {
        match &self.processor {
            Some(processor) => processor.process(element),
            None => Ok(element.html()),
        }
    }
}
