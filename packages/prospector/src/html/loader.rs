//! Document loading with page-end sentinel insertion.

use std::fs;
use std::sync::LazyLock;

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Node, Selector};

use super::utils::check_class;
use crate::config::{SourceType, PAGE_END_CLASS};
use crate::error::{ProspectorError, Result};
use crate::http::{create_client, download_text};

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").expect("valid selector"));

/// How the raw page text is obtained.
enum Fetch {
    File,
    Remote(Client),
}

/// Turns source descriptors into parsed documents for one source type.
pub struct DocumentLoader {
    source_type: SourceType,
    fetch: Fetch,
}

impl DocumentLoader {
    /// Create a loader. Remote loaders build their HTTP client up front.
    pub fn new(source_type: SourceType) -> Result<Self> {
        let fetch = match source_type {
            SourceType::HtmlFile => Fetch::File,
            SourceType::HttpsUrl => Fetch::Remote(create_client()?),
        };
        Ok(Self { source_type, fetch })
    }

    /// Load and parse the document behind `descriptor`.
    ///
    /// The returned tree always ends with a page-end sentinel.
    ///
    /// # Errors
    /// Returns `InvalidSource` when the file cannot be read or the URL cannot
    /// be fetched successfully.
    pub fn load(&self, descriptor: &str) -> Result<Html> {
        let text = match &self.fetch {
            Fetch::File => {
                fs::read_to_string(descriptor).map_err(|e| ProspectorError::InvalidSource {
                    descriptor: descriptor.to_string(),
                    source_type: self.source_type,
                    reason: e.to_string(),
                })?
            }
            Fetch::Remote(client) => download_text(client, descriptor)?,
        };

        tracing::debug!(descriptor, bytes = text.len(), "Parsing document");
        Ok(parse_document(&text))
    }
}

/// Parse HTML text into a document and append the page-end sentinel.
pub fn parse_document(text: &str) -> Html {
    let mut document = Html::parse_document(text);
    insert_page_end(&mut document);
    document
}

/// Append a `<div class="page-end">` as the last element in document order.
///
/// The sentinel becomes the last child of `<body>`, or of the root element
/// when the document has no body.
pub fn insert_page_end(document: &mut Html) {
    let parent = document
        .select(&BODY)
        .next()
        .map(|body| body.id())
        .unwrap_or_else(|| document.root_element().id());

    let marker = Html::parse_fragment(&format!(r#"<div class="{PAGE_END_CLASS}"></div>"#));
    let Some(element) = marker.select(&DIV).next().map(|div| div.value().clone()) else {
        return;
    };

    if let Some(mut node) = document.tree.get_mut(parent) {
        node.append(Node::Element(element));
    }
}

/// Returns true if `element` is the page-end sentinel.
pub fn is_page_end(element: ElementRef<'_>) -> bool {
    check_class(element, PAGE_END_CLASS)
}
