//! Mining sessions.
//!
//! A [`Miner`] owns everything one run over a site needs: the loaded page,
//! the traversal cursor, the record being filled and the cart of finished
//! records. Sessions share nothing, so several can run on separate threads.

mod engine;
mod state;

use std::path::Path;
use std::sync::Arc;

use scraper::Html;

use crate::config::{load_site_config, MineLimits, SiteConfig};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::html::DocumentLoader;
use crate::ore::Ore;
use crate::registry::AttributeRegistry;
use crate::site::Site;
use crate::sites::resolve_site;

pub use state::{MineState, StateKind, StateValue, WRITABLE_STATE};

/// One mining session over a configured site.
pub struct Miner {
    site_name: String,
    root_source: String,
    schema: Arc<[String]>,
    registry: AttributeRegistry,
    site: Box<dyn Site>,
    limits: MineLimits,
    loader: DocumentLoader,
    document: Html,
    current_source: String,
    current_page: usize,
    cursor: Cursor,
    current_ore: Ore,
    is_finished: bool,
    num_mines: u64,
    ore_cart: Vec<Ore>,
}

impl Miner {
    /// Create a session and load the first page of the site.
    ///
    /// # Errors
    /// Returns `InvalidSource` if the first page cannot be loaded.
    pub fn new(config: SiteConfig, site: Box<dyn Site>) -> Result<Self> {
        let mut registry = AttributeRegistry::new();
        site.register(&mut registry);

        let limits = MineLimits::for_site(&config);
        let loader = DocumentLoader::new(config.source_type)?;
        let document = loader.load(&config.source)?;
        let cursor = Cursor::at_root(&document);

        let schema: Arc<[String]> = config.attributes.into();
        let current_ore = Ore::new(Arc::clone(&schema), config.name.clone());

        tracing::debug!(
            site = %config.name,
            prospector = site.class_name(),
            source = %config.source,
            registered = ?registry.registered_attributes(),
            "Session created"
        );

        Ok(Self {
            site_name: config.name,
            current_source: config.source.clone(),
            root_source: config.source,
            schema,
            registry,
            site,
            limits,
            loader,
            document,
            current_page: 0,
            cursor,
            current_ore,
            is_finished: false,
            num_mines: 0,
            ore_cart: Vec::new(),
        })
    }

    /// Create a session for `site_name` from a JSON configuration file,
    /// resolving its `prospector_class`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for an unknown or incomplete site and
    /// `InvalidSource` if the first page cannot be loaded.
    pub fn from_config_file(path: &Path, site_name: &str) -> Result<Self> {
        let config = load_site_config(path, site_name)?;
        let site = resolve_site(config.prospector_class.as_deref())?;
        Self::new(config, site)
    }

    /// Override the defensive ceilings of this session.
    #[must_use]
    pub fn with_limits(mut self, limits: MineLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Name of the site being mined.
    #[must_use]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Ordered attribute schema of the site.
    #[must_use]
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Records collected so far, in document order.
    #[must_use]
    pub fn ore_cart(&self) -> &[Ore] {
        &self.ore_cart
    }

    /// Consume the session and return its records.
    #[must_use]
    pub fn into_ore_cart(self) -> Vec<Ore> {
        self.ore_cart
    }

    /// Rebuild the document from the current source and move the cursor
    /// back to its root element.
    ///
    /// # Errors
    /// Returns `InvalidSource` if the source cannot be loaded. The previous
    /// document stays in place on failure.
    pub fn reload(&mut self) -> Result<()> {
        let document = self.loader.load(&self.current_source)?;
        self.replace_document(document);
        tracing::debug!(
            site = %self.site_name,
            source = %self.current_source,
            page = self.current_page,
            "Reloaded document"
        );
        Ok(())
    }

    /// Swap in a freshly loaded document with the cursor at its root.
    fn replace_document(&mut self, document: Html) {
        self.cursor = Cursor::at_root(&document);
        self.document = document;
    }
}
