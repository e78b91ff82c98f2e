//! Forum Prospector - Mine forum posts into structured records.
//!
//! A site is described by an entry in `website_config.json` (its first page,
//! how to load it and the ordered attributes of a post) and by a site
//! specialization that knows how to recognise those attributes in the HTML.
//! A [`Miner`] walks the pages element by element, fills one [`Ore`] per post
//! and collects the finished ones in its ore cart.
//!
//! # Example
//!
//! ```
//! use forum_prospector::html::parse_document;
//! use forum_prospector::Cursor;
//!
//! let doc = parse_document("<p>one</p><p>two</p>");
//! let mut cursor = Cursor::at_root(&doc);
//! let mut names = Vec::new();
//! while let Some(element) = cursor.element(&doc) {
//!     names.push(element.value().name().to_string());
//!     cursor.advance(&doc);
//! }
//! assert_eq!(names, ["html", "head", "body", "p", "p", "div"]);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, site configuration and run files
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client for remote sources
//! - [`html`]: Document loading, the page-end sentinel and element helpers
//! - [`cursor`]: Document-order traversal
//! - [`ore`]: The record type
//! - [`registry`]: Attribute testers and processors
//! - [`site`]: The site specialization trait
//! - [`sites`]: Built-in site specializations
//! - [`miner`]: The mining session
//! - [`export`]: CSV, JSON and HTML export
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod cursor;
pub mod error;
pub mod export;
pub mod html;
pub mod http;
pub mod miner;
pub mod ore;
pub mod registry;
pub mod site;
pub mod sites;

pub use config::{load_site_config, MineLimits, SiteConfig, SourceType};
pub use cursor::Cursor;
pub use error::{ProspectorError, Result};
pub use export::{refine_ore, ExportFormat};
pub use miner::{MineState, Miner, StateValue};
pub use ore::Ore;
pub use site::{PageTurn, Pager, Site, StaleRecordPolicy};
pub use sites::resolve_site;
