//! The capability interface a site specialization implements.

use crate::registry::AttributeRegistry;

/// Pagination view handed to [`Site::turn_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager<'a> {
    /// Source of the first page, as configured.
    pub root_source: &'a str,
    /// Source of the page currently loaded.
    pub current_source: &'a str,
    /// Zero-based index of the page currently loaded.
    pub current_page: usize,
}

/// Outcome of reaching the end of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    /// Load `source` as page `page` and continue mining there.
    Next { page: usize, source: String },
    /// No page turn; keep walking the current document until it runs out.
    Stay,
    /// Stop mining.
    Finish,
}

/// What to do with a partial ore when the first attribute of the schema
/// matches again before the ore completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleRecordPolicy {
    /// Dump the partial ore into the cart and start a fresh one.
    #[default]
    Flush,
    /// Drop the partial ore and start a fresh one.
    Discard,
    /// Keep filling the partial ore, overwriting fields as they recur.
    Merge,
}

/// A site specialization: how to recognise posts and pages on one forum.
pub trait Site: Send + Sync {
    /// Name used in the `prospector_class` configuration key.
    fn class_name(&self) -> &'static str;

    /// Register testers, processors and the forum-end test.
    fn register(&self, registry: &mut AttributeRegistry);

    /// Point the session at the next page. Default: no page turn.
    fn turn_page(&self, _pager: Pager<'_>) -> PageTurn {
        PageTurn::Stay
    }

    /// Handling of partial ores when a new record starts.
    fn stale_policy(&self) -> StaleRecordPolicy {
        StaleRecordPolicy::default()
    }
}
