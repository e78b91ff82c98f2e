//! The mining loop.

use crate::error::{ProspectorError, Result};
use crate::html::is_page_end;
use crate::site::{PageTurn, Pager, StaleRecordPolicy};

use super::Miner;

/// Name reported when a site has no forum-end test.
const FORUM_END: &str = "forum_end";

impl Miner {
    /// Walk the site and collect every complete record into the ore cart.
    ///
    /// Runs until the forum end is found, the document is exhausted or the
    /// site finishes pagination. Calling it again on a finished session is
    /// a no-op.
    ///
    /// # Errors
    /// Returns `MissingClassifier` before visiting any element if an
    /// attribute or the forum end has no tester, `Extraction` if a processor
    /// fails, `InvalidSource` if a page cannot be loaded, and
    /// `RunawayPagination` / `IterationLimit` when a ceiling is exceeded.
    pub fn mine(&mut self) -> Result<()> {
        self.check_classifiers()?;
        if self.is_finished {
            return Ok(());
        }

        tracing::info!(site = %self.site_name, page = self.current_page, "Mining started");

        // The ceiling applies per call; `num_mines` keeps counting across calls.
        let start = self.num_mines;
        loop {
            if let Some(max_iterations) = self.limits.max_iterations {
                if self.num_mines - start >= max_iterations {
                    return Err(ProspectorError::IterationLimit {
                        site: self.site_name.clone(),
                        max_iterations,
                    });
                }
            }
            self.num_mines += 1;

            let Some(element) = self.cursor.element(&self.document) else {
                tracing::debug!(site = %self.site_name, "Document exhausted");
                break;
            };

            if self.registry.is_forum_end(element).unwrap_or(false) {
                tracing::debug!(site = %self.site_name, "Reached forum end");
                break;
            }

            if is_page_end(element) {
                match self.site.turn_page(self.pager()) {
                    PageTurn::Next { page, source } => {
                        self.turn_to(page, source)?;
                        continue;
                    }
                    PageTurn::Stay => {}
                    PageTurn::Finish => break,
                }
            }

            self.assay()?;

            if self.current_ore.complete() {
                self.dump_ore();
            }
            self.cursor.advance(&self.document);
        }

        self.is_finished = true;
        tracing::info!(
            site = %self.site_name,
            records = self.ore_cart.len(),
            pages = self.current_page + 1,
            iterations = self.num_mines - start,
            "Mining finished"
        );
        Ok(())
    }

    fn check_classifiers(&self) -> Result<()> {
        if !self.registry.has_forum_end() {
            return Err(self.missing_classifier(FORUM_END));
        }
        match self.schema.iter().find(|a| !self.registry.has_handler(a)) {
            Some(attribute) => Err(self.missing_classifier(attribute)),
            None => Ok(()),
        }
    }

    fn missing_classifier(&self, attribute: &str) -> ProspectorError {
        ProspectorError::MissingClassifier {
            site: self.site_name.clone(),
            attribute: attribute.to_string(),
        }
    }

    fn pager(&self) -> Pager<'_> {
        Pager {
            root_source: &self.root_source,
            current_source: &self.current_source,
            current_page: self.current_page,
        }
    }

    /// Load the next page and commit it. On failure the session keeps its
    /// previous page, source and document.
    fn turn_to(&mut self, page: usize, source: String) -> Result<()> {
        if page > self.limits.max_pages {
            return Err(ProspectorError::RunawayPagination {
                site: self.site_name.clone(),
                page,
                max_pages: self.limits.max_pages,
            });
        }
        tracing::info!(site = %self.site_name, page, source = %source, "Turning page");
        let document = self.loader.load(&source)?;
        self.current_page = page;
        self.current_source = source;
        self.replace_document(document);
        Ok(())
    }

    /// Test the current element against every attribute of the schema and
    /// store the values of those that match.
    fn assay(&mut self) -> Result<()> {
        let Some(element) = self.cursor.element(&self.document) else {
            return Ok(());
        };

        let mut found = Vec::new();
        for (index, attribute) in self.schema.iter().enumerate() {
            let Some(handler) = self.registry.get(attribute) else {
                continue;
            };
            if !handler.matches(element) {
                continue;
            }
            let value = handler
                .extract(element)
                .map_err(|e| ProspectorError::Extraction {
                    site: self.site_name.clone(),
                    attribute: attribute.clone(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(
                site = %self.site_name,
                attribute = %attribute,
                processed = handler.has_processor(),
                "Matched"
            );
            found.push((index, value));
        }

        for (index, value) in found {
            if index == 0 && !self.current_ore.bare() {
                self.start_new_record();
            }
            self.current_ore.set_index(index, value);
        }
        Ok(())
    }

    /// The first attribute recurred before the current ore completed.
    fn start_new_record(&mut self) {
        match self.site.stale_policy() {
            StaleRecordPolicy::Flush => {
                tracing::warn!(
                    site = %self.site_name,
                    ore = %self.current_ore,
                    "New record started before the previous one completed; keeping it partial"
                );
                self.dump_ore();
            }
            StaleRecordPolicy::Discard => {
                tracing::debug!(
                    site = %self.site_name,
                    ore = %self.current_ore,
                    "Discarding partial ore"
                );
                self.current_ore = self.current_ore.fresh();
            }
            StaleRecordPolicy::Merge => {}
        }
    }

    /// Move the current ore into the cart and start a bare one. Bare ores
    /// are never added.
    pub(crate) fn dump_ore(&mut self) {
        if self.current_ore.bare() {
            return;
        }
        let fresh = self.current_ore.fresh();
        let ore = std::mem::replace(&mut self.current_ore, fresh);
        tracing::debug!(site = %self.site_name, ore = %ore, "Dumped ore");
        self.ore_cart.push(ore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use crate::config::{MineLimits, SiteConfig, SourceType};
    use crate::html::check_class;
    use crate::registry::AttributeRegistry;
    use crate::site::Site;
    use scraper::ElementRef;

    /// Records are `<p class="a">` then `<p class="b">`.
    struct PairSite(StaleRecordPolicy);

    impl Site for PairSite {
        fn class_name(&self) -> &'static str {
            "PairSite"
        }

        fn register(&self, registry: &mut AttributeRegistry) {
            registry.register("a", |el: ElementRef<'_>| check_class(el, "a"));
            registry.register_with_processor(
                "b",
                |el: ElementRef<'_>| check_class(el, "b"),
                |el: ElementRef<'_>| -> std::result::Result<String, crate::registry::ExtractError> {
                    Ok(crate::html::get_text(el))
                },
            );
            registry.set_forum_end(|el: ElementRef<'_>| check_class(el, "end"));
        }

        fn stale_policy(&self) -> StaleRecordPolicy {
            self.0
        }
    }

    fn miner(html: &str, policy: StaleRecordPolicy) -> (tempfile::NamedTempFile, Miner) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(html.as_bytes()).unwrap();
        let config = SiteConfig::new(
            "pairs",
            file.path().to_string_lossy(),
            SourceType::HtmlFile,
            ["a", "b"],
        );
        let miner = Miner::new(config, Box::new(PairSite(policy))).unwrap();
        (file, miner)
    }

    fn values(miner: &Miner, attribute: &str) -> Vec<Option<String>> {
        miner
            .ore_cart()
            .iter()
            .map(|ore| ore.get(attribute).map(str::to_string))
            .collect()
    }

    const STALE: &str = r#"<p class="a">1</p><p class="a">2</p><p class="b">x</p><p class="end"></p>"#;

    #[test]
    fn test_flush_keeps_partial_record() {
        let (_file, mut miner) = miner(STALE, StaleRecordPolicy::Flush);
        miner.mine().unwrap();
        assert_eq!(values(&miner, "b"), vec![None, Some("x".to_string())]);
    }

    #[test]
    fn test_discard_drops_partial_record() {
        let (_file, mut miner) = miner(STALE, StaleRecordPolicy::Discard);
        miner.mine().unwrap();
        assert_eq!(miner.ore_cart().len(), 1);
        assert!(miner.ore_cart()[0].get("a").unwrap().contains(">2<"));
    }

    #[test]
    fn test_merge_overwrites_partial_record() {
        let (_file, mut miner) = miner(STALE, StaleRecordPolicy::Merge);
        miner.mine().unwrap();
        assert_eq!(miner.ore_cart().len(), 1);
        assert!(miner.ore_cart()[0].get("a").unwrap().contains(">2<"));
        assert_eq!(values(&miner, "b"), vec![Some("x".to_string())]);
    }

    #[test]
    fn test_stops_at_forum_end() {
        let html = r#"<p class="a">1</p><p class="b">x</p><p class="end"></p><p class="a">2</p><p class="b">y</p>"#;
        let (_file, mut miner) = miner(html, StaleRecordPolicy::Flush);
        miner.mine().unwrap();
        assert_eq!(values(&miner, "b"), vec![Some("x".to_string())]);
        assert!(miner.state().is_finished);
    }

    #[test]
    fn test_trailing_partial_record_is_not_dumped() {
        let html = r#"<p class="a">1</p><p class="b">x</p><p class="a">2</p>"#;
        let (_file, mut miner) = miner(html, StaleRecordPolicy::Flush);
        miner.mine().unwrap();
        assert_eq!(miner.ore_cart().len(), 1);
        assert!(!miner.state().current_ore.bare());
    }

    #[test]
    fn test_mine_twice_is_a_no_op() {
        let html = r#"<p class="a">1</p><p class="b">x</p><p class="end"></p>"#;
        let (_file, mut miner) = miner(html, StaleRecordPolicy::Flush);
        miner.mine().unwrap();
        // html, head, body, p.a, p.b, p.end
        assert_eq!(miner.state().num_mines, 6);

        miner.mine().unwrap();
        assert_eq!(miner.ore_cart().len(), 1);
        assert_eq!(miner.state().num_mines, 6);
    }

    #[test]
    fn test_dump_bare_ore_is_ignored() {
        let (_file, mut miner) = miner("<p></p>", StaleRecordPolicy::Flush);
        miner.dump_ore();
        assert!(miner.ore_cart().is_empty());
    }

    #[test]
    fn test_iteration_limit() {
        let (_file, miner) = miner(STALE, StaleRecordPolicy::Flush);
        let mut miner = miner.with_limits(MineLimits {
            max_pages: 1,
            max_iterations: Some(3),
        });
        let err = miner.mine().unwrap_err();
        assert!(matches!(
            err,
            ProspectorError::IterationLimit {
                max_iterations: 3,
                ..
            }
        ));
        assert_eq!(miner.state().num_mines, 3);

        // A resumed session gets a fresh allowance and keeps counting.
        let err = miner.mine().unwrap_err();
        assert!(matches!(err, ProspectorError::IterationLimit { .. }));
        assert_eq!(miner.state().num_mines, 6);
    }

    #[test]
    fn test_processor_failure_is_an_extraction_error() {
        struct Failing;
        impl Site for Failing {
            fn class_name(&self) -> &'static str {
                "Failing"
            }
            fn register(&self, registry: &mut AttributeRegistry) {
                registry.register_with_processor(
                    "a",
                    |el: ElementRef<'_>| check_class(el, "a"),
                    |_: ElementRef<'_>| -> std::result::Result<String, crate::registry::ExtractError> {
                        Err(crate::registry::ExtractError::new("no anchor"))
                    },
                );
                registry.set_forum_end(|_: ElementRef<'_>| false);
            }
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"<p class="a">1</p>"#).unwrap();
        let config = SiteConfig::new(
            "failing",
            file.path().to_string_lossy(),
            SourceType::HtmlFile,
            ["a"],
        );
        let mut miner = Miner::new(config, Box::new(Failing)).unwrap();

        let err = miner.mine().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to extract `a` for site \"failing\": no anchor"
        );
    }
}
