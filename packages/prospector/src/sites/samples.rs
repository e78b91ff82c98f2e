//! Sample sites for the bundled test forum.
//!
//! Every attribute lives in an element with a class of the same name
//! (`postbody` for the body), and the forum ends at `.forumend`.

use scraper::ElementRef;

use crate::html::{check_class, get_text};
use crate::registry::{AttributeRegistry, ExtractError};
use crate::site::{PageTurn, Pager, Site};

fn is_id_tag(element: ElementRef<'_>) -> bool {
    check_class(element, "id")
}

fn is_name_tag(element: ElementRef<'_>) -> bool {
    check_class(element, "name")
}

fn is_date_tag(element: ElementRef<'_>) -> bool {
    check_class(element, "date")
}

fn is_body_tag(element: ElementRef<'_>) -> bool {
    check_class(element, "postbody")
}

fn is_forum_end(element: ElementRef<'_>) -> bool {
    check_class(element, "forumend")
}

fn process_date(element: ElementRef<'_>) -> Result<String, ExtractError> {
    Ok(get_text(element))
}

fn register_testers(registry: &mut AttributeRegistry) {
    registry.register("id", is_id_tag);
    registry.register("name", is_name_tag);
    registry.register("date", is_date_tag);
    registry.register("body", is_body_tag);
    registry.set_forum_end(is_forum_end);
}

/// Sample forum without processors: every value is the raw element.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleNoProcessors;

impl SampleNoProcessors {
    pub const CLASS_NAME: &'static str = "SampleNoProcessors";
}

impl Site for SampleNoProcessors {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn register(&self, registry: &mut AttributeRegistry) {
        register_testers(registry);
    }

    fn turn_page(&self, _pager: Pager<'_>) -> PageTurn {
        PageTurn::Finish
    }
}

/// Sample forum whose dates are reduced to their text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleWithDateProcessor;

impl SampleWithDateProcessor {
    pub const CLASS_NAME: &'static str = "SampleWithDateProcessor";
}

impl Site for SampleWithDateProcessor {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn register(&self, registry: &mut AttributeRegistry) {
        register_testers(registry);
        registry.register_with_processor("date", is_date_tag, process_date);
    }

    fn turn_page(&self, _pager: Pager<'_>) -> PageTurn {
        PageTurn::Finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_date_processor_replaces_raw_handler() {
        let mut registry = AttributeRegistry::new();
        SampleWithDateProcessor.register(&mut registry);

        let doc = Html::parse_fragment(r#"<span class="date">10/1/2000</span>"#);
        let span = doc.select(&Selector::parse("span").unwrap()).next().unwrap();
        let handler = registry.get("date").unwrap();
        assert!(handler.has_processor());
        assert_eq!(handler.extract(span).unwrap(), "10/1/2000");
    }

    #[test]
    fn test_samples_finish_at_page_end() {
        let pager = Pager {
            root_source: "sample_forum.html",
            current_source: "sample_forum.html",
            current_page: 0,
        };
        assert_eq!(SampleNoProcessors.turn_page(pager), PageTurn::Finish);
        assert_eq!(SampleWithDateProcessor.turn_page(pager), PageTurn::Finish);
    }
}
