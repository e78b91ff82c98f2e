//! ClassicCars: a phpBB 2 forum paginated with `&start=` offsets.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use scraper::{ElementRef, Selector};

use crate::html::{find_descendant, get_attribute, get_text, has_tag_and_class};
use crate::registry::{AttributeRegistry, ExtractError};
use crate::site::{PageTurn, Pager, Site, StaleRecordPolicy};

/// Posts shown per topic page.
pub const PAGE_SIZE: usize = 15;

/// `Posted: Sat Oct 01, 2005 1:45 pm`
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static POST_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Posted: [a-zA-Z]{3} (?P<month>[a-zA-Z]{3}) (?P<day>[0-9]{1,2}), (?P<year>[0-9]{4}) (?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{1,2}) (?P<ampm>am|pm)",
    )
    .expect("valid regex")
});

/// Text phpBB shows on a topic page past the last post.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static POST_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("No posts exist for this topic").expect("valid regex"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static BOLD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b").expect("valid selector"));

/// Month names and abbreviations, lowercase.
static MONTHS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    HashMap::from([
        ("jan", 1),
        ("january", 1),
        ("feb", 2),
        ("february", 2),
        ("mar", 3),
        ("march", 3),
        ("apr", 4),
        ("april", 4),
        ("may", 5),
        ("jun", 6),
        ("june", 6),
        ("jul", 7),
        ("july", 7),
        ("aug", 8),
        ("august", 8),
        ("sep", 9),
        ("september", 9),
        ("oct", 10),
        ("october", 10),
        ("nov", 11),
        ("november", 11),
        ("dec", 12),
        ("december", 12),
    ])
});

fn is_id_tag(element: ElementRef<'_>) -> bool {
    has_tag_and_class(element, "span", "name")
}

/// The post id is the `name` anchor inside the author span.
fn process_id(element: ElementRef<'_>) -> Result<String, ExtractError> {
    find_descendant(element, &ANCHOR)
        .and_then(|anchor| get_attribute(anchor, "name"))
        .map(str::to_string)
        .ok_or_else(|| ExtractError::new("author span has no named anchor"))
}

// Same element as the id.
fn is_name_tag(element: ElementRef<'_>) -> bool {
    is_id_tag(element)
}

fn process_name(element: ElementRef<'_>) -> Result<String, ExtractError> {
    find_descendant(element, &BOLD)
        .map(get_text)
        .ok_or_else(|| ExtractError::new("author span has no <b> name"))
}

fn is_date_tag(element: ElementRef<'_>) -> bool {
    has_tag_and_class(element, "span", "postdetails")
        && get_text(element).trim_start().starts_with("Posted")
}

/// Convert the phpBB post date into ISO-8601 (`2005-10-01T13:45:00`).
fn process_date(element: ElementRef<'_>) -> Result<String, ExtractError> {
    let text = get_text(element);
    let caps = POST_DATE
        .captures(&text)
        .ok_or_else(|| ExtractError::new(format!("no post date in {:?}", text.trim())))?;

    let month_name = group(&caps, "month")?.to_lowercase();
    let month = MONTHS
        .get(month_name.as_str())
        .copied()
        .ok_or_else(|| ExtractError::new(format!("unknown month `{month_name}`")))?;

    let year: i32 = number(&caps, "year")?;
    let day: u32 = number(&caps, "day")?;
    let hour = to_24_hour(number(&caps, "hour")?, group(&caps, "ampm")?);
    let minute: u32 = number(&caps, "minute")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|posted| posted.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| ExtractError::new(format!("invalid post date in {:?}", text.trim())))
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> Result<&'t str, ExtractError> {
    caps.name(name)
        .map(|m| m.as_str())
        .ok_or_else(|| ExtractError::new(format!("post date has no {name}")))
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Result<T, ExtractError> {
    group(caps, name)?
        .parse()
        .map_err(|_| ExtractError::new(format!("post date has a malformed {name}")))
}

/// 12 am is midnight, 12 pm is noon.
fn to_24_hour(hour: u32, ampm: &str) -> u32 {
    match ampm {
        "pm" => hour % 12 + 12,
        _ => hour % 12,
    }
}

fn is_body_tag(element: ElementRef<'_>) -> bool {
    has_tag_and_class(element, "span", "postbody") && !get_text(element).trim().is_empty()
}

fn process_body(element: ElementRef<'_>) -> Result<String, ExtractError> {
    Ok(get_text(element))
}

fn is_forum_end(element: ElementRef<'_>) -> bool {
    has_tag_and_class(element, "span", "gen") && POST_END.is_match(&get_text(element))
}

/// Site specialization for the ClassicCars phpBB forum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicCars;

impl ClassicCars {
    pub const CLASS_NAME: &'static str = "ClassicCars";
}

impl Site for ClassicCars {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn register(&self, registry: &mut AttributeRegistry) {
        registry.register_with_processor("id", is_id_tag, process_id);
        registry.register_with_processor("name", is_name_tag, process_name);
        registry.register_with_processor("date", is_date_tag, process_date);
        registry.register_with_processor("body", is_body_tag, process_body);
        registry.set_forum_end(is_forum_end);
    }

    fn turn_page(&self, pager: Pager<'_>) -> PageTurn {
        let page = pager.current_page + 1;
        tracing::info!(page, "Starting page");
        PageTurn::Next {
            page,
            source: format!("{}&start={}", pager.root_source, page * PAGE_SIZE),
        }
    }

    // Signatures are `span.postbody` too; a signature must not survive as a post.
    fn stale_policy(&self) -> StaleRecordPolicy {
        StaleRecordPolicy::Discard
    }
}
