//! HTML utility functions for classifying and reading elements.

use scraper::{ElementRef, Selector};

/// Get the lowercase tag name of an element.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use forum_prospector::html::get_tag_name;
///
/// let doc = Html::parse_fragment(r#"<span class="name">Nate</span>"#);
/// let span = doc.select(&Selector::parse("span").unwrap()).next().unwrap();
/// assert_eq!(get_tag_name(span), "span");
/// ```
pub fn get_tag_name<'a>(element: ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Check if an element carries the given class.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use forum_prospector::html::check_class;
///
/// let doc = Html::parse_fragment(r#"<div class="foobar baz"></div><p></p>"#);
/// let div = doc.select(&Selector::parse("div").unwrap()).next().unwrap();
/// let p = doc.select(&Selector::parse("p").unwrap()).next().unwrap();
///
/// assert!(check_class(div, "foobar"));
/// assert!(!check_class(div, "barfoo"));
/// assert!(!check_class(p, "foobar"));
/// ```
pub fn check_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Check if an element has a tag name and carries a class.
pub fn has_tag_and_class(element: ElementRef<'_>, tag: &str, class: &str) -> bool {
    get_tag_name(element) == tag && check_class(element, class)
}

/// Get the concatenated text content of an element and its descendants.
pub fn get_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Find the first descendant matching a selector.
pub fn find_descendant<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Get an attribute value from an element.
pub fn get_attribute<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
