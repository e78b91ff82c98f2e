//! HTML document loading and element helpers.

mod loader;
mod utils;

pub use loader::{insert_page_end, is_page_end, parse_document, DocumentLoader};
pub use utils::{
    check_class, find_descendant, get_attribute, get_tag_name, get_text, has_tag_and_class,
};
