//! Ore: the accumulator for one mined record.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Attribute values of one extracted entity (a forum post).
///
/// The schema is fixed at construction and shared between all ores of a
/// session. Values are materialized strings, never references into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ore {
    site_name: String,
    names: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Ore {
    /// Create a bare ore for the given schema.
    #[must_use]
    pub fn new(names: Arc<[String]>, site_name: impl Into<String>) -> Self {
        let values = vec![None; names.len()];
        Self {
            site_name: site_name.into(),
            names,
            values,
        }
    }

    /// Name of the site this ore was mined from.
    #[must_use]
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Attribute names in schema order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Attribute name/value pairs in schema order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_deref))
    }

    /// Value of a single attribute. `None` if unset or not in the schema.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let index = self.names.iter().position(|n| n == name)?;
        self.values[index].as_deref()
    }

    /// Store a value by schema index.
    pub(crate) fn set_index(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = Some(value);
        }
    }

    /// Returns true if every attribute has a value.
    #[must_use]
    pub fn complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Returns true if no attribute has a value.
    #[must_use]
    pub fn bare(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// A fresh bare ore with the same schema and site.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.names), self.site_name.clone())
    }
}

impl Serialize for Ore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (name, value) in self.attributes() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl fmt::Display for Ore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ore(")?;
        for (i, (name, value)) in self.attributes().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(value) => write!(f, "{name}={value}")?,
                None => write!(f, "{name}=None")?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_new_ore_is_bare() {
        let ore = Ore::new(schema(&["id", "name"]), "sample_forum");
        assert!(ore.bare());
        assert!(!ore.complete());
        assert_eq!(ore.site_name(), "sample_forum");
        assert_eq!(
            ore.attributes().collect::<Vec<_>>(),
            vec![("id", None), ("name", None)]
        );
    }

    #[test]
    fn test_partial_ore_is_neither_bare_nor_complete() {
        let mut ore = Ore::new(schema(&["id", "name"]), "sample_forum");
        ore.set_index(0, "1".to_string());
        assert!(!ore.bare());
        assert!(!ore.complete());
        assert_eq!(ore.get("id"), Some("1"));
        assert_eq!(ore.get("name"), None);
        assert_eq!(ore.get("missing"), None);
    }

    #[test]
    fn test_full_ore_is_complete() {
        let mut ore = Ore::new(schema(&["id", "name"]), "sample_forum");
        ore.set_index(0, "1".to_string());
        ore.set_index(1, "Nate".to_string());
        assert!(ore.complete());
        assert!(!ore.bare());
    }

    #[test]
    fn test_empty_schema_is_both_bare_and_complete() {
        let ore = Ore::new(schema(&[]), "sample_forum");
        assert!(ore.bare());
        assert!(ore.complete());
    }

    #[test]
    fn test_empty_string_counts_as_a_value() {
        let mut ore = Ore::new(schema(&["body"]), "sample_forum");
        ore.set_index(0, String::new());
        assert!(ore.complete());
    }

    #[test]
    fn test_fresh_shares_schema() {
        let mut ore = Ore::new(schema(&["id"]), "sample_forum");
        ore.set_index(0, "1".to_string());
        let fresh = ore.fresh();
        assert!(fresh.bare());
        assert_eq!(fresh.names(), ore.names());
        assert_eq!(fresh.site_name(), "sample_forum");
    }

    #[test]
    fn test_display() {
        let mut ore = Ore::new(schema(&["id", "name"]), "sample_forum");
        ore.set_index(0, "1".to_string());
        assert_eq!(ore.to_string(), "Ore(id=1, name=None)");
    }

    #[test]
    fn test_serialize_keeps_schema_order() {
        let mut ore = Ore::new(schema(&["name", "id"]), "sample_forum");
        ore.set_index(1, "7".to_string());
        let json = serde_json::to_string(&ore).unwrap();
        assert_eq!(json, r#"{"name":null,"id":"7"}"#);
    }
}
