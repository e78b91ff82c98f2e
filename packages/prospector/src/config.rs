//! Configuration constants, site configuration and run files.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProspectorError, Result};
use crate::export::ExportFormat;

/// Class carried by the synthetic element that marks the end of a page.
pub const PAGE_END_CLASS: &str = "page-end";

/// Default name of the site configuration file.
pub const CONFIG_FILE: &str = "website_config.json";

/// Keys every site entry in the configuration file must define.
pub const REQUIRED_CONFIG_KEYS: [&str; 3] = ["source", "source_type", "attributes"];

/// HTTP timeout in seconds for remote sources.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Page ceiling used when a site does not configure `max_pages`.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Directory exports are written to unless overridden.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Kind of document source a site is mined from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// A local HTML file.
    HtmlFile,
    /// A remote page fetched over HTTP(S).
    HttpsUrl,
}

impl SourceType {
    /// Name used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::HtmlFile => "html_file",
            SourceType::HttpsUrl => "https_url",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a single site, as stored in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name (the key of the entry in the configuration file).
    #[serde(skip)]
    pub name: String,

    /// Path or URL of the first page.
    pub source: String,

    /// How `source` is loaded.
    pub source_type: SourceType,

    /// Ordered attribute schema. The first attribute marks the start of a record.
    pub attributes: Vec<String>,

    /// Site specialization used to classify elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospector_class: Option<String>,

    /// Page ceiling for this site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

impl SiteConfig {
    /// Create a site configuration without a specialization or page ceiling.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        source_type: SourceType,
        attributes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            source_type,
            attributes: attributes.into_iter().map(Into::into).collect(),
            prospector_class: None,
            max_pages: None,
        }
    }

    /// Set the site specialization.
    #[must_use]
    pub fn with_prospector_class(mut self, class: impl Into<String>) -> Self {
        self.prospector_class = Some(class.into());
        self
    }

    /// Set the page ceiling.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// Load the configuration of `site_name` from a JSON configuration file.
///
/// Relative `html_file` sources are resolved against the directory of the
/// configuration file.
///
/// # Errors
/// Returns `InvalidConfig` if the file cannot be read, the site is not
/// present, a required key is missing or a value has the wrong shape.
pub fn load_site_config(path: &Path, site_name: &str) -> Result<SiteConfig> {
    let text = fs::read_to_string(path).map_err(|e| {
        ProspectorError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
    })?;

    let sites: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .map_err(|e| {
            ProspectorError::InvalidConfig(format!(
                "{} is not a JSON object of sites: {e}",
                path.display()
            ))
        })?;

    let entry = sites.get(site_name).ok_or_else(|| {
        ProspectorError::InvalidConfig(format!("{site_name} not found in {}", path.display()))
    })?;

    let fields = entry.as_object().ok_or_else(|| {
        ProspectorError::InvalidConfig(format!("{site_name} must be a JSON object"))
    })?;

    let missing: Vec<&str> = REQUIRED_CONFIG_KEYS
        .iter()
        .copied()
        .filter(|key| !fields.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ProspectorError::InvalidConfig(format!(
            "{site_name} is missing the following keys: {}",
            missing.join(", ")
        )));
    }

    let mut config: SiteConfig = serde_json::from_value(entry.clone())
        .map_err(|e| ProspectorError::InvalidConfig(format!("{site_name}: {e}")))?;
    config.name = site_name.to_string();

    let mut seen = HashSet::new();
    if let Some(duplicate) = config.attributes.iter().find(|a| !seen.insert(a.as_str())) {
        return Err(ProspectorError::InvalidConfig(format!(
            "{site_name} lists attribute `{duplicate}` more than once"
        )));
    }

    if config.source_type == SourceType::HtmlFile {
        let source = Path::new(&config.source);
        if source.is_relative() {
            if let Some(dir) = path.parent() {
                config.source = dir.join(source).to_string_lossy().into_owned();
            }
        }
    }

    Ok(config)
}

/// Defensive ceilings for a mining session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineLimits {
    /// Highest page index pagination may reach.
    pub max_pages: usize,
    /// Maximum number of loop iterations, if bounded.
    pub max_iterations: Option<u64>,
}

impl MineLimits {
    /// Limits for a configured site.
    #[must_use]
    pub fn for_site(config: &SiteConfig) -> Self {
        Self {
            max_pages: config.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            max_iterations: None,
        }
    }
}

impl Default for MineLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_iterations: None,
        }
    }
}

/// A run file listing the sites to mine and their export formats.
///
/// ```yaml
/// websites:
///   classic_cars:
///     filetype: csv
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub websites: BTreeMap<String, RunTarget>,
}

/// Export settings for one site in a run file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunTarget {
    #[serde(default)]
    pub filetype: ExportFormat,
}

/// Load a YAML run file.
pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml_ng::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_site_config() {
        let file = write_config(
            r#"{"forum": {"source": "https://example.com/t?t=1", "source_type": "https_url",
                "attributes": ["id", "body"], "prospector_class": "ClassicCars"}}"#,
        );
        let config = load_site_config(file.path(), "forum").unwrap();
        assert_eq!(config.name, "forum");
        assert_eq!(config.source, "https://example.com/t?t=1");
        assert_eq!(config.source_type, SourceType::HttpsUrl);
        assert_eq!(config.attributes, vec!["id", "body"]);
        assert_eq!(config.prospector_class.as_deref(), Some("ClassicCars"));
        assert_eq!(config.max_pages, None);
    }

    #[test]
    fn test_missing_site() {
        let file = write_config(r#"{"forum": {}}"#);
        let err = load_site_config(file.path(), "google").unwrap_err();
        assert!(err.to_string().contains("google not found"));
    }

    #[test]
    fn test_missing_keys_are_named() {
        let file = write_config(r#"{"forum": {"source": "a.html"}}"#);
        let err = load_site_config(file.path(), "forum").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing the following keys"));
        assert!(message.contains("source_type"));
        assert!(message.contains("attributes"));
        assert!(!message.contains("source,"));
    }

    #[test]
    fn test_unknown_source_type() {
        let file = write_config(
            r#"{"forum": {"source": "a.html", "source_type": "html", "attributes": []}}"#,
        );
        let err = load_site_config(file.path(), "forum").unwrap_err();
        assert!(matches!(err, ProspectorError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_attribute() {
        let file = write_config(
            r#"{"forum": {"source": "a.html", "source_type": "html_file", "attributes": ["id", "id"]}}"#,
        );
        let err = load_site_config(file.path(), "forum").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_relative_html_file_is_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"forum": {"source": "forum.html", "source_type": "html_file", "attributes": ["id"]}}"#,
        )
        .unwrap();

        let config = load_site_config(&path, "forum").unwrap();
        assert_eq!(Path::new(&config.source), dir.path().join("forum.html"));
    }

    #[test]
    fn test_limits_for_site() {
        let config = SiteConfig::new("forum", "a.html", SourceType::HtmlFile, ["id"]);
        assert_eq!(MineLimits::for_site(&config).max_pages, DEFAULT_MAX_PAGES);

        let config = config.with_max_pages(3);
        assert_eq!(MineLimits::for_site(&config).max_pages, 3);
    }

    #[test]
    fn test_load_run_config() {
        let file = write_config("websites:\n  classic_cars:\n    filetype: json\n  other: {}\n");
        let run = load_run_config(file.path()).unwrap();
        assert_eq!(run.websites.len(), 2);
        assert_eq!(run.websites["classic_cars"].filetype, ExportFormat::Json);
        assert_eq!(run.websites["other"].filetype, ExportFormat::Csv);
    }
}
