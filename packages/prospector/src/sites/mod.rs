//! Site registry: maps `prospector_class` names to site specializations.

mod classic_cars;
mod samples;

use crate::error::{ProspectorError, Result};
use crate::registry::AttributeRegistry;
use crate::site::Site;

pub use classic_cars::ClassicCars;
pub use samples::{SampleNoProcessors, SampleWithDateProcessor};

/// The unspecialized site. It registers nothing, so mining with it always
/// fails with a missing classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProspectorBase;

impl ProspectorBase {
    pub const CLASS_NAME: &'static str = "ProspectorBase";
}

impl Site for ProspectorBase {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn register(&self, _registry: &mut AttributeRegistry) {}
}

type SiteFactory = fn() -> Box<dyn Site>;

fn base() -> Box<dyn Site> {
    Box::new(ProspectorBase)
}

fn classic_cars() -> Box<dyn Site> {
    Box::new(ClassicCars)
}

fn sample_no_processors() -> Box<dyn Site> {
    Box::new(SampleNoProcessors)
}

fn sample_with_date_processor() -> Box<dyn Site> {
    Box::new(SampleWithDateProcessor)
}

/// Known site specializations by class name.
const SITES: [(&str, SiteFactory); 4] = [
    (ProspectorBase::CLASS_NAME, base),
    (ClassicCars::CLASS_NAME, classic_cars),
    (SampleNoProcessors::CLASS_NAME, sample_no_processors),
    (SampleWithDateProcessor::CLASS_NAME, sample_with_date_processor),
];

/// Names of all registered site specializations.
pub fn site_classes() -> impl Iterator<Item = &'static str> {
    SITES.iter().map(|(name, _)| *name)
}

/// Resolve a `prospector_class` to its site. A missing class means the base site.
///
/// # Errors
/// Returns `InvalidConfig` for an unknown class name.
pub fn resolve_site(class_name: Option<&str>) -> Result<Box<dyn Site>> {
    let class_name = class_name.unwrap_or(ProspectorBase::CLASS_NAME);
    SITES
        .iter()
        .find(|(name, _)| *name == class_name)
        .map(|(_, factory)| factory())
        .ok_or_else(|| {
            ProspectorError::InvalidConfig(format!(
                "unknown prospector class `{class_name}` (known: {})",
                site_classes().collect::<Vec<_>>().join(", ")
            ))
        })
}
