//! Capability filtering of the provider's model listing.

use std::collections::BTreeSet;

use crate::config::GuardConfig;
use crate::provider::ListedModel;

/// Namespace prefix the listing puts in front of every model name.
pub const MODEL_NAMESPACE: &str = "models/";

/// A model found through discovery, with what it says it can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub identifier: String,
    pub capabilities: BTreeSet<String>,
}

impl ModelCandidate {
    pub fn from_listing(model: &ListedModel) -> Self {
        Self {
            identifier: strip_namespace(&model.name).to_string(),
            capabilities: model.supported_generation_methods.iter().cloned().collect(),
        }
    }

    pub fn supports(&self, method: &str) -> bool {
        self.capabilities.contains(method)
    }
}

pub fn strip_namespace(name: &str) -> &str {
    name.strip_prefix(MODEL_NAMESPACE).unwrap_or(name)
}

/// Which listed models are worth trying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFilter {
    /// Substring of the model name that marks the expected family.
    pub family: String,
    /// Generation method the model must declare.
    pub method: String,
}

impl DiscoveryFilter {
    pub fn new(family: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            method: method.into(),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.model_family.clone(), config.generation_method.clone())
    }

    pub fn accepts(&self, model: &ListedModel) -> bool {
        model.name.contains(&self.family)
            && model.supported_generation_methods.iter().any(|m| *m == self.method)
    }

    /// Listing order is kept; repeated identifiers appear once.
    pub fn apply(&self, models: &[ListedModel]) -> Vec<ModelCandidate> {
        let mut seen = BTreeSet::new();
        models
            .iter()
            .filter(|m| self.accepts(m))
            .map(ModelCandidate::from_listing)
            .filter(|c| seen.insert(c.identifier.clone()))
            .collect()
    }
}

impl Default for DiscoveryFilter {
    fn default() -> Self {
        Self::new("gemini", "generateContent")
    }
}
