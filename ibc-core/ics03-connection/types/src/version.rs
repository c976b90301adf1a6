//! Defines connection versioning type and functions

use core::fmt::Display;

use ibc_primitives::prelude::*;

use crate::error::ConnectionError;

/// Stores the identifier and the features supported by a version
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    /// unique version identifier
    identifier: String,
    /// list of features compatible with the specified identifier
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: String, features: Vec<String>) -> Self {
        Self {
            identifier,
            features,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Checks whether the given feature is supported in this version
    pub fn verify_feature_supported(&self, feature: &str) -> Result<(), ConnectionError> {
        if !self.features.iter().any(|f| f == feature) {
            return Err(ConnectionError::FeatureNotSupported {
                feature: feature.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the lists of supported versions
    pub fn compatibles() -> Vec<Self> {
        vec![Self {
            identifier: "1".to_string(),
            features: vec!["ORDER_ORDERED".to_string(), "ORDER_UNORDERED".to_string()],
        }]
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Version {{ identifier: {}, features: [{}] }}",
            self.identifier,
            self.features.join(", ")
        )
    }
}
