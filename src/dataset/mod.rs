//! Labeled samples and dataset validation.
//!
//! A dataset is a JSON array of [`Sample`] values supplied by the surrounding
//! application. This module parses it, checks the invariants training relies
//! on, and derives the tenant grouping key used by metric aggregation.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlantillaError, Result};

/// One labeled training sample.
///
/// `template_id` is the classification target. The tenant identifiers are
/// carried through to metric aggregation only and never influence the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Raw extracted document text.
    pub text: String,
    /// Template identity this text belongs to.
    pub template_id: i64,
    /// Owning organization, if known.
    #[serde(default)]
    pub organization_id: Option<i64>,
    /// Owning company, if known.
    #[serde(default)]
    pub company_id: Option<i64>,
}

impl Sample {
    /// Tenant grouping key for this sample.
    pub fn tenant_key(&self) -> TenantKey {
        TenantKey {
            organization_id: self.organization_id,
            company_id: self.company_id,
        }
    }
}

/// Derived, non-owning aggregation key for an organization/company pairing.
///
/// Used only for grouping in metrics, never for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TenantKey {
    pub organization_id: Option<i64>,
    pub company_id: Option<i64>,
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let org = self
            .organization_id
            .map_or_else(|| "null".to_string(), |id| id.to_string());
        let comp = self
            .company_id
            .map_or_else(|| "null".to_string(), |id| id.to_string());
        write!(f, "org:{org},comp:{comp}")
    }
}

/// Load a dataset from a JSON file and validate it.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let content = fs::read_to_string(path.as_ref())?;
    let samples: Vec<Sample> = serde_json::from_str(&content)
        .map_err(|e| PlantillaError::validation(format!("malformed dataset: {e}")))?;
    validate_samples(&samples)?;
    Ok(samples)
}

/// Check the dataset invariants training relies on.
///
/// Fails when any sample has blank text or when fewer than two distinct
/// template identities are present.
pub fn validate_samples(samples: &[Sample]) -> Result<()> {
    for (i, sample) in samples.iter().enumerate() {
        if sample.text.trim().is_empty() {
            return Err(PlantillaError::validation(format!(
                "sample {i} has empty text"
            )));
        }
    }

    let distinct: BTreeSet<i64> = samples.iter().map(|s| s.template_id).collect();
    if distinct.len() < 2 {
        return Err(PlantillaError::validation(format!(
            "training requires at least 2 distinct templates, got {}",
            distinct.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(text: &str, template_id: i64) -> Sample {
        Sample {
            text: text.to_string(),
            template_id,
            organization_id: None,
            company_id: None,
        }
    }

    #[test]
    fn test_validate_accepts_two_templates() {
        let samples = vec![sample("FACTURA A", 1), sample("BOLETA B", 2)];
        assert!(validate_samples(&samples).is_ok());
    }

    #[test]
    fn test_validate_rejects_single_template() {
        let samples = vec![sample("FACTURA A", 1), sample("FACTURA A v2", 1)];
        let err = validate_samples(&samples).unwrap_err();
        assert!(err.to_string().contains("at least 2 distinct templates"));
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let samples = vec![sample("   ", 1), sample("BOLETA B", 2)];
        assert!(validate_samples(&samples).is_err());
    }

    #[test]
    fn test_sample_deserializes_camel_case() {
        let json = r#"{"text":"FACTURA A","templateId":7,"organizationId":3}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.template_id, 7);
        assert_eq!(sample.organization_id, Some(3));
        assert_eq!(sample.company_id, None);
    }

    #[test]
    fn test_tenant_key_display() {
        let key = TenantKey {
            organization_id: Some(3),
            company_id: None,
        };
        assert_eq!(key.to_string(), "org:3,comp:null");
    }
}
