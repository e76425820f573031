//! Typed input records supplied by the calling application.
//!
//! RULE: The engine never fetches records. Whatever the record provider
//! hands over is scored as-is; absent optional fields are treated as
//! zero / empty by the extractors, never as errors.

use crate::types::{Amount, SubjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorProfile {
    pub vendor_id: SubjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Number of compliance documents held for this vendor.
    #[serde(default)]
    pub documents_on_file: Option<u32>,
    /// Overrides the configured documentation requirement when present.
    #[serde(default)]
    pub required_documents: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub vendor_id: SubjectId,
    pub date: NaiveDate,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub department: Option<String>,
    /// Reference market price for the goods or services billed.
    #[serde(default)]
    pub market_reference: Option<Amount>,
}

impl Transaction {
    /// Amount with the missing-means-zero rule applied.
    pub fn amount_or_zero(&self) -> Amount {
        match self.amount {
            Some(a) if a.is_finite() => a,
            _ => 0.0,
        }
    }

    /// Department with blank names treated as absent.
    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Everything needed to assess one vendor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorRiskInput {
    pub vendor_id: SubjectId,
    #[serde(default)]
    pub profile: Option<VendorProfile>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Risk flags computed upstream during document extraction.
/// `None` means the upstream step did not report the flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentRiskFlags {
    #[serde(default)]
    pub duplicate_identifier_risk: Option<bool>,
    #[serde(default)]
    pub price_anomaly_risk: Option<bool>,
    #[serde(default)]
    pub vendor_risk: Option<bool>,
    #[serde(default)]
    pub missing_fields_risk: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    pub document_id: SubjectId,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<SubjectId>,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub flags: DocumentRiskFlags,
    /// Extraction confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl DocumentRecord {
    /// Document number reduced to lowercase alphanumerics, used to spot
    /// resubmissions that differ only in punctuation or case.
    pub fn normalized_number(&self) -> Option<String> {
        let normalized: String = self
            .document_number
            .as_deref()?
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        (!normalized.is_empty()).then_some(normalized)
    }
}

/// A document plus the prior transactions of its vendor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRiskInput {
    pub document: DocumentRecord,
    #[serde(default)]
    pub prior_transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub article_id: SubjectId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewsArticle {
    /// Title and description joined and lowercased for keyword matching.
    pub fn searchable_text(&self) -> String {
        let title = self.title.as_deref().unwrap_or_default();
        let description = self.description.as_deref().unwrap_or_default();
        format!("{title} {description}").to_lowercase()
    }
}
