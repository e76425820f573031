//! Output value objects: assessments, findings, and batch patterns.
//!
//! Every value here is created fresh per call and never mutated after
//! construction. Persisting, rendering, or alerting on them is the
//! caller's job.

use crate::{
    signal::Signal,
    types::{Score, SubjectId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    Vendor,
    TransactionBatch,
    Document,
    NewsItem,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::TransactionBatch => "transaction-batch",
            Self::Document => "document",
            Self::NewsItem => "news-item",
        }
    }
}

/// Ordinal risk band. Ordering follows severity: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence for one triggered signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub signal: String,
    pub category: String,
    pub severity: RiskBand,
    pub description: String,
}

/// A regulatory concern raised alongside, not inside, the ordinary findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    pub issue_type: String,
    pub description: String,
    pub related_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub subject_id: SubjectId,
    pub subject_type: SubjectType,
    pub score: Score,
    pub band: RiskBand,
    pub signals: Vec<Signal>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_issues: Vec<ComplianceIssue>,
}

impl RiskAssessment {
    /// Whether the caller is expected to raise an alert for this subject.
    pub fn requires_alert(&self) -> bool {
        self.band >= RiskBand::High
    }

    /// Explanation payload for the caller's alert record, or `None` when
    /// the band is below the alerting boundary.
    pub fn alert_payload(&self) -> Option<AlertPayload> {
        self.requires_alert().then(|| AlertPayload {
            subject_id: self.subject_id.clone(),
            subject_type: self.subject_type,
            score: self.score,
            band: self.band,
            signals: self.signals.clone(),
            recommendations: self.recommendations.clone(),
        })
    }

    pub fn triggered_signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.triggered)
    }
}

/// Data handed to the alerting collaborator, carried over verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub subject_id: SubjectId,
    pub subject_type: SubjectType,
    pub score: Score,
    pub band: RiskBand,
    pub signals: Vec<Signal>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    #[serde(rename = "Multiple Department Payments")]
    MultipleDepartmentPayments,
    #[serde(rename = "Rapid Transaction Sequence")]
    RapidTransactionSequence,
    #[serde(rename = "Duplicate Document Submission")]
    DuplicateDocumentSubmission,
}

impl PatternKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleDepartmentPayments => "Multiple Department Payments",
            Self::RapidTransactionSequence => "Rapid Transaction Sequence",
            Self::DuplicateDocumentSubmission => "Duplicate Document Submission",
        }
    }
}

/// A cross-record finding over a batch. Not tied to a single subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub severity: RiskBand,
    pub description: String,
    pub affected_subject_ids: BTreeSet<SubjectId>,
}
