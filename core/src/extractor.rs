//! Signal extractor trait.
//!
//! RULE: Every domain extractor implements SignalExtractor.
//! Extractors are pure: no I/O, no randomness, no shared mutable state.
//! They are total over their input and degrade missing fields to
//! untriggered signals instead of failing.

use crate::{
    assessment::ComplianceIssue,
    scoring::BandThresholds,
    signal::SignalSet,
    types::Score,
};

/// The contract every domain extractor must fulfill.
pub trait SignalExtractor: Send + Sync {
    /// The record shape this extractor reads.
    type Record: ?Sized;

    /// Unique stable name for this domain.
    fn domain(&self) -> &'static str;

    /// Score the aggregator starts from before any signal is added.
    fn base_score(&self) -> Score;

    /// Band table used to classify this domain's scores.
    fn bands(&self) -> &BandThresholds;

    /// Turn one record into signals, in aggregation order.
    fn extract(&self, record: &Self::Record) -> SignalSet;

    /// Compliance concerns raised by the extracted signals.
    /// Most domains have none.
    fn compliance_issues(&self, _record: &Self::Record, _signals: &SignalSet) -> Vec<ComplianceIssue> {
        Vec::new()
    }
}
