//! Document signal extractor.
//!
//! The four risk flags are computed upstream (during extraction) and
//! passed through. Two signals are derived here: low extraction
//! confidence, and possible invoice splitting against the vendor's
//! prior transactions.

use crate::{
    assessment::ComplianceIssue,
    config::DocumentScoringConfig,
    extractor::SignalExtractor,
    pattern_detector::recent_window_span,
    record::{DocumentRecord, DocumentRiskInput, Transaction},
    scoring::BandThresholds,
    signal::SignalSet,
    types::Score,
};

pub const DUPLICATE_IDENTIFIER_RISK: &str = "duplicate_identifier_risk";
pub const PRICE_ANOMALY_RISK: &str = "price_anomaly_risk";
pub const VENDOR_RISK: &str = "vendor_risk";
pub const MISSING_FIELDS_RISK: &str = "missing_fields_risk";
pub const LOW_EXTRACTION_CONFIDENCE: &str = "low_extraction_confidence";
pub const INVOICE_SPLITTING: &str = "invoice_splitting";

pub struct DocumentSignals {
    config: DocumentScoringConfig,
}

impl DocumentSignals {
    pub fn new(config: DocumentScoringConfig) -> Self {
        Self { config }
    }

    /// The `lookback` most recent prior transactions of the document's
    /// vendor, newest first. Empty when the document names no vendor.
    fn recent_vendor_transactions<'a>(&self, input: &'a DocumentRiskInput) -> Vec<&'a Transaction> {
        let doc = &input.document;
        let Some(vendor_id) = doc.vendor_id.as_deref() else {
            return Vec::new();
        };
        let mut prior: Vec<&Transaction> = input
            .prior_transactions
            .iter()
            .filter(|t| t.vendor_id == vendor_id)
            .filter(|t| doc.date.map_or(true, |d| t.date <= d))
            .collect();
        prior.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        prior.truncate(self.config.invoice_split.lookback);
        prior
    }
}

/// Absent upstream flag: derive it from the record itself.
fn fields_missing(doc: &DocumentRecord) -> bool {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    blank(&doc.vendor_name) || blank(&doc.document_number) || doc.amount.is_none()
}

fn flag_detail(flag: Option<bool>, raised: &str) -> String {
    match flag {
        Some(true) => raised.to_string(),
        Some(false) => "not raised during extraction".to_string(),
        None => "not reported by extraction".to_string(),
    }
}

impl SignalExtractor for DocumentSignals {
    type Record = DocumentRiskInput;

    fn domain(&self) -> &'static str {
        "document"
    }

    fn base_score(&self) -> Score {
        self.config.base_score
    }

    fn bands(&self) -> &BandThresholds {
        &self.config.bands
    }

    fn extract(&self, input: &DocumentRiskInput) -> SignalSet {
        let doc = &input.document;
        let flags = &doc.flags;
        let w = &self.config.weights;
        let mut signals = SignalSet::new();

        let number = doc.document_number.as_deref().unwrap_or("(none)");
        signals.push(
            DUPLICATE_IDENTIFIER_RISK,
            flags.duplicate_identifier_risk.unwrap_or(false),
            w.duplicate_identifier_risk,
            flag_detail(
                flags.duplicate_identifier_risk,
                &format!("document number {number} matches an earlier submission"),
            ),
        );
        signals.push(
            PRICE_ANOMALY_RISK,
            flags.price_anomaly_risk.unwrap_or(false),
            w.price_anomaly_risk,
            flag_detail(flags.price_anomaly_risk, "billed prices deviate from expected rates"),
        );
        let vendor = doc.vendor_name.as_deref().unwrap_or("unnamed vendor");
        signals.push(
            VENDOR_RISK,
            flags.vendor_risk.unwrap_or(false),
            w.vendor_risk,
            flag_detail(flags.vendor_risk, &format!("{vendor} flagged as high risk")),
        );

        let (missing, detail) = match flags.missing_fields_risk {
            Some(flag) => (flag, flag_detail(Some(flag), "required fields absent from document")),
            None => {
                let missing = fields_missing(doc);
                let detail = if missing {
                    "vendor name, document number, or amount absent".to_string()
                } else {
                    "all required fields present".to_string()
                };
                (missing, detail)
            }
        };
        signals.push(MISSING_FIELDS_RISK, missing, w.missing_fields_risk, detail);

        let confidence = doc
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        signals.push(
            LOW_EXTRACTION_CONFIDENCE,
            confidence < self.config.min_confidence,
            w.low_extraction_confidence,
            format!(
                "extraction confidence {:.0}% (minimum {:.0}%)",
                confidence * 100.0,
                self.config.min_confidence * 100.0
            ),
        );

        let window = self.config.invoice_split;
        let recent = self.recent_vendor_transactions(input);
        let (splitting, detail) = match recent_window_span(recent.iter().map(|t| t.date), window.lookback) {
            Some(days) => (
                days < window.window_days,
                format!(
                    "{} most recent invoices from this vendor span {days} days (window {} days)",
                    window.lookback, window.window_days
                ),
            ),
            None => (
                false,
                format!("fewer than {} prior transactions from this vendor", window.lookback),
            ),
        };
        signals.push(INVOICE_SPLITTING, splitting, w.invoice_splitting, detail);

        signals
    }

    fn compliance_issues(&self, input: &DocumentRiskInput, signals: &SignalSet) -> Vec<ComplianceIssue> {
        if !signals.is_triggered(INVOICE_SPLITTING) {
            return Vec::new();
        }
        let recent = self.recent_vendor_transactions(input);
        let vendor = input.document.vendor_id.as_deref().unwrap_or_default();
        vec![ComplianceIssue {
            issue_type: "possible invoice splitting".to_string(),
            description: format!(
                "{} invoices from vendor {vendor} fall within {} days; amounts may have been split \
                 to stay under approval limits",
                recent.len(),
                self.config.invoice_split.window_days
            ),
            related_ids: recent.iter().map(|t| t.transaction_id.clone()).collect(),
        }]
    }
}
