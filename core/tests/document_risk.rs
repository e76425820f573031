//! Document assessments, including the invoice-splitting check.

use audit_risk_core::{
    document_signals::{
        DUPLICATE_IDENTIFIER_RISK, INVOICE_SPLITTING, LOW_EXTRACTION_CONFIDENCE, MISSING_FIELDS_RISK,
        PRICE_ANOMALY_RISK, VENDOR_RISK,
    },
    evidence::FALLBACK_RECOMMENDATION,
    record::{DocumentRecord, DocumentRiskFlags, DocumentRiskInput, Transaction},
    RiskAssessment, RiskBand, RiskEngine, SubjectType,
};
use chrono::{Days, NaiveDate};

fn engine() -> RiskEngine {
    RiskEngine::standard().expect("standard engine")
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + Days::new(offset)
}

fn complete_document() -> DocumentRecord {
    DocumentRecord {
        document_id: "doc-1".into(),
        document_type: Some("invoice".into()),
        vendor_id: Some("v-9".into()),
        vendor_name: Some("Northwind Traders".into()),
        amount: Some(48_000.0),
        document_number: Some("INV-0042".into()),
        date: Some(day(30)),
        flags: DocumentRiskFlags {
            duplicate_identifier_risk: Some(false),
            price_anomaly_risk: Some(false),
            vendor_risk: Some(false),
            missing_fields_risk: Some(false),
        },
        confidence: Some(0.92),
    }
}

fn prior(id: &str, vendor: &str, offset: u64) -> Transaction {
    Transaction {
        transaction_id: id.into(),
        vendor_id: vendor.into(),
        date: day(offset),
        amount: Some(45_000.0),
        department: Some("Works".into()),
        market_reference: None,
    }
}

fn assess(document: DocumentRecord, prior_transactions: Vec<Transaction>) -> RiskAssessment {
    engine().assess_document(&DocumentRiskInput {
        document,
        prior_transactions,
    })
}

fn triggered(a: &RiskAssessment) -> Vec<&str> {
    a.triggered_signals().map(|s| s.name.as_str()).collect()
}

#[test]
fn clean_document_has_no_findings() {
    let a = assess(complete_document(), Vec::new());
    assert_eq!(a.subject_type, SubjectType::Document);
    assert_eq!(a.score, 0);
    assert_eq!(a.band, RiskBand::Low);
    assert!(a.findings.is_empty());
    assert!(a.compliance_issues.is_empty());
    assert_eq!(a.recommendations, vec![FALLBACK_RECOMMENDATION.to_string()]);
}

#[test]
fn upstream_flags_pass_through() {
    let mut doc = complete_document();
    doc.flags.duplicate_identifier_risk = Some(true);
    doc.flags.price_anomaly_risk = Some(true);
    doc.flags.vendor_risk = Some(true);
    let a = assess(doc, Vec::new());
    assert_eq!(triggered(&a), vec![DUPLICATE_IDENTIFIER_RISK, PRICE_ANOMALY_RISK, VENDOR_RISK]);
    assert_eq!(a.score, 80);
    assert_eq!(a.band, RiskBand::Critical);
    assert_eq!(a.findings.len(), 3);
    assert_eq!(a.recommendations.len(), 3);
}

#[test]
fn absent_missing_fields_flag_is_derived() {
    let mut doc = complete_document();
    doc.flags.missing_fields_risk = None;
    doc.vendor_name = None;
    let a = assess(doc, Vec::new());
    assert_eq!(triggered(&a), vec![MISSING_FIELDS_RISK]);

    let mut doc = complete_document();
    doc.flags.missing_fields_risk = None;
    let a = assess(doc, Vec::new());
    assert!(triggered(&a).is_empty());
}

/// A bare record with nothing but an id still yields an assessment.
#[test]
fn bare_document_degrades_gracefully() {
    let doc = DocumentRecord {
        document_id: "doc-empty".into(),
        document_type: None,
        vendor_id: None,
        vendor_name: None,
        amount: None,
        document_number: None,
        date: None,
        flags: DocumentRiskFlags::default(),
        confidence: None,
    };
    let a = assess(doc, vec![prior("t-1", "v-9", 0), prior("t-2", "v-9", 1), prior("t-3", "v-9", 2)]);
    assert_eq!(triggered(&a), vec![MISSING_FIELDS_RISK, LOW_EXTRACTION_CONFIDENCE]);
    assert_eq!(a.score, 30);
    assert!(!a.recommendations.is_empty());
}

#[test]
fn confidence_is_clamped_before_comparison() {
    let mut doc = complete_document();
    doc.confidence = Some(7.5);
    assert!(triggered(&assess(doc.clone(), Vec::new())).is_empty());

    doc.confidence = Some(0.49);
    assert_eq!(triggered(&assess(doc, Vec::new())), vec![LOW_EXTRACTION_CONFIDENCE]);
}

/// Older history spans weeks but the nearest three invoices span 6 days.
#[test]
fn invoice_splitting_triggers_within_window() {
    let priors = vec![
        prior("t-1", "v-9", 0),
        prior("t-2", "v-9", 14),
        prior("t-3", "v-9", 18),
        prior("t-4", "v-9", 20),
    ];
    let a = assess(complete_document(), priors);
    assert_eq!(triggered(&a), vec![INVOICE_SPLITTING]);
    assert_eq!(a.score, 20);

    assert_eq!(a.compliance_issues.len(), 1);
    let issue = &a.compliance_issues[0];
    assert_eq!(issue.issue_type, "possible invoice splitting");
    assert_eq!(issue.related_ids, vec!["t-4", "t-3", "t-2"]);
    assert!(a.findings.iter().all(|f| f.category != "possible invoice splitting"));
}

#[test]
fn invoice_splitting_not_triggered_at_eight_days() {
    let priors = vec![prior("t-1", "v-9", 10), prior("t-2", "v-9", 14), prior("t-3", "v-9", 18)];
    let a = assess(complete_document(), priors);
    assert!(triggered(&a).is_empty());
    assert!(a.compliance_issues.is_empty());
}

#[test]
fn three_invoices_spanning_ten_days_are_not_split() {
    let priors = vec![prior("t-1", "v-9", 0), prior("t-2", "v-9", 5), prior("t-3", "v-9", 10)];
    assert!(triggered(&assess(complete_document(), priors)).is_empty());
}

#[test]
fn invoice_splitting_ignores_other_vendors_and_later_dates() {
    let priors = vec![
        prior("t-1", "v-9", 20),
        prior("t-2", "other", 21),
        prior("t-3", "other", 22),
        prior("t-4", "v-9", 40),
        prior("t-5", "v-9", 41),
    ];
    let a = assess(complete_document(), priors);
    assert!(triggered(&a).is_empty());
}

#[test]
fn invoice_splitting_skipped_without_vendor_id() {
    let mut doc = complete_document();
    doc.vendor_id = None;
    let priors = vec![prior("t-1", "v-9", 20), prior("t-2", "v-9", 21), prior("t-3", "v-9", 22)];
    assert!(triggered(&assess(doc, priors)).is_empty());
}
