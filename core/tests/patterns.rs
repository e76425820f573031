//! Batch pattern detection scenarios.

use audit_risk_core::{
    config::PatternConfig,
    pattern_detector::PatternDetector,
    record::{DocumentRecord, DocumentRiskFlags, Transaction},
    PatternKind, RiskBand, RiskEngine,
};
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

fn engine() -> RiskEngine {
    RiskEngine::standard().expect("standard engine")
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Days::new(offset)
}

fn txn(id: &str, vendor: &str, offset: u64, amount: f64, department: Option<&str>) -> Transaction {
    Transaction {
        transaction_id: id.into(),
        vendor_id: vendor.into(),
        date: day(offset),
        amount: Some(amount),
        department: department.map(Into::into),
        market_reference: None,
    }
}

fn same_day_split(per_payment: f64) -> Vec<Transaction> {
    vec![
        txn("t-1", "V", 0, per_payment, Some("Finance")),
        txn("t-2", "V", 0, per_payment, Some("Health")),
        txn("t-3", "V", 0, per_payment, Some("Education")),
        txn("t-4", "V", 0, per_payment, Some("Finance")),
    ]
}

#[test]
fn multiple_department_payments_flagged_over_threshold() {
    let patterns = engine().detect_patterns(&same_day_split(150_000.0));
    assert_eq!(patterns.len(), 1);
    let p = &patterns[0];
    assert_eq!(p.kind, PatternKind::MultipleDepartmentPayments);
    assert_eq!(p.severity, RiskBand::High);
    assert_eq!(p.affected_subject_ids, BTreeSet::from(["V".to_string()]));
    assert!(p.description.contains("600,000.00"), "{}", p.description);
    assert!(p.description.contains("Education, Finance, Health"), "{}", p.description);
}

#[test]
fn multiple_department_payments_not_flagged_under_threshold() {
    assert!(engine().detect_patterns(&same_day_split(100_000.0)).is_empty());
}

#[test]
fn two_departments_are_not_enough() {
    let txns = vec![
        txn("t-1", "V", 0, 900_000.0, Some("Finance")),
        txn("t-2", "V", 0, 900_000.0, Some("Health")),
        txn("t-3", "V", 0, 900_000.0, None),
    ];
    assert!(engine().detect_patterns(&txns).is_empty());
}

/// One department spelled three ways is still one department.
#[test]
fn department_names_compare_case_insensitively() {
    let txns = vec![
        txn("t-1", "V", 0, 300_000.0, Some("Finance")),
        txn("t-2", "V", 0, 300_000.0, Some("finance")),
        txn("t-3", "V", 0, 300_000.0, Some("FINANCE ")),
    ];
    assert!(engine().detect_patterns(&txns).is_empty());

    let mut mixed = txns;
    mixed.push(txn("t-4", "V", 0, 10.0, Some("Health")));
    mixed.push(txn("t-5", "V", 0, 10.0, Some("EDUCATION")));
    let patterns = PatternDetector::new(PatternConfig::default()).detect_multiple_department_payments(&mixed);
    assert_eq!(patterns.len(), 1);
    let description = &patterns[0].description;
    assert!(description.contains("3 departments"), "{description}");
    assert!(description.contains("(EDUCATION, Finance, Health)"), "{description}");
}

/// A same-day credit does not pull the group total under the threshold.
#[test]
fn credits_do_not_offset_department_payments() {
    let txns = vec![
        txn("t-1", "V", 0, 400_000.0, Some("Finance")),
        txn("t-2", "V", 0, 300_000.0, Some("Health")),
        txn("t-3", "V", 0, 200_000.0, Some("Education")),
        txn("t-4", "V", 0, -500_000.0, Some("Finance")),
    ];
    let patterns = engine().detect_patterns(&txns);
    assert_eq!(patterns.len(), 1);
    assert!(patterns[0].description.contains("900,000.00"), "{}", patterns[0].description);
}

#[test]
fn departments_on_different_days_are_separate_groups() {
    let txns = vec![
        txn("t-1", "V", 0, 300_000.0, Some("Finance")),
        txn("t-2", "V", 0, 300_000.0, Some("Health")),
        txn("t-3", "V", 1, 300_000.0, Some("Education")),
    ];
    assert!(engine().detect_patterns(&txns).is_empty());
}

#[test]
fn rapid_sequence_flagged_for_daily_transactions() {
    let txns: Vec<Transaction> = (0..5)
        .map(|d| txn(&format!("t-{d}"), "V", d, 1_000.0, None))
        .collect();
    let patterns = engine().detect_patterns(&txns);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].kind, PatternKind::RapidTransactionSequence);
    assert_eq!(patterns[0].severity, RiskBand::Medium);
    assert!(patterns[0].description.contains("1.0 days"), "{}", patterns[0].description);
}

#[test]
fn rapid_sequence_not_flagged_for_ten_day_gaps() {
    let txns: Vec<Transaction> = (0..5)
        .map(|i| txn(&format!("t-{i}"), "V", i * 10, 1_000.0, None))
        .collect();
    assert!(engine().detect_patterns(&txns).is_empty());
}

#[test]
fn rapid_sequence_gap_of_exactly_two_is_not_flagged() {
    let txns: Vec<Transaction> = (0..5)
        .map(|i| txn(&format!("t-{i}"), "V", i * 2, 1_000.0, None))
        .collect();
    assert!(engine().detect_patterns(&txns).is_empty());
}

#[test]
fn rapid_sequence_skips_small_groups() {
    let txns: Vec<Transaction> = (0..4)
        .map(|d| txn(&format!("t-{d}"), "V", d, 1_000.0, None))
        .collect();
    assert!(engine().detect_patterns(&txns).is_empty());
}

/// Input order does not matter; dates are sorted before measuring.
#[test]
fn rapid_sequence_sorts_dates() {
    let txns: Vec<Transaction> = [4, 0, 3, 1, 2]
        .into_iter()
        .map(|d| txn(&format!("t-{d}"), "W", d, 1_000.0, None))
        .collect();
    assert_eq!(engine().detect_patterns(&txns).len(), 1);
}

#[test]
fn both_patterns_reported_for_one_vendor() {
    let mut txns = same_day_split(150_000.0);
    txns.push(txn("t-5", "V", 1, 10.0, None));
    let kinds: Vec<PatternKind> = engine().detect_patterns(&txns).iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![PatternKind::MultipleDepartmentPayments, PatternKind::RapidTransactionSequence]
    );
}

fn document(id: &str, vendor: Option<&str>, number: Option<&str>) -> DocumentRecord {
    DocumentRecord {
        document_id: id.into(),
        document_type: Some("invoice".into()),
        vendor_id: vendor.map(Into::into),
        vendor_name: None,
        amount: Some(1_000.0),
        document_number: number.map(Into::into),
        date: None,
        flags: DocumentRiskFlags::default(),
        confidence: Some(0.9),
    }
}

#[test]
fn near_duplicate_submissions_flagged() {
    let docs = vec![
        document("d-1", Some("V"), Some("INV-001")),
        document("d-2", Some("V"), Some("inv 001")),
        document("d-3", Some("W"), Some("INV-001")),
        document("d-4", Some("V"), None),
        document("d-5", Some("V"), None),
    ];
    let patterns = engine().detect_document_patterns(&docs);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].kind, PatternKind::DuplicateDocumentSubmission);
    assert_eq!(patterns[0].severity, RiskBand::High);
    assert_eq!(
        patterns[0].affected_subject_ids,
        BTreeSet::from(["d-1".to_string(), "d-2".to_string()])
    );
}

#[test]
fn empty_batch_yields_no_patterns() {
    assert!(engine().detect_patterns(&[]).is_empty());
    assert!(engine().detect_document_patterns(&[]).is_empty());
}
