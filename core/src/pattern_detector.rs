//! Pattern Detector — cross-record analysis over a whole batch.
//!
//! This component:
//!   1. Flags vendors paid by many departments on the same day
//!   2. Flags vendors whose transactions arrive in rapid succession
//!   3. Flags near-duplicate document submissions
//!
//! Records are grouped by key before any analysis, so the full batch must
//! be available up front. Groups smaller than a pattern's minimum record
//! count are skipped silently. Output order is deterministic (groups are
//! kept in BTreeMaps).

use crate::{
    assessment::{Pattern, PatternKind, RiskBand},
    config::PatternConfig,
    evidence::format_amount,
    record::{DocumentRecord, Transaction},
    types::Amount,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Days between the oldest and newest of the `lookback` most recent dates.
/// Returns `None` when fewer than `lookback` dates are available.
pub fn recent_window_span<I>(dates: I, lookback: usize) -> Option<i64>
where
    I: IntoIterator<Item = NaiveDate>,
{
    if lookback == 0 {
        return None;
    }
    let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
    if dates.len() < lookback {
        return None;
    }
    dates.sort_unstable_by(|a, b| b.cmp(a));
    let newest = dates[0];
    let oldest = dates[lookback - 1];
    Some((newest - oldest).num_days())
}

/// Departments keyed case-insensitively, keeping the first spelling seen.
#[derive(Default)]
struct VendorDayGroup<'a> {
    departments: BTreeMap<String, &'a str>,
    total: Amount,
}

pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Run every transaction-level pattern over the batch.
    pub fn detect(&self, transactions: &[Transaction]) -> Vec<Pattern> {
        let mut patterns = self.detect_multiple_department_payments(transactions);
        patterns.extend(self.detect_rapid_sequences(transactions));
        log::info!(
            "pattern scan: {} transactions, {} patterns",
            transactions.len(),
            patterns.len()
        );
        patterns
    }

    /// Same vendor, same day, more than N departments, more than X in total.
    pub fn detect_multiple_department_payments(&self, transactions: &[Transaction]) -> Vec<Pattern> {
        let mut groups: BTreeMap<(&str, NaiveDate), VendorDayGroup> = BTreeMap::new();
        for txn in transactions {
            let group = groups.entry((txn.vendor_id.as_str(), txn.date)).or_default();
            if let Some(department) = txn.department_name() {
                group.departments.entry(department.to_lowercase()).or_insert(department);
            }
            // Credits do not offset payments.
            group.total += txn.amount_or_zero().max(0.0);
        }

        groups
            .into_iter()
            .filter(|(_, g)| {
                g.departments.len() > self.config.multi_department_min_departments
                    && g.total > self.config.multi_department_min_amount
            })
            .map(|((vendor_id, date), g)| {
                let departments: Vec<&str> = g.departments.values().copied().collect();
                Pattern {
                    kind: PatternKind::MultipleDepartmentPayments,
                    severity: RiskBand::High,
                    description: format!(
                        "Vendor {vendor_id} received {} from {} departments ({}) on {date}",
                        format_amount(g.total),
                        departments.len(),
                        departments.join(", "),
                    ),
                    affected_subject_ids: BTreeSet::from([vendor_id.to_string()]),
                }
            })
            .collect()
    }

    /// Average gap between a vendor's consecutive transaction dates,
    /// measured across the full span, below the configured limit.
    pub fn detect_rapid_sequences(&self, transactions: &[Transaction]) -> Vec<Pattern> {
        let mut by_vendor: BTreeMap<&str, Vec<NaiveDate>> = BTreeMap::new();
        for txn in transactions {
            by_vendor.entry(txn.vendor_id.as_str()).or_default().push(txn.date);
        }

        let min_count = self.config.rapid_sequence_min_transactions.max(2);
        let mut patterns = Vec::new();
        for (vendor_id, mut dates) in by_vendor {
            if dates.len() < min_count {
                continue;
            }
            dates.sort_unstable();
            let (first, last) = (dates[0], dates[dates.len() - 1]);
            let average_gap = (last - first).num_days() as f64 / (dates.len() - 1) as f64;

            if average_gap < self.config.rapid_sequence_max_average_gap_days {
                patterns.push(Pattern {
                    kind: PatternKind::RapidTransactionSequence,
                    severity: RiskBand::Medium,
                    description: format!(
                        "Vendor {vendor_id} has {} transactions between {first} and {last}, \
                         averaging {average_gap:.1} days apart",
                        dates.len(),
                    ),
                    affected_subject_ids: BTreeSet::from([vendor_id.to_string()]),
                });
            }
        }
        patterns
    }

    /// Documents from the same vendor sharing a normalized document number.
    pub fn detect_duplicate_submissions(&self, documents: &[DocumentRecord]) -> Vec<Pattern> {
        let mut groups: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
        for doc in documents {
            let Some(number) = doc.normalized_number() else {
                continue;
            };
            groups
                .entry((vendor_key(doc), number))
                .or_default()
                .insert(doc.document_id.clone());
        }

        let min_copies = self.config.duplicate_submission_min_copies.max(2);
        groups
            .into_iter()
            .filter(|(_, ids)| ids.len() >= min_copies)
            .map(|((vendor, number), ids)| {
                let vendor = if vendor.is_empty() { "unknown vendor".to_string() } else { vendor };
                Pattern {
                    kind: PatternKind::DuplicateDocumentSubmission,
                    severity: RiskBand::High,
                    description: format!(
                        "{} documents from {vendor} share document number '{number}'",
                        ids.len(),
                    ),
                    affected_subject_ids: ids,
                }
            })
            .collect()
    }
}

/// Vendor id when known, otherwise the lowercased vendor name.
fn vendor_key(doc: &DocumentRecord) -> String {
    doc.vendor_id
        .clone()
        .or_else(|| doc.vendor_name.as_deref().map(|n| n.trim().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(d as u64)
    }

    #[test]
    fn window_span_uses_most_recent_dates() {
        let dates = [day(0), day(20), day(24), day(26)];
        assert_eq!(recent_window_span(dates, 3), Some(6));
    }

    #[test]
    fn window_span_needs_enough_dates() {
        assert_eq!(recent_window_span([day(0), day(1)], 3), None);
        assert_eq!(recent_window_span([day(0)], 0), None);
    }
}
