//! Vendor / transaction signal extractor.
//!
//! Signals, in aggregation order:
//!   1. high_volume              — transaction count above threshold
//!   2. high_value               — cumulative amount above the large-amount threshold
//!   3. rapid_sequence           — most recent transactions packed into a short window
//!   4. unknown_vendor           — no profile supplied for this vendor id
//!   5. incomplete_documentation — fewer documents on file than required
//!   6. price_above_market       — a transaction billed above its market reference

use crate::{
    config::VendorScoringConfig,
    evidence::format_amount,
    extractor::SignalExtractor,
    pattern_detector::recent_window_span,
    record::{Transaction, VendorProfile, VendorRiskInput},
    scoring::BandThresholds,
    signal::SignalSet,
    types::{Amount, Score},
};

pub const HIGH_VOLUME: &str = "high_volume";
pub const HIGH_VALUE: &str = "high_value";
pub const RAPID_SEQUENCE: &str = "rapid_sequence";
pub const UNKNOWN_VENDOR: &str = "unknown_vendor";
pub const INCOMPLETE_DOCUMENTATION: &str = "incomplete_documentation";
pub const PRICE_ABOVE_MARKET: &str = "price_above_market";

pub struct VendorSignals {
    config: VendorScoringConfig,
}

impl VendorSignals {
    pub fn new(config: VendorScoringConfig) -> Self {
        Self { config }
    }

    /// Score a vendor profile and transaction list that were not bundled
    /// into a `VendorRiskInput` (e.g. an ad-hoc transaction batch).
    pub fn extract_parts(&self, profile: Option<&VendorProfile>, transactions: &[Transaction]) -> SignalSet {
        let cfg = &self.config;
        let w = &cfg.weights;
        let mut signals = SignalSet::new();

        // 1. Volume
        let count = transactions.len();
        signals.push(
            HIGH_VOLUME,
            count > cfg.high_volume_count,
            w.high_volume,
            format!("{count} transactions on record (threshold {})", cfg.high_volume_count),
        );

        // 2. Cumulative value
        let total = cumulative_amount(transactions);
        signals.push(
            HIGH_VALUE,
            total > cfg.large_amount_threshold,
            w.high_value,
            format!(
                "cumulative amount {} against threshold {}",
                format_amount(total),
                format_amount(cfg.large_amount_threshold)
            ),
        );

        // 3. Timing of the most recent transactions
        let window = cfg.rapid_sequence;
        let span = recent_window_span(transactions.iter().map(|t| t.date), window.lookback);
        let (rapid, detail) = match span {
            Some(days) => (
                days < window.window_days,
                format!(
                    "{} most recent transactions span {days} days (window {} days)",
                    window.lookback, window.window_days
                ),
            ),
            None => (
                false,
                format!("fewer than {} transactions on record", window.lookback),
            ),
        };
        signals.push(RAPID_SEQUENCE, rapid, w.rapid_sequence, detail);

        // 4-5. Profile-driven checks
        match profile {
            None => {
                signals.push(UNKNOWN_VENDOR, true, w.unknown_vendor, "no matching vendor profile found");
                signals.push(
                    INCOMPLETE_DOCUMENTATION,
                    false,
                    w.incomplete_documentation,
                    "no profile to check documentation against",
                );
            }
            Some(p) => {
                let label = p.name.as_deref().unwrap_or(p.vendor_id.as_str());
                signals.push(UNKNOWN_VENDOR, false, w.unknown_vendor, format!("profile found for {label}"));

                let on_file = p.documents_on_file.unwrap_or(0);
                let required = p.required_documents.unwrap_or(cfg.default_required_documents);
                signals.push(
                    INCOMPLETE_DOCUMENTATION,
                    on_file < required,
                    w.incomplete_documentation,
                    format!("{on_file} of {required} required documents on file"),
                );
            }
        }

        // 6. Pricing against market reference
        let markup = max_markup(transactions);
        let (above, detail) = match markup {
            Some(m) => (
                m > cfg.market_price_tolerance,
                format!(
                    "highest markup {:.1}% over market reference (tolerance {:.1}%)",
                    m * 100.0,
                    cfg.market_price_tolerance * 100.0
                ),
            ),
            None => (false, "no market reference available".to_string()),
        };
        signals.push(PRICE_ABOVE_MARKET, above, w.price_above_market, detail);

        signals
    }
}

impl SignalExtractor for VendorSignals {
    type Record = VendorRiskInput;

    fn domain(&self) -> &'static str {
        "vendor"
    }

    fn base_score(&self) -> Score {
        self.config.base_score
    }

    fn bands(&self) -> &BandThresholds {
        &self.config.bands
    }

    fn extract(&self, input: &VendorRiskInput) -> SignalSet {
        let profile = input.profile.as_ref().filter(|p| {
            let matches = p.vendor_id == input.vendor_id;
            if !matches {
                log::warn!(
                    "profile for {} supplied with vendor {}; treated as unknown",
                    p.vendor_id,
                    input.vendor_id
                );
            }
            matches
        });
        self.extract_parts(profile, &input.transactions)
    }
}

/// Sum of non-negative amounts. Credits never lower a vendor's exposure.
fn cumulative_amount(transactions: &[Transaction]) -> Amount {
    transactions
        .iter()
        .map(|t| {
            let amount = t.amount_or_zero();
            if amount < 0.0 {
                log::warn!("negative amount on transaction {} ignored", t.transaction_id);
            }
            amount.max(0.0)
        })
        .sum()
}

/// Largest relative markup over market reference, across transactions
/// that carry a positive reference.
fn max_markup(transactions: &[Transaction]) -> Option<f64> {
    transactions
        .iter()
        .filter_map(|t| match t.market_reference {
            Some(reference) if reference > 0.0 && reference.is_finite() => {
                Some(t.amount_or_zero() / reference - 1.0)
            }
            _ => None,
        })
        .reduce(f64::max)
}
