//! Evidence Builder: turns triggered signals into findings and
//! recommendations.
//!
//! Templates are keyed by signal name and fixed. A triggered signal with
//! no template still produces a generic finding, so nothing that moved
//! the score is left unexplained.

use crate::{
    assessment::{Finding, RiskBand},
    signal::Signal,
};

// ── Constants ────────────────────────────────────────────────────────────────

/// Emitted when no signal fired. The recommendation list is never empty.
pub const FALLBACK_RECOMMENDATION: &str = "Continue standard monitoring procedures";

/// Action for a triggered signal that has no template of its own.
pub const GENERIC_RECOMMENDATION: &str = "Review the flagged record manually";

/// Prefix of per-keyword news signals (`keyword:fraud`, ...).
pub const KEYWORD_SIGNAL_PREFIX: &str = "keyword:";

// ── Templates ────────────────────────────────────────────────────────────────

struct EvidenceTemplate {
    category: &'static str,
    severity: RiskBand,
    headline: &'static str,
    recommendation: &'static str,
}

const fn template(
    category: &'static str,
    severity: RiskBand,
    headline: &'static str,
    recommendation: &'static str,
) -> EvidenceTemplate {
    EvidenceTemplate {
        category,
        severity,
        headline,
        recommendation,
    }
}

fn template_for(signal_name: &str) -> Option<EvidenceTemplate> {
    use RiskBand::*;
    let t = match signal_name {
        // vendor / transaction
        "high_volume" => template(
            "transaction_volume",
            Medium,
            "High transaction volume",
            "Review transaction volume against contracted scope",
        ),
        "high_value" => template(
            "transaction_value",
            High,
            "High cumulative transaction value",
            "Require additional approval for high-value transactions",
        ),
        "rapid_sequence" => template(
            "transaction_timing",
            Medium,
            "Rapid transaction sequence",
            "Review recent transactions for possible invoice splitting",
        ),
        "unknown_vendor" => template(
            "vendor_verification",
            High,
            "Vendor not found in registry",
            "Initiate vendor verification and registration process",
        ),
        "incomplete_documentation" => template(
            "documentation",
            Medium,
            "Incomplete vendor documentation",
            "Request outstanding compliance documents from vendor",
        ),
        "price_above_market" => template(
            "pricing",
            Medium,
            "Pricing above market reference",
            "Conduct market price comparison before approving payment",
        ),
        // document
        "duplicate_identifier_risk" => template(
            "duplicate_submission",
            High,
            "Possible duplicate document identifier",
            "Verify document number against prior submissions",
        ),
        "price_anomaly_risk" => template(
            "pricing",
            Medium,
            "Price anomaly in document",
            "Conduct market price comparison before approving payment",
        ),
        "vendor_risk" => template(
            "vendor_verification",
            Medium,
            "Vendor flagged during extraction",
            "Perform enhanced due diligence on vendor",
        ),
        "missing_fields_risk" => template(
            "documentation",
            Low,
            "Required fields missing",
            "Request completion of missing document fields",
        ),
        "low_extraction_confidence" => template(
            "data_quality",
            Low,
            "Low extraction confidence",
            "Manually verify extracted document fields",
        ),
        "invoice_splitting" => template(
            "invoice_splitting",
            High,
            "Possible invoice splitting",
            "Investigate recent invoices from this vendor for splitting below approval limits",
        ),
        name if name.starts_with(KEYWORD_SIGNAL_PREFIX) => template(
            "news_keyword",
            Low,
            "Fraud keyword mentioned",
            "Cross-reference article with vendor and transaction records",
        ),
        _ => return None,
    };
    Some(t)
}

// ── Builder ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

/// Build findings for triggered signals, in signal order, plus the
/// de-duplicated recommendations they call for.
pub fn build(signals: &[Signal]) -> Evidence {
    let mut findings = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();

    for signal in signals.iter().filter(|s| s.triggered) {
        match template_for(&signal.name) {
            Some(t) => {
                findings.push(Finding {
                    signal: signal.name.clone(),
                    category: t.category.to_string(),
                    severity: t.severity,
                    description: format!("{}: {}", t.headline, signal.detail),
                });
                push_unique(&mut recommendations, t.recommendation);
            }
            None => {
                findings.push(Finding {
                    signal: signal.name.clone(),
                    category: "general".to_string(),
                    severity: RiskBand::Medium,
                    description: signal.detail.clone(),
                });
                push_unique(&mut recommendations, GENERIC_RECOMMENDATION);
            }
        }
    }

    if findings.is_empty() {
        recommendations.push(FALLBACK_RECOMMENDATION.to_string());
    }

    Evidence {
        findings,
        recommendations,
    }
}

fn push_unique(recommendations: &mut Vec<String>, action: &str) {
    if !recommendations.iter().any(|r| r == action) {
        recommendations.push(action.to_string());
    }
}

/// `1234567.5` -> `"1,234,567.50"`.
pub fn format_amount(amount: f64) -> String {
    let raw = format!("{:.2}", amount.abs());
    let (whole, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(12_500_000.0), "12,500,000.00");
        assert_eq!(format_amount(-4321.5), "-4,321.50");
    }

    #[test]
    fn unknown_signal_gets_generic_finding_and_action() {
        let evidence = build(&[Signal::new("custom_check", true, 5, "custom detail")]);
        assert_eq!(evidence.findings.len(), 1);
        assert_eq!(evidence.findings[0].category, "general");
        assert_eq!(evidence.recommendations, vec![GENERIC_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn fallback_only_without_findings() {
        let quiet = build(&[Signal::new("high_volume", false, 15, "")]);
        assert_eq!(quiet.recommendations, vec![FALLBACK_RECOMMENDATION.to_string()]);

        let volume = build(&[Signal::new("high_volume", true, 15, "25 transactions")]);
        assert_eq!(volume.findings.len(), 1);
        assert!(!volume.recommendations.iter().any(|r| r == FALLBACK_RECOMMENDATION));
    }
}
