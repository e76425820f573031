//! Engine configuration.
//!
//! Every constant table the extractors rely on (weights, thresholds,
//! keyword lists, country patterns) lives here and is handed to the
//! extractor at construction time. Nothing is read from module-level
//! mutable state.

use crate::{
    error::{RiskError, RiskResult},
    news_signals::NewsCategory,
    scoring::{BandThresholds, RELEVANCE_BANDS, RISK_BANDS},
    types::{Amount, Score, Weight},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// ── Shared ─────────────────────────────────────────────────────────

/// "The N most recent transactions fall within W days."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitWindow {
    pub lookback: usize,
    pub window_days: i64,
}

impl Default for SplitWindow {
    fn default() -> Self {
        Self {
            lookback: 3,
            window_days: 7,
        }
    }
}

// ── Vendor / transaction scoring ───────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorWeights {
    pub high_volume: Weight,
    pub high_value: Weight,
    pub rapid_sequence: Weight,
    pub unknown_vendor: Weight,
    pub incomplete_documentation: Weight,
    pub price_above_market: Weight,
}

impl Default for VendorWeights {
    fn default() -> Self {
        Self {
            high_volume: 15,
            high_value: 25,
            rapid_sequence: 20,
            unknown_vendor: 20,
            incomplete_documentation: 10,
            price_above_market: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorScoringConfig {
    pub base_score: Score,
    pub bands: BandThresholds,
    /// `high_volume` fires when the transaction count exceeds this.
    pub high_volume_count: usize,
    /// `high_value` fires when the cumulative amount exceeds this.
    pub large_amount_threshold: Amount,
    pub rapid_sequence: SplitWindow,
    /// Used when the vendor profile carries no requirement of its own.
    pub default_required_documents: u32,
    /// Allowed markup over the market reference before `price_above_market` fires.
    pub market_price_tolerance: f64,
    pub weights: VendorWeights,
}

impl Default for VendorScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 30,
            bands: RISK_BANDS,
            high_volume_count: 20,
            large_amount_threshold: 10_000_000.0,
            rapid_sequence: SplitWindow::default(),
            default_required_documents: 3,
            market_price_tolerance: 0.15,
            weights: VendorWeights::default(),
        }
    }
}

// ── Document scoring ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentWeights {
    pub duplicate_identifier_risk: Weight,
    pub price_anomaly_risk: Weight,
    pub vendor_risk: Weight,
    pub missing_fields_risk: Weight,
    pub low_extraction_confidence: Weight,
    pub invoice_splitting: Weight,
}

impl Default for DocumentWeights {
    fn default() -> Self {
        Self {
            duplicate_identifier_risk: 30,
            price_anomaly_risk: 25,
            vendor_risk: 25,
            missing_fields_risk: 20,
            low_extraction_confidence: 10,
            invoice_splitting: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentScoringConfig {
    pub base_score: Score,
    pub bands: BandThresholds,
    /// Confidence strictly below this triggers `low_extraction_confidence`.
    pub min_confidence: f64,
    pub invoice_split: SplitWindow,
    pub weights: DocumentWeights,
}

impl Default for DocumentScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 0,
            bands: RISK_BANDS,
            min_confidence: 0.5,
            invoice_split: SplitWindow::default(),
            weights: DocumentWeights::default(),
        }
    }
}

// ── News relevance ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: NewsCategory,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryPattern {
    pub country: String,
    /// Regular expression, matched against lowercased text.
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsRelevanceConfig {
    pub base_score: Score,
    pub bands: BandThresholds,
    pub keyword_weight: Weight,
    pub keywords: Vec<String>,
    /// Checked in order; the first rule with a matching keyword wins.
    pub categories: Vec<CategoryRule>,
    pub default_category: NewsCategory,
    /// Checked in order; the first matching pattern wins.
    pub countries: Vec<CountryPattern>,
    pub default_country: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for NewsRelevanceConfig {
    fn default() -> Self {
        let rule = |category, keywords: &[&str]| CategoryRule {
            category,
            keywords: strings(keywords),
        };
        let country = |country: &str, pattern: &str| CountryPattern {
            country: country.into(),
            pattern: pattern.into(),
        };
        Self {
            base_score: 50,
            bands: RELEVANCE_BANDS,
            keyword_weight: 10,
            keywords: strings(&[
                "fraud",
                "scam",
                "corruption",
                "embezzlement",
                "bribery",
                "money laundering",
                "investigation",
                "probe",
                "audit",
                "violation",
            ]),
            categories: vec![
                rule(NewsCategory::Fraud, &["fraud", "scam", "embezzlement", "money laundering", "ponzi"]),
                rule(NewsCategory::Corruption, &["corruption", "bribery", "bribe", "kickback", "graft"]),
                rule(NewsCategory::Compliance, &["compliance", "violation", "regulation", "audit", "sanction"]),
                rule(
                    NewsCategory::GovernmentSpending,
                    &["procurement", "tender", "contract", "budget", "spending", "expenditure"],
                ),
                rule(NewsCategory::Investigation, &["investigation", "probe", "inquiry", "indictment", "arrest"]),
                rule(NewsCategory::Policy, &["policy", "reform", "legislation", "bill", "directive"]),
            ],
            default_category: NewsCategory::Policy,
            countries: vec![
                country("Nigeria", r"\b(nigeria|nigerian|lagos|abuja)\b"),
                country("Kenya", r"\b(kenya|kenyan|nairobi|mombasa)\b"),
                country("South Africa", r"\b(south africa|south african|johannesburg|pretoria|cape town)\b"),
                country("Ghana", r"\b(ghana|ghanaian|accra)\b"),
                country("India", r"\b(india|indian|new delhi|mumbai)\b"),
                country("United Kingdom", r"\b(united kingdom|britain|british|london)\b"),
                country("United States", r"\b(united states|usa|american|washington)\b|\bu\.s\."),
            ],
            default_country: "International".into(),
        }
    }
}

// ── Pattern detection ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Flag when distinct departments in a vendor-day group exceed this.
    pub multi_department_min_departments: usize,
    /// ...and the group's summed amount exceeds this.
    pub multi_department_min_amount: Amount,
    pub rapid_sequence_min_transactions: usize,
    /// Flag when the average gap between consecutive dates is below this.
    pub rapid_sequence_max_average_gap_days: f64,
    /// Minimum copies of the same document number before flagging.
    pub duplicate_submission_min_copies: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            multi_department_min_departments: 2,
            multi_department_min_amount: 500_000.0,
            rapid_sequence_min_transactions: 5,
            rapid_sequence_max_average_gap_days: 2.0,
            duplicate_submission_min_copies: 2,
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub vendor: VendorScoringConfig,
    pub document: DocumentScoringConfig,
    pub news: NewsRelevanceConfig,
    pub patterns: PatternConfig,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::standard().
    pub fn load(data_dir: &str) -> RiskResult<Self> {
        let config = Self {
            vendor: read_json(&format!("{data_dir}/risk/vendor_scoring.json"))?,
            document: read_json(&format!("{data_dir}/risk/document_scoring.json"))?,
            news: read_json(&format!("{data_dir}/news/news_relevance.json"))?,
            patterns: read_json(&format!("{data_dir}/patterns/pattern_detection.json"))?,
        };
        config.validate()?;
        log::info!("loaded engine config from {data_dir}");
        Ok(config)
    }

    /// Built-in defaults, identical to the shipped data/ files.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Reject band tables whose thresholds are not strictly descending.
    pub fn validate(&self) -> RiskResult<()> {
        for bands in [&self.vendor.bands, &self.document.bands, &self.news.bands] {
            bands.validate()?;
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &str) -> RiskResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| RiskError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
