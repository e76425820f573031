//! Score Aggregator and Band Classifier.
//!
//! RULE: The running total is clamped to [0, 100] after every addition,
//! not only at the end. A caller peeking mid-fold never sees an
//! out-of-range value.

use crate::{
    assessment::RiskBand,
    error::{RiskError, RiskResult},
    signal::Signal,
    types::{Score, Weight, MAX_SCORE},
};
use serde::{Deserialize, Serialize};

// ── Band tables ──────────────────────────────────────────────────────────────

/// Inclusive lower bounds, applied in descending order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub critical: Score,
    pub high: Score,
    pub medium: Score,
}

/// Risk scores (vendor, transaction batch, document).
pub const RISK_BANDS: BandThresholds = BandThresholds {
    critical: 80,
    high: 60,
    medium: 40,
};

/// News relevance percentages. Answers a different question than
/// RISK_BANDS and is kept as a separate table.
pub const RELEVANCE_BANDS: BandThresholds = BandThresholds {
    critical: 90,
    high: 75,
    medium: 50,
};

impl BandThresholds {
    pub fn classify(&self, score: Score) -> RiskBand {
        if score >= self.critical {
            RiskBand::Critical
        } else if score >= self.high {
            RiskBand::High
        } else if score >= self.medium {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn validate(&self) -> RiskResult<()> {
        let ordered = self.critical > self.high && self.high > self.medium;
        if !ordered || self.critical > MAX_SCORE {
            return Err(RiskError::InvalidThresholds {
                critical: self.critical,
                high: self.high,
                medium: self.medium,
            });
        }
        Ok(())
    }
}

/// Classify a risk score with the standard risk table.
pub fn classify(score: Score) -> RiskBand {
    RISK_BANDS.classify(score)
}

// ── Aggregation ──────────────────────────────────────────────────────────────

/// Running, always-clamped score total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAccumulator {
    total: Score,
}

impl ScoreAccumulator {
    pub fn new(base: Score) -> Self {
        Self {
            total: base.min(MAX_SCORE),
        }
    }

    pub fn add_weight(&mut self, weight: Weight) {
        let capped = (self.total as u32).saturating_add(weight).min(MAX_SCORE as u32);
        self.total = capped as Score;
    }

    /// Fold in one signal. Untriggered signals leave the total unchanged.
    pub fn add(&mut self, signal: &Signal) {
        self.add_weight(signal.contribution());
    }

    pub fn current(&self) -> Score {
        self.total
    }
}

/// Fold triggered signal weights onto `base` in the order given.
pub fn aggregate(base: Score, signals: &[Signal]) -> Score {
    signals
        .iter()
        .fold(ScoreAccumulator::new(base), |mut acc, signal| {
            acc.add(signal);
            acc
        })
        .current()
}
