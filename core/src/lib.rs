//! Heuristic risk-scoring and anomaly-classification engine for
//! government-audit fraud monitoring.
//!
//! Extractors turn records into signals, the aggregator folds signals
//! into a clamped score, the classifier maps the score onto a band, and
//! the evidence builder explains the result. The pattern detector looks
//! across whole batches. Everything here is pure computation over
//! records the caller has already fetched.

pub mod assessment;
pub mod config;
pub mod document_signals;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extractor;
pub mod news_signals;
pub mod pattern_detector;
pub mod record;
pub mod scoring;
pub mod signal;
pub mod types;
pub mod vendor_signals;

pub use assessment::{Pattern, PatternKind, RiskAssessment, RiskBand, SubjectType};
pub use engine::{NewsInsight, RiskEngine};
pub use error::{RiskError, RiskResult};
