//! Shared primitive types used across the entire engine.

/// A stable identifier for any scored subject (vendor, document, news item).
pub type SubjectId = String;

/// A monetary amount in the reporting currency.
pub type Amount = f64;

/// A signal's fixed contribution to a score. Never negative.
pub type Weight = u32;

/// A clamped score in `[0, 100]`.
pub type Score = u8;

/// Upper bound of every score produced by the aggregator.
pub const MAX_SCORE: Score = 100;
