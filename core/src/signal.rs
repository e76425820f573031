//! Signals: the named, weighted observations every extractor emits.

use crate::types::Weight;
use serde::{Deserialize, Serialize};

/// One observation about a subject. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub triggered: bool,
    pub weight: Weight,
    pub detail: String,
}

impl Signal {
    pub fn new(name: impl Into<String>, triggered: bool, weight: Weight, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggered,
            weight,
            detail: detail.into(),
        }
    }

    /// Contribution to the score: the weight when triggered, zero otherwise.
    pub fn contribution(&self) -> Weight {
        if self.triggered {
            self.weight
        } else {
            0
        }
    }
}

/// Ordered collection of signals in extractor-declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalSet {
    signals: Vec<Signal>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a signal; the order of calls is the aggregation order.
    pub fn push(&mut self, name: &str, triggered: bool, weight: Weight, detail: impl Into<String>) {
        self.signals.push(Signal::new(name, triggered, weight, detail));
    }

    pub fn triggered(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.triggered)
    }

    pub fn is_triggered(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s.triggered && s.name == name)
    }

    pub fn as_slice(&self) -> &[Signal] {
        &self.signals
    }

    pub fn into_vec(self) -> Vec<Signal> {
        self.signals
    }
}

impl From<Vec<Signal>> for SignalSet {
    fn from(signals: Vec<Signal>) -> Self {
        Self { signals }
    }
}
