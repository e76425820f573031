//! News relevance extractor.
//!
//! Relevance is `base + weight × matched keywords`, capped at 100 by the
//! aggregator. Category and country are classified by first match over
//! ordered tables supplied in configuration.

use crate::{
    config::NewsRelevanceConfig,
    error::{RiskError, RiskResult},
    evidence::KEYWORD_SIGNAL_PREFIX,
    extractor::SignalExtractor,
    record::NewsArticle,
    scoring::BandThresholds,
    signal::SignalSet,
    types::Score,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewsCategory {
    Fraud,
    Corruption,
    Compliance,
    GovernmentSpending,
    Investigation,
    Policy,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraud => "fraud",
            Self::Corruption => "corruption",
            Self::Compliance => "compliance",
            Self::GovernmentSpending => "government-spending",
            Self::Investigation => "investigation",
            Self::Policy => "policy",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct NewsSignals {
    config: NewsRelevanceConfig,
    countries: Vec<(String, Regex)>,
}

impl NewsSignals {
    /// Compiles the country table. Fails only on an invalid pattern.
    pub fn new(mut config: NewsRelevanceConfig) -> RiskResult<Self> {
        for keyword in &mut config.keywords {
            *keyword = keyword.to_lowercase();
        }
        for rule in &mut config.categories {
            for keyword in &mut rule.keywords {
                *keyword = keyword.to_lowercase();
            }
        }
        let countries = config
            .countries
            .iter()
            .map(|c| {
                Regex::new(&c.pattern)
                    .map(|re| (c.country.clone(), re))
                    .map_err(|source| RiskError::InvalidCountryPattern {
                        country: c.country.clone(),
                        source,
                    })
            })
            .collect::<RiskResult<Vec<_>>>()?;
        Ok(Self { config, countries })
    }

    /// Configured keywords found in `text` (expected lowercased), in table order.
    pub fn matched_keywords<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.config
            .keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn classify_category(&self, text: &str) -> NewsCategory {
        self.config
            .categories
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
            .map_or(self.config.default_category, |rule| rule.category)
    }

    pub fn detect_country(&self, text: &str) -> String {
        self.countries
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map_or_else(|| self.config.default_country.clone(), |(country, _)| country.clone())
    }
}

impl SignalExtractor for NewsSignals {
    type Record = NewsArticle;

    fn domain(&self) -> &'static str {
        "news"
    }

    fn base_score(&self) -> Score {
        self.config.base_score
    }

    fn bands(&self) -> &BandThresholds {
        &self.config.bands
    }

    fn extract(&self, article: &NewsArticle) -> SignalSet {
        let text = article.searchable_text();
        let mut signals = SignalSet::new();
        for keyword in &self.config.keywords {
            let found = text.contains(keyword.as_str());
            let detail = if found {
                format!("article mentions '{keyword}'")
            } else {
                format!("'{keyword}' not mentioned")
            };
            signals.push(
                &format!("{KEYWORD_SIGNAL_PREFIX}{keyword}"),
                found,
                self.config.keyword_weight,
                detail,
            );
        }
        signals
    }
}
