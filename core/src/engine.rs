//! The risk engine: wires extractors, aggregator, classifier, and
//! evidence builder into one assessment per subject.
//!
//! PIPELINE (fixed, per subject):
//!   1. Signal extraction   (domain extractor)
//!   2. Score aggregation   (base + triggered weights, clamped per step)
//!   3. Band classification (domain band table)
//!   4. Evidence            (findings + recommendations)
//!
//! RULES:
//!   - Scoring one subject never reads another subject's result.
//!   - Batch scoring splits the input into contiguous chunks, scores each
//!     chunk on its own thread, and concatenates in input order.
//!   - Pattern detection always sees the whole batch.

use crate::{
    assessment::{ComplianceIssue, Pattern, RiskAssessment, SubjectType},
    config::EngineConfig,
    document_signals::DocumentSignals,
    error::RiskResult,
    evidence,
    extractor::SignalExtractor,
    news_signals::{NewsCategory, NewsSignals},
    pattern_detector::PatternDetector,
    record::{DocumentRecord, DocumentRiskInput, NewsArticle, Transaction, VendorProfile, VendorRiskInput},
    scoring::aggregate,
    signal::SignalSet,
    types::Score,
    vendor_signals::VendorSignals,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::thread;

/// News assessment plus its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsInsight {
    pub assessment: RiskAssessment,
    pub relevance: Score,
    pub category: NewsCategory,
    pub country: String,
    pub matched_keywords: Vec<String>,
}

pub struct RiskEngine {
    vendor: VendorSignals,
    document: DocumentSignals,
    news: NewsSignals,
    patterns: PatternDetector,
    threads: usize,
}

impl RiskEngine {
    /// Build an engine from configuration. Fails only on an invalid band
    /// table or country pattern.
    pub fn new(config: EngineConfig) -> RiskResult<Self> {
        config.validate()?;
        let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Ok(Self {
            vendor: VendorSignals::new(config.vendor),
            document: DocumentSignals::new(config.document),
            news: NewsSignals::new(config.news)?,
            patterns: PatternDetector::new(config.patterns),
            threads,
        })
    }

    /// Engine with the built-in default tables.
    pub fn standard() -> RiskResult<Self> {
        Self::new(EngineConfig::standard())
    }

    /// Cap the number of threads used for batch scoring. `0` is read as `1`.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    // ── Single subjects ─────────────────────────────────────────────────────

    pub fn assess_vendor(&self, input: &VendorRiskInput) -> RiskAssessment {
        let signals = self.vendor.extract(input);
        build_assessment(&self.vendor, &input.vendor_id, SubjectType::Vendor, signals, Vec::new())
    }

    /// Score an ad-hoc batch of transactions, optionally against the
    /// vendor profile they were matched to.
    pub fn assess_transaction_batch(
        &self,
        batch_id: &str,
        profile: Option<&VendorProfile>,
        transactions: &[Transaction],
    ) -> RiskAssessment {
        let signals = self.vendor.extract_parts(profile, transactions);
        build_assessment(&self.vendor, batch_id, SubjectType::TransactionBatch, signals, Vec::new())
    }

    pub fn assess_document(&self, input: &DocumentRiskInput) -> RiskAssessment {
        let signals = self.document.extract(input);
        let issues = self.document.compliance_issues(input, &signals);
        build_assessment(
            &self.document,
            &input.document.document_id,
            SubjectType::Document,
            signals,
            issues,
        )
    }

    pub fn assess_news(&self, article: &NewsArticle) -> NewsInsight {
        let text = article.searchable_text();
        let signals = self.news.extract(article);
        let assessment = build_assessment(&self.news, &article.article_id, SubjectType::NewsItem, signals, Vec::new());
        NewsInsight {
            relevance: assessment.score,
            category: self.news.classify_category(&text),
            country: self.news.detect_country(&text),
            matched_keywords: self.news.matched_keywords(&text).into_iter().map(String::from).collect(),
            assessment,
        }
    }

    // ── Batches ─────────────────────────────────────────────────────────────

    pub fn assess_vendors(&self, inputs: &[VendorRiskInput]) -> Vec<RiskAssessment> {
        let out = self.par_map(inputs, |input| self.assess_vendor(input));
        log::info!("assessed {} vendors", out.len());
        out
    }

    pub fn assess_documents(&self, inputs: &[DocumentRiskInput]) -> Vec<RiskAssessment> {
        let out = self.par_map(inputs, |input| self.assess_document(input));
        log::info!("assessed {} documents", out.len());
        out
    }

    pub fn assess_news_batch(&self, articles: &[NewsArticle]) -> Vec<NewsInsight> {
        let out = self.par_map(articles, |article| self.assess_news(article));
        log::info!("assessed {} news articles", out.len());
        out
    }

    /// Cross-record transaction patterns over the whole batch.
    pub fn detect_patterns(&self, transactions: &[Transaction]) -> Vec<Pattern> {
        self.patterns.detect(transactions)
    }

    /// Near-duplicate document submissions over the whole batch.
    pub fn detect_document_patterns(&self, documents: &[DocumentRecord]) -> Vec<Pattern> {
        self.patterns.detect_duplicate_submissions(documents)
    }

    /// Map `f` over `items` on up to `self.threads` scoped threads,
    /// preserving input order.
    fn par_map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        if self.threads <= 1 || items.len() < 2 {
            return items.iter().map(&f).collect();
        }
        let chunk_size = items.len().div_ceil(self.threads);
        let f = &f;
        thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || chunk.iter().map(f).collect::<Vec<R>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

fn build_assessment<E: SignalExtractor>(
    extractor: &E,
    subject_id: &str,
    subject_type: SubjectType,
    signals: SignalSet,
    compliance_issues: Vec<ComplianceIssue>,
) -> RiskAssessment {
    let score = aggregate(extractor.base_score(), signals.as_slice());
    let band = extractor.bands().classify(score);
    let evidence = evidence::build(signals.as_slice());

    log::debug!(
        "{} {subject_id}: score={score} band={band} triggered={}",
        extractor.domain(),
        signals.triggered().count()
    );

    RiskAssessment {
        subject_id: subject_id.to_string(),
        subject_type,
        score,
        band,
        signals: signals.into_vec(),
        findings: evidence.findings,
        recommendations: evidence.recommendations,
        compliance_issues,
    }
}
