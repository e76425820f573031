//! risk-runner: headless batch runner for the audit risk engine.
//!
//! Usage:
//!   risk-runner --input batch.json
//!   risk-runner --input batch.json --data-dir ./data --threads 4 --summary

use anyhow::{Context, Result};
use audit_risk_core::{
    config::EngineConfig,
    record::{DocumentRecord, DocumentRiskInput, NewsArticle, Transaction, VendorRiskInput},
    NewsInsight, Pattern, RiskAssessment, RiskEngine,
};
use std::env;

#[derive(serde::Deserialize)]
struct Batch {
    #[serde(default)]
    vendors: Vec<VendorRiskInput>,
    #[serde(default)]
    documents: Vec<DocumentRiskInput>,
    #[serde(default)]
    news: Vec<NewsArticle>,
    /// Pattern-detection input. Falls back to the vendors' transactions.
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(serde::Serialize)]
struct Report {
    vendors: Vec<RiskAssessment>,
    documents: Vec<RiskAssessment>,
    news: Vec<NewsInsight>,
    patterns: Vec<Pattern>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let input = find_arg(&args, "--input").context("missing --input <batch.json>")?;
    let data_dir = find_arg(&args, "--data-dir");
    let threads = parse_arg(&args, "--threads", 0usize);
    let summary = args.iter().any(|a| a == "--summary");

    let config = match data_dir {
        Some(dir) => EngineConfig::load(dir)?,
        None => EngineConfig::standard(),
    };
    let mut engine = RiskEngine::new(config)?;
    if threads > 0 {
        engine = engine.with_threads(threads);
    }

    let content = std::fs::read_to_string(input).with_context(|| format!("Cannot read {input}"))?;
    let batch: Batch = serde_json::from_str(&content).with_context(|| format!("Cannot parse {input}"))?;

    let report = run_batch(&engine, &batch);

    if summary {
        print_summary(&report);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_batch(engine: &RiskEngine, batch: &Batch) -> Report {
    let transactions: Vec<Transaction> = if batch.transactions.is_empty() {
        batch
            .vendors
            .iter()
            .flat_map(|v| v.transactions.iter().cloned())
            .collect()
    } else {
        batch.transactions.clone()
    };
    let documents: Vec<DocumentRecord> = batch.documents.iter().map(|d| d.document.clone()).collect();

    let mut patterns = engine.detect_patterns(&transactions);
    patterns.extend(engine.detect_document_patterns(&documents));

    let report = Report {
        vendors: engine.assess_vendors(&batch.vendors),
        documents: engine.assess_documents(&batch.documents),
        news: engine.assess_news_batch(&batch.news),
        patterns,
    };

    let alerts = report
        .vendors
        .iter()
        .chain(report.documents.iter())
        .filter(|a| a.requires_alert())
        .count();
    if alerts > 0 {
        log::warn!("{alerts} subjects at or above the alerting band");
    }
    report
}

fn print_summary(report: &Report) {
    println!("=== RISK SUMMARY ===");
    for a in report.vendors.iter().chain(report.documents.iter()) {
        println!(
            "  {:<18} {:<24} score {:>3}  {}",
            a.subject_type.as_str(),
            a.subject_id,
            a.score,
            a.band
        );
    }
    for n in &report.news {
        println!(
            "  {:<18} {:<24} relevance {:>3}  {} / {} / {}",
            n.assessment.subject_type.as_str(),
            n.assessment.subject_id,
            n.relevance,
            n.assessment.band,
            n.category,
            n.country
        );
    }

    println!();
    println!("=== PATTERNS ===");
    if report.patterns.is_empty() {
        println!("  (none detected)");
    }
    for p in &report.patterns {
        println!("  [{}] {}: {}", p.severity, p.kind.label(), p.description);
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
