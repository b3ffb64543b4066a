//! Text rendering of command responses
//!
//! Plain text for terminals. `--json` bypasses this entirely.

use std::fmt::Write;

use super::commands::{ModelInfo, PredictionResponse};
use crate::logic::explain::readable_name;

const BAR_WIDTH: usize = 20;

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_prediction(response: &PredictionResponse) -> String {
    let result = &response.result;
    let explanation = &response.explanation;
    let mut out = String::new();

    let _ = writeln!(out, "Your result: {} ({:.0}%)", result.label, result.confidence_percent());
    let _ = writeln!(out);

    let _ = writeln!(out, "Your social habits profile (you | average)");
    for axis in &explanation.profile {
        let _ = writeln!(
            out,
            "  {:<16} {} {:>3.0}% | {:>3.0}%",
            axis.label,
            bar(axis.user_value),
            axis.user_value * 100.0,
            axis.reference_value * 100.0
        );
    }

    if !explanation.insights.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "What it means for you");
        for insight in &explanation.insights {
            let _ = writeln!(out, "  - {}", insight);
        }
        if let Some(tip) = &explanation.tip {
            let _ = writeln!(out, "  {}", tip);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Deciding factors");
    for factor in &explanation.factors {
        let _ = writeln!(
            out,
            "  {:<28} {} {}% influence",
            factor.readable_name,
            bar(factor.importance),
            factor.percent
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Compared with most people");
    for comparison in &explanation.comparisons {
        let arrow = if comparison.above_typical { "↑" } else { "↓" };
        let _ = writeln!(
            out,
            "  {:<14} {:<16} {} {}",
            comparison.label, comparison.value, arrow, comparison.verdict
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Fun facts about personality");
    for fact in &explanation.facts {
        let _ = writeln!(out, "  - {}", fact);
    }

    out
}

pub fn render_model_info(info: &ModelInfo) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Model");
    let _ = writeln!(out, "  Type:      {}", info.model.model_type);
    let _ = writeln!(out, "  Path:      {}", info.model.model_path);
    let _ = writeln!(out, "  Loaded at: {}", info.model.loaded_at.to_rfc3339());
    if let Some(sha) = &info.model.sha256 {
        let _ = writeln!(out, "  SHA-256:   {}", sha);
    }
    let _ = writeln!(
        out,
        "  Layout:    v{} hash {:08x} ({} features)",
        info.layout.version, info.layout.hash, info.layout.feature_count
    );

    if let Some(card) = &info.card {
        let _ = writeln!(out);
        let _ = writeln!(out, "How the model works");
        match card.n_estimators {
            Some(n) => {
                let _ = writeln!(out, "  Algorithm: {} ({} trees)", card.algorithm, n);
            }
            None => {
                let _ = writeln!(out, "  Algorithm: {}", card.algorithm);
            }
        }
        if let Some(accuracy) = card.accuracy {
            match card.test_samples {
                Some(n) => {
                    let _ = writeln!(out, "  Accuracy:  {:.0}% on {} test rows", accuracy * 100.0, n);
                }
                None => {
                    let _ = writeln!(out, "  Accuracy:  {:.0}%", accuracy * 100.0);
                }
            }
        }
        if !card.class_report.is_empty() {
            let _ = writeln!(out, "  {:<12} {:>9} {:>7} {:>8}", "Class", "Precision", "Recall", "F1");
            for m in &card.class_report {
                let _ = writeln!(
                    out,
                    "  {:<12} {:>9.2} {:>7.2} {:>8.2}",
                    m.label, m.precision, m.recall, m.f1_score
                );
            }
        }
        if let Some(dataset) = &card.dataset {
            let _ = writeln!(
                out,
                "  Dataset:   {} rows, {} columns{}",
                dataset.rows,
                dataset.columns,
                dataset
                    .source
                    .as_ref()
                    .map(|s| format!(" ({})", s))
                    .unwrap_or_default()
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Feature importance");
    for f in &info.ranked_importances {
        let _ = writeln!(
            out,
            "  {:<28} {} {:.1}%",
            readable_name(&f.name),
            bar(f.importance),
            f.importance * 100.0
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Reference profile: {:?}{}",
        info.reference_averages,
        if info.reference_is_default {
            " (built-in, not validated against population data)"
        } else {
            ""
        }
    );

    out
}
