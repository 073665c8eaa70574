use crate::core::engine::{Evaluation, Outcome};
use crate::domain::model::{CompetitorEntry, EvaluationResult};
use crate::utils::error::Result;
use std::fmt::Write as _;

pub use crate::core::interpreter::PARSE_FAILED_MESSAGE;

/// Renders the dashboard for one evaluation as plain terminal text.
pub fn render_text(evaluation: &Evaluation) -> String {
    let mut out = String::new();

    let location = if evaluation.request.location.trim().is_empty() {
        "anywhere"
    } else {
        evaluation.request.location.trim()
    };
    let _ = writeln!(out, "Reality Check: {} @ {}", evaluation.request.idea.trim(), location);
    let _ = writeln!(out, "{}", "=".repeat(40));

    match &evaluation.outcome {
        Outcome::Assessed { result } => render_assessment(&mut out, result),
        Outcome::Narrative { text } => {
            let _ = writeln!(out, "{}", text);
            render_signals(&mut out, evaluation);
        }
        Outcome::ParseFailed { .. } => {
            let _ = writeln!(out, "❌ {}", PARSE_FAILED_MESSAGE);
        }
        Outcome::TransportFailed { message, fallback } => {
            let _ = writeln!(out, "❌ {}", message);
            if let Some(score) = fallback {
                let _ = writeln!(out, "Heuristic estimate (not from the model): {}", score);
            }
            render_signals(&mut out, evaluation);
        }
    }

    out
}

pub fn render_json(evaluation: &Evaluation) -> Result<String> {
    Ok(serde_json::to_string_pretty(evaluation)?)
}

fn render_assessment(out: &mut String, result: &EvaluationResult) {
    let _ = writeln!(out, "Success probability: {}", result.success_probability);
    let _ = writeln!(out, "Market size:         {}", result.market_size);
    let _ = writeln!(out, "Competitors:         {}", result.competitor_count);
    let _ = writeln!(out, "Location:            {}", result.location);
    let _ = writeln!(out, "Local demand:        {}", result.local_demand);

    let _ = writeln!(out);
    render_competitor_table(out, &result.nearby_competitors);
    render_list(out, "Key insights", &result.key_insights);
    render_list(out, "Risks", &result.risks);
}

// 原始頁面也會列出蒐集到的競爭者與需求訊號
fn render_signals(out: &mut String, evaluation: &Evaluation) {
    let _ = writeln!(out);
    render_competitor_table(out, &evaluation.signals.competitors);
    let _ = writeln!(out, "Demand signal: {}", evaluation.signals.demand);
}

fn render_competitor_table(out: &mut String, competitors: &[CompetitorEntry]) {
    let _ = writeln!(out, "Nearby competitors:");
    if competitors.is_empty() {
        let _ = writeln!(out, "  (none found)");
        return;
    }

    let name_width = competitors
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let _ = writeln!(out, "  {:<width$}  {:<12}  Rating", "Name", "Distance", width = name_width);
    for competitor in competitors {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<12}  {}",
            competitor.name,
            competitor.distance,
            competitor.rating,
            width = name_width
        );
    }
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", title);
    if items.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item);
    }
}
