//! Plain-text report rendering.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use common::{Analysis, AnalysisStatus};

const BAR: &str =
    "================================================================================";
const RULE: &str =
    "--------------------------------------------------------------------------------";

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn opt_pct(value: Option<f64>) -> String {
    value.map(pct).unwrap_or_else(|| "N/A".into())
}

/// Render the ranked opportunity list.
pub fn render_opportunities(analyses: &[Analysis], min_edge: f64, min_volume: i64) -> String {
    if analyses.is_empty() {
        return "No opportunities found matching criteria.".into();
    }

    let mut lines = vec![
        BAR.to_string(),
        "KALSHI WEATHER MARKET OPPORTUNITIES".to_string(),
        BAR.to_string(),
        String::new(),
        format!(
            "Found {} opportunities with edge >= {}",
            analyses.len(),
            min_edge
        ),
        format!("Minimum volume: {}", min_volume),
        RULE.to_string(),
    ];

    for (idx, analysis) in analyses.iter().enumerate() {
        let c = &analysis.contract;
        lines.push(String::new());
        lines.push(format!("{}. {}", idx + 1, c.ticker));
        lines.push(format!("   Title: {}", c.title));
        lines.push(format!(
            "   Date: {} | Threshold: {}",
            c.target_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".into()),
            match (c.threshold, c.threshold_high) {
                (Some(lo), Some(hi)) => format!("{} to {}°F", lo, hi),
                (Some(t), None) => format!("{}°F", t),
                _ => "?".into(),
            }
        ));
        lines.push(format!(
            "   Model Probability: {}",
            opt_pct(analysis.model_probability)
        ));
        lines.push(format!("   Market Price: {}", opt_pct(analysis.market_price)));
        lines.push(format!("   Edge: {}", opt_pct(analysis.edge)));
        lines.push(format!(
            "   Expected Value: {}",
            analysis
                .expected_value
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "N/A".into())
        ));
        lines.push(format!(
            "   Kelly Fraction: {}",
            opt_pct(analysis.kelly_fraction)
        ));
        lines.push(format!("   Volume: {}", c.volume));
    }

    lines.push(String::new());
    lines.push(BAR.to_string());
    lines.join("\n")
}

/// Render the climatological forecast for a date.
pub fn render_forecast(
    date: NaiveDate,
    mean: f64,
    std_dev: f64,
    percentiles: &BTreeMap<u8, f64>,
) -> String {
    let mut lines = vec![
        BAR.to_string(),
        format!("FORECAST FOR {}", date),
        BAR.to_string(),
        format!("Mean: {:.1}°F", mean),
        format!("Std Dev: {:.1}°F", std_dev),
    ];

    if let (Some(lo), Some(hi)) = (percentiles.get(&5), percentiles.get(&95)) {
        lines.push(format!("95% Range: {:.1}°F - {:.1}°F", lo, hi));
    }
    if let (Some(lo), Some(hi)) = (percentiles.get(&10), percentiles.get(&90)) {
        lines.push(format!("80% Range: {:.1}°F - {:.1}°F", lo, hi));
    }

    lines.push(String::new());
    lines.push("Percentiles:".to_string());
    for (level, value) in percentiles {
        lines.push(format!("  p{:<2} {:.1}°F", level, value));
    }

    lines.join("\n")
}

/// Render a single-contract analysis in detail.
pub fn render_analysis(analysis: &Analysis) -> String {
    let c = &analysis.contract;
    let mut lines = vec![
        BAR.to_string(),
        format!("ANALYSIS: {}", c.ticker),
        BAR.to_string(),
        format!("Title: {}", c.title),
        format!("Status: {}", c.status),
        format!("Type: {:?}", c.contract_type),
    ];

    match analysis.status {
        AnalysisStatus::Complete => {
            lines.push(format!(
                "Model Probability: {}",
                opt_pct(analysis.model_probability)
            ));
            lines.push(format!("Market Price: {}", opt_pct(analysis.market_price)));
            lines.push(format!("Edge: {}", opt_pct(analysis.edge)));
            lines.push(format!("Kelly Fraction: {}", opt_pct(analysis.kelly_fraction)));
        }
        AnalysisStatus::CannotEvaluate(reason) => {
            lines.push(format!("Cannot evaluate: {:?}", reason));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Contract, ContractType};

    fn fixture_analysis() -> Analysis {
        let contract = Contract {
            ticker: "KXHIGHNY-25DEC25-T50".into(),
            title: "Will NYC high temp be >= 50°F on Dec 25?".into(),
            event_ticker: "KXHIGHNY".into(),
            yes_bid: Some(0.38),
            yes_ask: Some(0.42),
            yes_mid: Some(0.40),
            volume: 250,
            open_time: None,
            close_time: None,
            status: "open".into(),
            threshold: Some(50.0),
            threshold_high: None,
            target_date: NaiveDate::from_ymd_opt(2025, 12, 25),
            contract_type: ContractType::GreaterThan,
        };
        Analysis {
            contract,
            model_probability: Some(0.60),
            market_price: Some(0.40),
            edge: Some(0.20),
            expected_value: Some(0.20),
            kelly_fraction: Some(1.0 / 3.0),
            status: AnalysisStatus::Complete,
        }
    }

    #[test]
    fn test_empty_report() {
        assert!(render_opportunities(&[], 0.05, 0).contains("No opportunities"));
    }

    #[test]
    fn test_opportunity_report_contents() {
        let report = render_opportunities(&[fixture_analysis()], 0.05, 0);
        assert!(report.contains("KXHIGHNY-25DEC25-T50"));
        assert!(report.contains("Edge: 20.0%"));
        assert!(report.contains("Kelly Fraction: 33.3%"));
        assert!(report.contains("Volume: 250"));
    }

    #[test]
    fn test_forecast_report_contents() {
        let mut pct = BTreeMap::new();
        for (level, value) in [(5u8, 38.0), (10, 41.0), (50, 47.0), (90, 53.0), (95, 56.0)] {
            pct.insert(level, value);
        }
        let report = render_forecast(
            NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            47.0,
            5.5,
            &pct,
        );
        assert!(report.contains("Mean: 47.0°F"));
        assert!(report.contains("95% Range: 38.0°F - 56.0°F"));
        assert!(report.contains("p50 47.0°F"));
    }
}
