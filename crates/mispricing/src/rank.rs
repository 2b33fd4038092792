//! Opportunity filtering and ranking.

use std::cmp::Ordering;

use common::{Analysis, Contract};

use crate::analyzer::MispricingAnalyzer;

/// Filter and rank a contract batch.
///
/// The pipeline order is load-bearing: the volume floor drops contracts
/// before they are analyzed, then contracts whose edge is undefined or
/// below `min_edge` drop out, and only the survivors are sorted by
/// expected value (descending, missing values last) and truncated.
/// Reordering these steps changes which contracts are silently dropped.
pub fn rank_opportunities(
    analyzer: &MispricingAnalyzer<'_>,
    contracts: &[Contract],
    min_edge: f64,
    min_volume: i64,
    max_results: usize,
) -> Vec<Analysis> {
    let mut results: Vec<Analysis> = Vec::new();

    for contract in contracts {
        if contract.volume < min_volume {
            continue;
        }

        let analysis = analyzer.analyze(contract);
        match analysis.edge {
            Some(e) if e >= min_edge => results.push(analysis),
            _ => {}
        }
    }

    sort_by_expected_value(&mut results);
    results.truncate(max_results);
    results
}

/// Sort analyses by expected value, highest first, missing values last.
pub fn sort_by_expected_value(analyses: &mut [Analysis]) {
    analyses.sort_by(|a, b| match (a.expected_value, b.expected_value) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use climatology::ClimatologyModel;
    use common::config::ModelConfig;
    use common::{AnalysisStatus, ContractType, Observation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Point-mass model at 75°F: P(T ≥ 74) is exactly 1 on every date,
    /// so a contract's expected value is 1 − its mid price.
    fn constant_model() -> ClimatologyModel {
        let mut obs = Vec::new();
        for year in 1995..2025 {
            let mut d = date(year, 1, 1);
            while d.year() == year {
                obs.push(Observation { date: d, high_temp: 75.0 });
                d = d.succ_opt().unwrap();
            }
        }
        ClimatologyModel::train(&obs, &ModelConfig::default()).unwrap()
    }

    fn make_contract(ticker: &str, mid: Option<f64>, volume: i64) -> Contract {
        Contract {
            ticker: ticker.into(),
            title: "test".into(),
            event_ticker: "KXHIGHNY".into(),
            yes_bid: mid,
            yes_ask: mid,
            yes_mid: mid,
            volume,
            open_time: None,
            close_time: None,
            status: "open".into(),
            threshold: Some(74.0),
            threshold_high: None,
            target_date: Some(date(2026, 6, 29)),
            contract_type: ContractType::GreaterThan,
        }
    }

    #[test]
    fn test_ranking_order_and_exclusion() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        // Expected values 0.3, undefined (no price), 0.1, 0.5.
        let contracts = vec![
            make_contract("EV-03", Some(0.70), 100),
            make_contract("EV-NONE", None, 100),
            make_contract("EV-01", Some(0.90), 100),
            make_contract("EV-05", Some(0.50), 100),
        ];

        let ranked = rank_opportunities(&analyzer, &contracts, 0.0, 0, 20);

        // The unpriced contract has no edge, so the edge filter drops it;
        // the rest come back highest expected value first.
        let tickers: Vec<&str> = ranked.iter().map(|a| a.contract.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["EV-05", "EV-03", "EV-01"]);
        assert!(ranked.iter().all(|a| a.is_complete()));
    }

    #[test]
    fn test_volume_floor_applies_before_analysis() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        let contracts = vec![
            make_contract("THIN", Some(0.50), 10),
            make_contract("LIQUID", Some(0.70), 500),
        ];

        // THIN has the better edge but fails the volume floor.
        let ranked = rank_opportunities(&analyzer, &contracts, 0.0, 100, 20);
        let tickers: Vec<&str> = ranked.iter().map(|a| a.contract.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["LIQUID"]);
    }

    #[test]
    fn test_min_edge_threshold() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        let contracts = vec![
            make_contract("BIG-EDGE", Some(0.50), 100),   // edge 0.5
            make_contract("SMALL-EDGE", Some(0.97), 100), // edge 0.03
        ];

        let ranked = rank_opportunities(&analyzer, &contracts, 0.05, 0, 20);
        let tickers: Vec<&str> = ranked.iter().map(|a| a.contract.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BIG-EDGE"]);
    }

    #[test]
    fn test_truncation() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        let contracts: Vec<Contract> = (1..=5)
            .map(|i| make_contract(&format!("C{}", i), Some(0.10 * i as f64), 100))
            .collect();

        let ranked = rank_opportunities(&analyzer, &contracts, 0.0, 0, 2);
        assert_eq!(ranked.len(), 2);
        // Cheapest mid = largest EV ranks first.
        assert_eq!(ranked[0].contract.ticker, "C1");
        assert_eq!(ranked[1].contract.ticker, "C2");
    }

    #[test]
    fn test_bad_contract_does_not_abort_the_batch() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        let mut dateless = make_contract("BROKEN", Some(0.40), 100);
        dateless.target_date = None;

        let contracts = vec![dateless, make_contract("GOOD", Some(0.60), 100)];
        let ranked = rank_opportunities(&analyzer, &contracts, 0.0, 0, 20);

        let tickers: Vec<&str> = ranked.iter().map(|a| a.contract.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["GOOD"]);
    }

    #[test]
    fn test_sort_places_missing_expected_value_last() {
        let model = constant_model();
        let analyzer = MispricingAnalyzer::new(&model);

        // Build the missing-EV branch directly: an analysis that made it
        // past filtering (e.g. under a policy admitting unpriced rows)
        // must still sort behind every priced one.
        let mut analyses = vec![
            analyzer.analyze(&make_contract("PRICED-LOW", Some(0.90), 100)),
            analyzer.analyze(&make_contract("UNPRICED", None, 100)),
            analyzer.analyze(&make_contract("PRICED-HIGH", Some(0.50), 100)),
        ];
        assert_eq!(
            analyses[1].status,
            AnalysisStatus::Complete,
            "unpriced is evaluable, just edgeless"
        );

        sort_by_expected_value(&mut analyses);
        let tickers: Vec<&str> = analyses.iter().map(|a| a.contract.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["PRICED-HIGH", "PRICED-LOW", "UNPRICED"]);
    }
}
