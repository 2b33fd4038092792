//! Contract parser: turns raw market records into structured contracts.
//!
//! Thresholds, dates, and contract types live only in free-text titles
//! like "Will the high temp in NYC be >= 50°F on Dec 25?", so extraction
//! is regex-based and every field is optional. Prices arrive as integer
//! cents and leave normalized to [0, 1].

use chrono::{Datelike, NaiveDate};
use common::{Contract, ContractType, MarketInfo};
use regex::Regex;

pub struct ContractParser {
    range_re: Regex,
    fahrenheit_re: Regex,
    operator_re: Regex,
    degrees_word_re: Regex,
    degree_sign_re: Regex,
    month_date_re: Regex,
    numeric_date_re: Regex,
}

impl ContractParser {
    pub fn new() -> Self {
        Self {
            range_re: Regex::new(r"(?i)between\s+([\d.]+)\s*°?\s*F?\s+and\s+([\d.]+)")
                .expect("valid range regex"),
            fahrenheit_re: Regex::new(r"([\d.]+)\s*°?\s*[Ff]\b").expect("valid °F regex"),
            operator_re: Regex::new(r"[><=]+\s*([\d.]+)").expect("valid operator regex"),
            degrees_word_re: Regex::new(r"(?i)([\d.]+)\s*degrees").expect("valid degrees regex"),
            degree_sign_re: Regex::new(r"([\d.]+)\s*°").expect("valid degree-sign regex"),
            month_date_re: Regex::new(
                r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+(\d{1,2})(?:,\s*(\d{4}))?",
            )
            .expect("valid month-date regex"),
            numeric_date_re: Regex::new(r"(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?")
                .expect("valid numeric-date regex"),
        }
    }

    /// Parse one raw market into a structured contract.
    ///
    /// `today` anchors the year for titles that print a month and day
    /// only ("Dec 25"); passing it in keeps parsing deterministic.
    pub fn parse(&self, market: &MarketInfo, today: NaiveDate) -> Contract {
        let title = &market.title;

        let contract_type = contract_type(title);
        let (threshold, threshold_high) = match contract_type {
            ContractType::Range => match self.range_bounds(title) {
                Some((low, high)) => (Some(low), Some(high)),
                None => (self.threshold(title), None),
            },
            _ => (self.threshold(title), None),
        };

        let yes_bid = cents_to_price(market.yes_bid);
        let yes_ask = cents_to_price(market.yes_ask);
        let yes_mid = match (yes_bid, yes_ask) {
            (Some(b), Some(a)) => Some((b + a) / 2.0),
            (Some(b), None) => Some(b),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        };

        Contract {
            ticker: market.ticker.clone(),
            title: market.title.clone(),
            event_ticker: market.event_ticker.clone(),
            yes_bid,
            yes_ask,
            yes_mid,
            volume: market.volume,
            open_time: market.open_time,
            close_time: market.close_time,
            status: market.status.clone(),
            threshold,
            threshold_high,
            target_date: self.target_date(title, today),
            contract_type,
        }
    }

    /// Extract a temperature threshold in °F from a title.
    pub fn threshold(&self, title: &str) -> Option<f64> {
        for re in [
            &self.fahrenheit_re,
            &self.operator_re,
            &self.degrees_word_re,
            &self.degree_sign_re,
        ] {
            if let Some(cap) = re.captures(title) {
                if let Ok(value) = cap[1].parse::<f64>() {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Extract both bounds of a "between X and Y" range.
    pub fn range_bounds(&self, title: &str) -> Option<(f64, f64)> {
        let cap = self.range_re.captures(title)?;
        let low = cap[1].parse::<f64>().ok()?;
        let high = cap[2].parse::<f64>().ok()?;
        Some((low.min(high), low.max(high)))
    }

    /// Extract the settlement date from a title, defaulting the year to
    /// `today`'s when the title omits it.
    pub fn target_date(&self, title: &str, today: NaiveDate) -> Option<NaiveDate> {
        if let Some(cap) = self.month_date_re.captures(title) {
            let month = month_number(&cap[1])?;
            let day = cap[2].parse::<u32>().ok()?;
            let year = match cap.get(3) {
                Some(y) => y.as_str().parse::<i32>().ok()?,
                None => today.year(),
            };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }

        if let Some(cap) = self.numeric_date_re.captures(title) {
            let month = cap[1].parse::<u32>().ok()?;
            let day = cap[2].parse::<u32>().ok()?;
            let year = match cap.get(3) {
                Some(y) => {
                    let y = y.as_str().parse::<i32>().ok()?;
                    if y < 100 {
                        y + 2000
                    } else {
                        y
                    }
                }
                None => today.year(),
            };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }

        None
    }
}

impl Default for ContractParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the settlement condition from title keywords.
fn contract_type(title: &str) -> ContractType {
    let lower = title.to_lowercase();

    if [">=", "greater", "above", "over", "exceed"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        ContractType::GreaterThan
    } else if ["<=", "less", "below", "under"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        ContractType::LessThan
    } else if ["between", "range", "within"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        ContractType::Range
    } else {
        ContractType::Unknown
    }
}

/// Cents → [0, 1]. Kalshi reports 0 for an empty book side; that is a
/// missing quote, not a free contract.
fn cents_to_price(cents: Option<i64>) -> Option<f64> {
    match cents {
        Some(c) if c > 0 => Some(c as f64 / 100.0),
        _ => None,
    }
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn make_market(title: &str, yes_bid: Option<i64>, yes_ask: Option<i64>) -> MarketInfo {
        MarketInfo {
            ticker: "KXHIGHNY-TEST".into(),
            event_ticker: "KXHIGHNY".into(),
            title: title.into(),
            status: "open".into(),
            yes_bid,
            yes_ask,
            no_bid: None,
            no_ask: None,
            volume: 120,
            open_time: None,
            close_time: None,
        }
    }

    #[test]
    fn test_threshold_patterns() {
        let p = ContractParser::new();
        assert_eq!(p.threshold("high temp be >= 50°F on Dec 25?"), Some(50.0));
        assert_eq!(p.threshold("high temp be >= 50 on Dec 25?"), Some(50.0));
        assert_eq!(p.threshold("reach 66 degrees today"), Some(66.0));
        assert_eq!(p.threshold("be 34° or below"), Some(34.0));
        assert_eq!(p.threshold("be 50.5 F or higher"), Some(50.5));
        assert_eq!(p.threshold("rain in NYC tomorrow"), None);
    }

    #[test]
    fn test_range_bounds() {
        let p = ContractParser::new();
        assert_eq!(
            p.range_bounds("be between 48° and 52° on Jan 5?"),
            Some((48.0, 52.0))
        );
        assert_eq!(
            p.range_bounds("be between 52 and 48 today"),
            Some((48.0, 52.0))
        );
        assert_eq!(p.range_bounds("be above 50°F"), None);
    }

    #[test]
    fn test_target_date_patterns() {
        let p = ContractParser::new();
        assert_eq!(
            p.target_date("on Dec 25?", today()),
            NaiveDate::from_ymd_opt(2025, 12, 25)
        );
        assert_eq!(
            p.target_date("on December 25, 2026?", today()),
            NaiveDate::from_ymd_opt(2026, 12, 25)
        );
        assert_eq!(
            p.target_date("on 12/25/26?", today()),
            NaiveDate::from_ymd_opt(2026, 12, 25)
        );
        // Invalid calendar dates fall through rather than panicking.
        assert_eq!(p.target_date("on Feb 30?", today()), None);
        assert_eq!(p.target_date("no date here", today()), None);
    }

    #[test]
    fn test_contract_type_keywords() {
        assert_eq!(contract_type("be >= 50°F"), ContractType::GreaterThan);
        assert_eq!(contract_type("exceed 60 degrees"), ContractType::GreaterThan);
        assert_eq!(contract_type("be 34° or below"), ContractType::LessThan);
        assert_eq!(contract_type("stay under 40°F"), ContractType::LessThan);
        assert_eq!(contract_type("be between 48° and 52°"), ContractType::Range);
        assert_eq!(contract_type("something else entirely"), ContractType::Unknown);
    }

    #[test]
    fn test_parse_full_contract() {
        let p = ContractParser::new();
        let market = make_market(
            "Will NYC high temp be >= 50°F on Dec 25?",
            Some(45),
            Some(55),
        );

        let c = p.parse(&market, today());
        assert_eq!(c.contract_type, ContractType::GreaterThan);
        assert_eq!(c.threshold, Some(50.0));
        assert_eq!(c.threshold_high, None);
        assert_eq!(c.target_date, NaiveDate::from_ymd_opt(2025, 12, 25));
        assert_eq!(c.yes_bid, Some(0.45));
        assert_eq!(c.yes_ask, Some(0.55));
        assert_eq!(c.yes_mid, Some(0.50));
        assert_eq!(c.volume, 120);
    }

    #[test]
    fn test_parse_range_contract_carries_both_bounds() {
        let p = ContractParser::new();
        let market = make_market(
            "Will NYC high temp be between 48° and 52° on Dec 25?",
            Some(20),
            Some(26),
        );

        let c = p.parse(&market, today());
        assert_eq!(c.contract_type, ContractType::Range);
        assert_eq!(c.threshold, Some(48.0));
        assert_eq!(c.threshold_high, Some(52.0));
    }

    #[test]
    fn test_mid_price_fallbacks() {
        let p = ContractParser::new();

        // Single quoted side becomes the mid.
        let c = p.parse(&make_market("be >= 50°F on Dec 25?", Some(45), None), today());
        assert_eq!(c.yes_mid, Some(0.45));

        // A zero quote is an empty book side, not a price.
        let c = p.parse(&make_market("be >= 50°F on Dec 25?", Some(0), Some(60)), today());
        assert_eq!(c.yes_bid, None);
        assert_eq!(c.yes_mid, Some(0.60));

        let c = p.parse(&make_market("be >= 50°F on Dec 25?", None, None), today());
        assert_eq!(c.yes_mid, None);
    }
}
