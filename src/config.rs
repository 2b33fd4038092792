//! Configuration loader: merges defaults, config.toml, and env vars.

use std::path::Path;

use common::config::BotConfig;
use common::Error;

fn parse_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number")))
}

fn parse_non_negative_i64(raw: &str, env_name: &str) -> Result<i64, Error> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer >= 0")))?;
    if parsed < 0 {
        return Err(Error::Config(format!("{env_name} must be an integer >= 0")));
    }
    Ok(parsed)
}

fn parse_date(raw: &str, env_name: &str) -> Result<chrono::NaiveDate, Error> {
    raw.trim()
        .parse::<chrono::NaiveDate>()
        .map_err(|_| Error::Config(format!("{env_name} must be a date (YYYY-MM-DD)")))
}

fn validate_config(config: &BotConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.location.series_ticker.trim().is_empty() {
        issues.push("location.series_ticker must be set".into());
    }
    if config.location.timezone.trim().is_empty() {
        issues.push("location.timezone must be set".into());
    }
    if !(-90.0..=90.0).contains(&config.location.latitude) {
        issues.push("location.latitude must be in [-90, 90]".into());
    }
    if !(-180.0..=180.0).contains(&config.location.longitude) {
        issues.push("location.longitude must be in [-180, 180]".into());
    }

    if config.history.start_date >= config.history.end_date {
        issues.push("history.start_date must be before history.end_date".into());
    }

    if config.model.window == 0 || config.model.window > 182 {
        issues.push("model.window must be in 1..=182".into());
    }
    if config.model.min_samples < 2 {
        issues.push("model.min_samples must be >= 2".into());
    }
    if config.model.epsilon <= 0.0 {
        issues.push("model.epsilon must be > 0".into());
    }

    if !(0.0..=1.0).contains(&config.scan.min_edge) {
        issues.push("scan.min_edge must be in [0, 1]".into());
    }
    if config.scan.min_volume < 0 {
        issues.push("scan.min_volume must be >= 0".into());
    }
    if config.scan.max_results == 0 {
        issues.push("scan.max_results must be > 0".into());
    }
    if config.scan.status.trim().is_empty() {
        issues.push("scan.status must be set".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load configuration from the optional config file and environment.
pub fn load_config() -> Result<BotConfig, Error> {
    // 1. Load .env file if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = BotConfig::default();

    // 3. Overlay config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Environment variables win (highest priority).
    if let Ok(raw) = std::env::var("CLIMO_SERIES_TICKER") {
        config.location.series_ticker = raw;
    }
    if let Ok(raw) = std::env::var("CLIMO_LATITUDE") {
        config.location.latitude = parse_f64(&raw, "CLIMO_LATITUDE")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_LONGITUDE") {
        config.location.longitude = parse_f64(&raw, "CLIMO_LONGITUDE")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_TIMEZONE") {
        config.location.timezone = raw;
    }
    if let Ok(raw) = std::env::var("CLIMO_HISTORY_START") {
        config.history.start_date = parse_date(&raw, "CLIMO_HISTORY_START")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_HISTORY_END") {
        config.history.end_date = parse_date(&raw, "CLIMO_HISTORY_END")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_WINDOW") {
        let parsed = parse_non_negative_i64(&raw, "CLIMO_WINDOW")?;
        config.model.window = u16::try_from(parsed)
            .map_err(|_| Error::Config("CLIMO_WINDOW is out of range".into()))?;
    }
    if let Ok(raw) = std::env::var("CLIMO_MIN_SAMPLES") {
        config.model.min_samples = parse_non_negative_i64(&raw, "CLIMO_MIN_SAMPLES")? as usize;
    }
    if let Ok(raw) = std::env::var("CLIMO_EPSILON") {
        config.model.epsilon = parse_f64(&raw, "CLIMO_EPSILON")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_MIN_EDGE") {
        config.scan.min_edge = parse_f64(&raw, "CLIMO_MIN_EDGE")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_MIN_VOLUME") {
        config.scan.min_volume = parse_non_negative_i64(&raw, "CLIMO_MIN_VOLUME")?;
    }
    if let Ok(raw) = std::env::var("CLIMO_MAX_RESULTS") {
        config.scan.max_results = parse_non_negative_i64(&raw, "CLIMO_MAX_RESULTS")? as usize;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BotConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.location.series_ticker, "KXHIGHNY");
        assert_eq!(config.model.window, 7);
        assert_eq!(config.model.min_samples, 30);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut config = BotConfig::default();
        config.model.window = 200;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("model.window"));
    }

    #[test]
    fn test_reversed_history_rejected() {
        let mut config = BotConfig::default();
        config.history.start_date = config.history.end_date;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_f64(" 0.05 ", "X").unwrap(), 0.05);
        assert!(parse_f64("edge", "X").is_err());
        assert!(parse_non_negative_i64("-3", "X").is_err());
        assert_eq!(
            parse_date("2024-12-31", "X").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }
}
