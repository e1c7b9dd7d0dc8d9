// Configuration validation
use crate::error::{ConfigError, Result};
use crate::settings::EngineConfig;

const SUPPORTED_LOCALES: [&str; 3] = ["english", "tagalog", "cebuano"];

/// Reject configurations the engine cannot run with
pub fn validate(config: &EngineConfig) -> Result<()> {
    let fusion = &config.fusion;
    for (name, weight) in [
        ("fusion.structured_weight", fusion.structured_weight),
        ("fusion.text_weight", fusion.text_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(invalid(format!("{} must be a non-negative number, got {}", name, weight)));
        }
    }
    if fusion.structured_weight + fusion.text_weight <= 0.0 {
        return Err(invalid("fusion weights must not both be zero"));
    }
    if !(0.0..=1.0).contains(&fusion.min_probability) {
        return Err(invalid(format!(
            "fusion.min_probability must be within [0, 1], got {}",
            fusion.min_probability
        )));
    }
    if fusion.top_n == 0 {
        return Err(invalid("fusion.top_n must be at least 1"));
    }
    if !fusion.temperature.is_finite() || fusion.temperature <= 0.0 {
        return Err(invalid(format!("fusion.temperature must be positive, got {}", fusion.temperature)));
    }

    let structured = &config.structured;
    if !structured.base_score.is_finite() || structured.base_score <= 0.0 {
        return Err(invalid("structured.base_score must be positive"));
    }
    if structured.boost_cap < 0.0 || structured.per_symptom_increment < 0.0 {
        return Err(invalid("structured count boost must be non-negative"));
    }
    if let Some(bad) = structured.unknown_symptom_boosts.iter().find(|b| !b.boost.is_finite() || b.boost < 0.0) {
        return Err(invalid(format!("unknown symptom boost for {} must be non-negative", bad.disease)));
    }

    let text = &config.text;
    if text.max_length < 2 {
        return Err(invalid("text.max_length must leave room for the boundary tokens"));
    }
    if !text.fallback_base.is_finite() || text.fallback_base <= 0.0 {
        return Err(invalid("text.fallback_base must be positive"));
    }
    if !text.fallback_increment.is_finite() || text.fallback_increment < 0.0 {
        return Err(invalid("text.fallback_increment must be non-negative"));
    }

    if !SUPPORTED_LOCALES.contains(&config.locale.to_lowercase().as_str()) {
        return Err(invalid(format!("unsupported locale: {}", config.locale)));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut config = EngineConfig::default();
        config.fusion.structured_weight = 0.0;
        config.fusion.text_weight = 0.0;
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = EngineConfig::default();
        config.fusion.text_weight = -0.1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_temperature_rejected() {
        let mut config = EngineConfig::default();
        config.fusion.temperature = 0.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let mut config = EngineConfig::default();
        config.locale = "Klingon".to_string();
        assert!(validate(&config).is_err());
        config.locale = "cebuano".to_string();
        assert!(validate(&config).is_ok());
    }
}
