use std::{borrow::Cow, env};

use equipart_model::ObjectiveStrategy;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub objective: ObjectiveStrategy,
    pub strict: bool,
    pub balance_weight: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            objective: ObjectiveStrategy::MinRange,
            strict: true,
            balance_weight: 0.0,
        }
    }
}

impl RunConfig {
    /// Reads `EQUIPART_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, Cow<'static, str>> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Cow<'static, str>> {
        let mut config = Self::default();

        if let Some(value) = lookup("EQUIPART_OBJECTIVE") {
            config.objective = value.parse().map_err(|err| format!("EQUIPART_OBJECTIVE: {err}"))?;
        }
        if let Some(value) = lookup("EQUIPART_STRICT") {
            config.strict = parse_flag(&value)
                .ok_or_else(|| format!("EQUIPART_STRICT: expected true or false, got '{value}'"))?;
        }
        if let Some(value) = lookup("EQUIPART_BALANCE_WEIGHT") {
            config.balance_weight = value
                .trim()
                .parse()
                .map_err(|_| format!("EQUIPART_BALANCE_WEIGHT: invalid number '{value}'"))?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
