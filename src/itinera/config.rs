//! Configuration for itinera.
//!
//! [`ItineraConfig`] carries the credentials and model choices both flows need. Construct it
//! in code and pass it to constructors; nothing in the library reads the environment on its
//! own. [`ItineraConfig::from_env`] exists for binaries that want the conventional variables.
//!
//! # Example
//!
//! ```rust
//! use itinera::ItineraConfig;
//!
//! let config = ItineraConfig::new("sk-openai", "tvly-key").with_max_rounds(4);
//! assert_eq!(config.models.guide, "gpt-4o");
//! assert_eq!(config.models.traveller, "gpt-4o-mini");
//! assert_eq!(config.max_rounds, 4);
//! ```

use std::fmt;

use crate::itinera::error::ConfigError;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_ROUNDS: usize = 15;

/// Model identity for each planning role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleModels {
    pub guide: String,
    pub traveller: String,
    pub critic: String,
    pub organizer: String,
}

impl Default for RoleModels {
    fn default() -> Self {
        Self {
            guide: "gpt-4o".to_string(),
            traveller: "gpt-4o-mini".to_string(),
            critic: "gpt-4o-mini".to_string(),
            organizer: "gpt-4o".to_string(),
        }
    }
}

impl RoleModels {
    /// Use the same model for all four roles.
    pub fn uniform(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            guide: model.clone(),
            traveller: model.clone(),
            critic: model.clone(),
            organizer: model,
        }
    }
}

/// Credentials, endpoints and model choices for the planner and the responder.
#[derive(Clone)]
pub struct ItineraConfig {
    pub openai_api_key: String,
    /// Alternate OpenAI-compatible endpoint; `None` targets api.openai.com.
    pub openai_base_url: Option<String>,
    pub tavily_api_key: String,
    pub tavily_base_url: String,
    pub models: RoleModels,
    pub responder_model: String,
    /// Round budget used by the HTTP backend and as the library default.
    pub max_rounds: usize,
}

impl fmt::Debug for ItineraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItineraConfig")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("tavily_api_key", &"<redacted>")
            .field("tavily_base_url", &self.tavily_base_url)
            .field("models", &self.models)
            .field("responder_model", &self.responder_model)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}

impl ItineraConfig {
    pub fn new(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_base_url: None,
            tavily_api_key: tavily_api_key.into(),
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            models: RoleModels::default(),
            responder_model: "gpt-4o".to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_models(mut self, models: RoleModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_responder_model(mut self, model: impl Into<String>) -> Self {
        self.responder_model = model.into();
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = Some(base_url.into());
        self
    }

    pub fn with_tavily_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.tavily_base_url = base_url.into();
        self
    }

    /// Build a config from process environment variables.
    ///
    /// Requires `OPENAI_API_KEY` and `TAVILY_API_KEY`. Optional overrides:
    /// `OPENAI_BASE_URL`, `TAVILY_BASE_URL`, `ITINERA_GUIDE_MODEL`, `ITINERA_TRAVELLER_MODEL`,
    /// `ITINERA_CRITIC_MODEL`, `ITINERA_ORGANIZER_MODEL`, `ITINERA_RESPONDER_MODEL`,
    /// `ITINERA_MAX_ROUNDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary lookup, so callers
    /// (and tests) can supply variables without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let mut config = Self::new(required("OPENAI_API_KEY")?, required("TAVILY_API_KEY")?);
        config.openai_base_url = lookup("OPENAI_BASE_URL");
        if let Some(url) = lookup("TAVILY_BASE_URL") {
            config.tavily_base_url = url;
        }

        let overrides: [(&'static str, &mut String); 5] = [
            ("ITINERA_GUIDE_MODEL", &mut config.models.guide),
            ("ITINERA_TRAVELLER_MODEL", &mut config.models.traveller),
            ("ITINERA_CRITIC_MODEL", &mut config.models.critic),
            ("ITINERA_ORGANIZER_MODEL", &mut config.models.organizer),
            ("ITINERA_RESPONDER_MODEL", &mut config.responder_model),
        ];
        for (name, slot) in overrides {
            if let Some(model) = lookup(name) {
                *slot = model;
            }
        }

        if let Some(raw) = lookup("ITINERA_MAX_ROUNDS") {
            config.max_rounds = match raw.trim().parse::<usize>() {
                Ok(rounds) if rounds >= 1 => rounds,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "ITINERA_MAX_ROUNDS",
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ItineraConfig::new("a", "b");
        assert_eq!(config.models, RoleModels::default());
        assert_eq!(config.responder_model, "gpt-4o");
        assert_eq!(config.tavily_base_url, DEFAULT_TAVILY_BASE_URL);
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(config.openai_base_url.is_none());
    }

    #[test]
    fn test_from_lookup_requires_keys() {
        let err = ItineraConfig::from_lookup(lookup_from(&[("TAVILY_API_KEY", "t")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("OPENAI_API_KEY"));

        let err = ItineraConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "o"),
            ("TAVILY_API_KEY", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("TAVILY_API_KEY"));
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let config = ItineraConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "o"),
            ("TAVILY_API_KEY", "t"),
            ("ITINERA_CRITIC_MODEL", "gpt-4.1"),
            ("ITINERA_MAX_ROUNDS", "3"),
            ("TAVILY_BASE_URL", "http://localhost:9999"),
        ]))
        .unwrap();

        assert_eq!(config.models.critic, "gpt-4.1");
        assert_eq!(config.models.guide, "gpt-4o");
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.tavily_base_url, "http://localhost:9999");
    }

    #[test]
    fn test_from_lookup_rejects_bad_round_count() {
        for bad in ["zero", "0", "-2"] {
            let err = ItineraConfig::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "o"),
                ("TAVILY_API_KEY", "t"),
                ("ITINERA_MAX_ROUNDS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { name: "ITINERA_MAX_ROUNDS", .. }));
        }
    }
}
