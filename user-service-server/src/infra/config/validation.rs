use super::models::{Config, ListTimeoutSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Non-fatal checks run on a fully composed configuration.
pub fn apply_guard_rails(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.cors.is_wildcard_included() {
        warnings.push_with_hint(
            "CORS allows any origin",
            "Set CORS_ALLOWED_ORIGINS to a comma-separated list of trusted origins",
        );
    }

    if config.metadata.list_timeout_source == ListTimeoutSource::WriteTimeoutFallback {
        warnings.push_with_hint(
            format!(
                "LIST_TIMEOUT not set; listing users is bounded by WRITE_TIMEOUT ({})",
                humantime::format_duration(config.store.list_timeout)
            ),
            "Set LIST_TIMEOUT to tune the list bound separately",
        );
    }

    if config.store.list_timeout > config.server.write_timeout {
        warnings.push_with_hint(
            format!(
                "list timeout ({}) exceeds the response deadline ({})",
                humantime::format_duration(config.store.list_timeout),
                humantime::format_duration(config.server.write_timeout),
            ),
            "Slow listings will be cut off by the HTTP layer first",
        );
    }

    warnings
}
