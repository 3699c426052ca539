use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file. Durations are kept as
/// strings (`"10s"`, `"1m 30s"`) and parsed during composition.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub store: FileStoreConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileStoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values, unparsed.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub port: Option<String>,
    pub rpc_port: Option<String>,
    pub read_timeout: Option<String>,
    pub write_timeout: Option<String>,
    pub database_url: Option<String>,
    pub list_timeout: Option<String>,
    pub max_connections: Option<String>,
    pub connect_timeout: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            config_path: var("USER_SERVICE_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            port: var("PORT"),
            rpc_port: var("RPC_PORT"),
            read_timeout: var("READ_TIMEOUT"),
            write_timeout: var("WRITE_TIMEOUT"),
            database_url: var("DATABASE_URL"),
            list_timeout: var("LIST_TIMEOUT"),
            max_connections: var("DB_MAX_CONNECTIONS"),
            connect_timeout: var("DB_CONNECT_TIMEOUT"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").map(|raw| parse_csv(&raw)),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_values_are_treated_as_unset() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("DATABASE_URL", "   "), ("PORT", ":8080")]);
        let env = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert!(env.database_url.is_none());
        assert_eq!(env.port.as_deref(), Some(":8080"));
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let vars = HashMap::from([(
            "CORS_ALLOWED_ORIGINS",
            "http://a.test, ,http://b.test ",
        )]);
        let env = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            env.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }
}
