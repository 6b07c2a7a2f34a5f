use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub stripe: StripeConfig,
    #[serde(default)]
    pub mailthread: MailthreadConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    // shared secret with the hosted auth service
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailthreadConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub inbox: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlacesConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Read the config file if present, otherwise build entirely from env.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("failed to parse config file {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // without a config file the database URL must come from env
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no config file was found at {config_path}")
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                    },
                    stripe: StripeConfig {
                        secret_key: get_env("STRIPE_SECRET_KEY").unwrap_or_default(),
                        webhook_secret: get_env("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
                        success_url: get_env("STRIPE_SUCCESS_URL"),
                        cancel_url: get_env("STRIPE_CANCEL_URL"),
                    },
                    mailthread: MailthreadConfig {
                        api_key: get_env("MAILTHREAD_API_KEY").unwrap_or_default(),
                        base_url: get_env("MAILTHREAD_BASE_URL").unwrap_or_default(),
                        inbox: get_env("MAILTHREAD_INBOX").unwrap_or_default(),
                    },
                    places: PlacesConfig {
                        api_key: get_env("PLACES_API_KEY").unwrap_or_default(),
                        base_url: get_env("PLACES_BASE_URL").unwrap_or_default(),
                    },
                    llm: LlmConfig {
                        api_key: get_env("LLM_API_KEY").unwrap_or_default(),
                        base_url: get_env("LLM_BASE_URL").unwrap_or_default(),
                        model: get_env("LLM_MODEL").unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(anyhow!("failed to read config file {config_path}: {e}"));
            }
        };

        // Env vars win even when the file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            config.stripe.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_WEBHOOK_SECRET") {
            config.stripe.webhook_secret = v;
        }
        if let Ok(v) = env::var("STRIPE_SUCCESS_URL") {
            config.stripe.success_url = Some(v);
        }
        if let Ok(v) = env::var("STRIPE_CANCEL_URL") {
            config.stripe.cancel_url = Some(v);
        }
        if let Ok(v) = env::var("MAILTHREAD_API_KEY") {
            config.mailthread.api_key = v;
        }
        if let Ok(v) = env::var("MAILTHREAD_BASE_URL") {
            config.mailthread.base_url = v;
        }
        if let Ok(v) = env::var("MAILTHREAD_INBOX") {
            config.mailthread.inbox = v;
        }
        if let Ok(v) = env::var("PLACES_API_KEY") {
            config.places.api_key = v;
        }
        if let Ok(v) = env::var("PLACES_BASE_URL") {
            config.places.base_url = v;
        }
        if let Ok(v) = env::var("LLM_API_KEY") {
            config.llm.api_key = v;
        }
        if let Ok(v) = env::var("LLM_BASE_URL") {
            config.llm.base_url = v;
        }
        if let Ok(v) = env::var("LLM_MODEL") {
            config.llm.model = v;
        }

        Ok(config)
    }
}
