use crate::core::currency::Currency;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Config {
    pub log_level: String,
    pub default_currency: Currency,
    pub simplify_debts_default: bool,
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            default_currency: env::var("DEFAULT_CURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Currency::Usd),
            simplify_debts_default: env::var("SIMPLIFY_DEBTS_DEFAULT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

// Read-only after first access; nothing in the crate mutates it.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Installs `env_logger` at `CONFIG.log_level` unless `RUST_LOG` overrides it.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(CONFIG.log_level.as_str()))
        .try_init();
}
