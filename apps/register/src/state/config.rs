//! # Register Configuration
//!
//! Store, currency display, logging and checkout defaults for one register.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Load Order (later overrides earlier)                   │
//! │                                                                         │
//! │  1. Defaults (this file)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. register.toml (explicit path, or the platform config dir)           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. Environment (BREW_STORE_NAME, BREW_CURRENCY_CODE,                   │
//! │                  BREW_CURRENCY_SYMBOL, BREW_DISPLAY_RATE,               │
//! │                  BREW_LOG_FILTER)                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [store]
//! name = "Brew Coffee - Riverside"
//!
//! [currency]
//! code = "VND"
//! symbol = "₫"
//! decimals = 0
//! display_rate = 1.0
//!
//! [logging]
//! filter = "info,register=debug"
//!
//! [checkout]
//! default_payment_method = "CASH"
//! default_payment_status = "PAID"
//! default_order_status = "PENDING"
//! ```
//!
//! The currency section only affects how amounts are printed. Totals are
//! always computed in the store currency.
//!
//! Configuration is read-only after start-up, so no lock is needed.

use std::path::{Path, PathBuf};

use brew_core::checkout::CheckoutOptions;
use brew_core::{Money, OrderStatus, PaymentMethod, PaymentStatus};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,brew=debug,register=debug";

/// Highest number of decimals `format_money` will print.
const MAX_DISPLAY_DECIMALS: u32 = 4;

/// Largest accepted `display_rate`.
const MAX_DISPLAY_RATE: f64 = 1e9;

// =============================================================================
// Sections
// =============================================================================

/// `[store]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Printed on the cart panel and receipts.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Brew Coffee".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

/// `[currency]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Decimals printed by `format_money`.
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Multiplier from store currency to display currency.
    #[serde(default = "default_display_rate")]
    pub display_rate: f64,
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimals() -> u32 {
    2
}

fn default_display_rate() -> f64 {
    1.0
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimals: default_decimals(),
            display_rate: default_display_rate(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

/// `[checkout]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default)]
    pub default_payment_method: PaymentMethod,

    #[serde(default)]
    pub default_payment_status: PaymentStatus,

    #[serde(default)]
    pub default_order_status: OrderStatus,
}

// =============================================================================
// Register Config
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a file that exists but does not parse
    /// is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injectable environment lookup.
    fn load_with<F>(config_path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(env);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.code.trim().is_empty() {
            return Err(ConfigError::Invalid("currency.code must not be empty".into()));
        }

        if self.currency.decimals > MAX_DISPLAY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most {}, got {}",
                MAX_DISPLAY_DECIMALS, self.currency.decimals
            )));
        }

        let rate = self.currency.display_rate;
        if !rate.is_finite() || rate <= 0.0 || rate > MAX_DISPLAY_RATE {
            return Err(ConfigError::Invalid(format!(
                "currency.display_rate must be a positive number up to {}, got {}",
                MAX_DISPLAY_RATE, rate
            )));
        }

        Ok(())
    }

    /// Applies `BREW_*` overrides.
    fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = env("BREW_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(code) = env("BREW_CURRENCY_CODE") {
            debug!(code = %code, "Overriding currency code from environment");
            self.currency.code = code;
        }

        if let Some(symbol) = env("BREW_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(rate) = env("BREW_DISPLAY_RATE") {
            match rate.parse::<f64>() {
                Ok(r) => {
                    debug!(rate = r, "Overriding display rate from environment");
                    self.currency.display_rate = r;
                }
                Err(_) => warn!(rate = %rate, "Ignoring unparsable BREW_DISPLAY_RATE"),
            }
        }

        if let Some(filter) = env("BREW_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    /// `<config dir>/register.toml` for this platform.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "brew", "register")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Payment and status used for new orders.
    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            payment_method: self.checkout.default_payment_method,
            payment_status: self.checkout.default_payment_status,
            order_status: self.checkout.default_order_status,
        }
    }

    /// Formats an amount for display in the configured currency.
    ///
    /// If the conversion overflows, the unconverted amount is printed.
    ///
    /// ```rust
    /// use brew_core::Money;
    /// use register::state::RegisterConfig;
    ///
    /// let config = RegisterConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(123456)), "$1,234.56");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let rate = Decimal::from_f64(self.currency.display_rate).unwrap_or(Decimal::ONE);
        let decimals = self.currency.decimals.min(MAX_DISPLAY_DECIMALS);
        let converted = amount.amount().checked_mul(rate).unwrap_or_else(|| {
            warn!(%rate, "Display conversion overflowed, showing the store amount");
            amount.amount()
        });
        let shown =
            converted.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);

        let sign = if shown.is_sign_negative() && !shown.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.*}", decimals as usize, shown.abs());
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = format!("{}{}{}", sign, self.currency.symbol, group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

/// `1234567` → `1,234,567`
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
