//! # Register Library
//!
//! The session layer of a Brew POS register: owns one cashier's cart,
//! exposes cart and order commands, and wires logging and configuration.
//!
//! ## Module Organization
//! ```text
//! register/
//! ├── lib.rs          ◄─── You are here (bootstrap & logging)
//! ├── main.rs         ◄─── Line-oriented driver over stdin
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Shared cart handle
//! │   └── config.rs   ◄─── register.toml + environment
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── order.rs    ◄─── Order submission
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use state::{CartState, RegisterConfig};

/// A ready-to-use register: configuration plus an empty cart.
#[derive(Debug, Clone, Default)]
pub struct Register {
    pub config: RegisterConfig,
    pub cart: CartState,
}

impl Register {
    pub fn new(config: RegisterConfig) -> Self {
        Register {
            config,
            cart: CartState::new(),
        }
    }
}

/// Starts a register.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → register.toml → BREW_* environment                     │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG if set, else [logging] filter                            │
/// │     • A config load failure is logged now, then defaults are used       │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • CartState: empty cart, no promotions                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn bootstrap(config_path: Option<PathBuf>) -> Register {
    let loaded = RegisterConfig::load(config_path);

    let filter = loaded
        .as_ref()
        .map(|config| config.logging.filter.clone())
        .unwrap_or_else(|_| state::DEFAULT_LOG_FILTER.to_string());
    init_tracing(&filter);

    let config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load register config: {}. Using defaults.", e);
        RegisterConfig::default()
    });

    info!(
        store = %config.store.name,
        currency = %config.currency.code,
        "Register started"
    );

    Register::new(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=register=trace` - Show trace for the register only
/// - Default: `fallback`
///
/// Logs go to stderr: stdout belongs to the driver's JSON replies.
/// Calling it twice keeps the first subscriber.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(state::DEFAULT_LOG_FILTER));

    let _ = log_subscriber(filter, std::io::stderr).try_init();
}

fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_bootstrap_with_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let register = bootstrap(Some(dir.path().join("register.toml")));

        assert!(register.cart.with_cart(|c| c.is_empty()));
        assert!(!register.config.currency.code.is_empty());
    }

    #[test]
    fn test_bootstrap_with_bad_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register.toml");
        std::fs::write(&path, "[currency\ncode = ").unwrap();

        let register = bootstrap(Some(path));
        assert_eq!(register.config, RegisterConfig::default());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_lines_go_to_the_given_writer() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = log_subscriber(EnvFilter::new("debug"), move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(action = "add_item", "cart command");
        });

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("cart command"));
        assert!(logged.contains("add_item"));
    }

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        init_tracing("info");
        init_tracing("not a [valid filter");
    }
}
