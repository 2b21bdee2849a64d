//! # Brew Register Entry Point
//!
//! Drives one cashier session from stdin: every line is a JSON cart command,
//! every answer is one JSON line on stdout.
//!
//! ```text
//! $ brew-register
//! {"action":"add_item","product":{"id":"latte","name":"Latte","price":4.5}}
//! {"ok":true,"cart":{"items":[...],"totals":{"total":"4.5",...},...}}
//! {"action":"set_discount","kind":"percent","value":"abc"}
//! {"ok":false,"error":{"code":"VALIDATION_ERROR","message":"..."}}
//! ```
//!
//! `BREW_CONFIG` points at a register.toml; otherwise the platform config
//! directory is used. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use brew_core::CartCommand;
use register::commands::cart::{apply_cart_command, CartResponse};
use register::error::ApiError;
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
#[serde(untagged)]
enum Reply {
    Ok { ok: bool, cart: CartResponse },
    Err { ok: bool, error: ApiError },
}

fn handle(register: &register::Register, line: &str) -> Reply {
    let command: CartCommand = match serde_json::from_str(line) {
        Ok(command) => command,
        Err(e) => {
            return Reply::Err {
                ok: false,
                error: ApiError::validation(format!("Unreadable command: {}", e)),
            }
        }
    };

    match apply_cart_command(&register.cart, command) {
        Ok(cart) => Reply::Ok { ok: true, cart },
        Err(error) => Reply::Err { ok: false, error },
    }
}

fn main() -> ExitCode {
    let register = register::bootstrap(std::env::var_os("BREW_CONFIG").map(PathBuf::from));

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle(&register, &line);
        let written = serde_json::to_string(&reply)
            .map_err(io::Error::from)
            .and_then(|json| writeln!(stdout, "{}", json));
        if let Err(e) = written {
            error!("Failed to write reply: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
