//! Send SMS messages through an HTTP SMS gateway.
//!
//! The crate is split the usual way for a typed API client: a domain layer of validated types,
//! a transport layer for the JSON wire format, and a small client layer that posts the request
//! with retry/backoff. The `sms-send` binary wraps it in a CLI.
//!
//! ```rust,no_run
//! use sms_send::{SendSms, SmsGatewayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sms_send::SmsGatewayError> {
//!     let client = SmsGatewayClient::new("192.168.1.100:8080")?;
//!     let request = SendSms::from_parts("15888888888;19999999999", "hello", Some(1))?;
//!     let response = client.send_sms(request).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
mod transport;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use client::{RetryPolicy, SmsGatewayClient, SmsGatewayClientBuilder, SmsGatewayError};
pub use domain::{
    GatewayUrl, MessageText, RawPhoneNumber, Recipients, SendSms, SendSmsResponse, SimSlot,
    TimestampMillis, ValidationError,
};

/// Initialize logging on stderr. `RUST_LOG` takes precedence over the debug flag.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
