//! Runtime configuration for the CLI
//!
//! Collects the gateway connection settings from parsed arguments and validates them before
//! anything touches the network.

use std::time::Duration;

use crate::cli::Args;
use crate::client::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, SmsGatewayClient,
    SmsGatewayError,
};
use crate::domain::{GatewayUrl, ValidationError};

/// Gateway connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Normalized gateway base URL
    pub gateway: GatewayUrl,
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Exponential backoff factor in seconds
    pub backoff_factor: f64,
    /// Verbose logging
    pub debug: bool,
}

impl Config {
    /// Config with default tuning for the given gateway.
    pub fn new(gateway: GatewayUrl) -> Self {
        Self {
            gateway,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            debug: false,
        }
    }

    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, ValidationError> {
        let gateway = GatewayUrl::parse(args.server.as_str())?;
        let timeout = timeout_from_secs(args.timeout)?;
        if !args.backoff_factor.is_finite() || args.backoff_factor < 0.0 {
            return Err(ValidationError::InvalidBackoffFactor {
                actual: args.backoff_factor,
            });
        }

        Ok(Self {
            gateway,
            timeout,
            max_retries: args.max_retries,
            backoff_factor: args.backoff_factor,
            debug: args.debug,
        })
    }

    /// Build a gateway client with these settings
    pub fn client(&self) -> Result<SmsGatewayClient, SmsGatewayError> {
        SmsGatewayClient::builder(self.gateway.clone())
            .timeout(self.timeout)
            .max_retries(self.max_retries)
            .backoff_factor(self.backoff_factor)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

fn timeout_from_secs(secs: f64) -> Result<Duration, ValidationError> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err(ValidationError::InvalidTimeout { actual: secs });
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ValidationError::InvalidTimeout { actual: secs })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "sms-send",
            "--server",
            "192.168.1.100:8080",
            "--phone",
            "15888888888",
            "--message",
            "Test",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_from_args_uses_defaults() {
        let config = Config::from_args(&args(&[])).unwrap();
        assert_eq!(
            config,
            Config::new(GatewayUrl::parse("http://192.168.1.100:8080").unwrap())
        );
    }

    #[test]
    fn test_from_args_applies_overrides() {
        let config = Config::from_args(&args(&[
            "--timeout",
            "0.5",
            "--max-retries",
            "3",
            "--backoff-factor",
            "2",
            "--debug",
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_factor, 2.0);
        assert!(config.debug);
    }

    #[test]
    fn test_from_args_rejects_bad_timeout() {
        for timeout in ["0", "-1", "inf", "NaN"] {
            let flag = format!("--timeout={timeout}");
            let err = Config::from_args(&args(&[flag.as_str()])).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidTimeout { .. }),
                "{timeout}: {err:?}"
            );
        }
    }

    #[test]
    fn test_from_args_rejects_negative_backoff() {
        let err = Config::from_args(&args(&["--backoff-factor=-0.5"])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBackoffFactor { .. }));
    }

    #[test]
    fn test_client_uses_normalized_endpoint() {
        let config = Config::from_args(&args(&["--max-retries", "4"])).unwrap();
        let client = config.client().unwrap();
        assert_eq!(client.send_endpoint(), "http://192.168.1.100:8080/sms/send");
        assert_eq!(client.retry_policy().max_retries(), 4);
    }
}
