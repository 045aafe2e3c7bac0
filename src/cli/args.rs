//! Command-line argument parsing

use clap::Parser;

use crate::client::{DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES};

/// Send an SMS through an HTTP SMS gateway
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "sms-send")]
#[command(after_help = "Examples:
  sms-send --server 192.168.1.100:8080 --phone 15888888888 --message \"Hello\"
  sms-send --server 192.168.1.100:8080 --phone \"15888888888;19999999999\" --message \"Hello\" --sim-slot 1")]
pub struct Args {
    /// Gateway address as host:port (e.g. 192.168.1.100:8080) or a full http(s) URL
    #[arg(long, env = "SMS_SEND_SERVER")]
    pub server: String,

    /// Recipient phone number(s), semicolon separated (e.g. "15888888888;19999999999")
    #[arg(long)]
    pub phone: String,

    /// Message content to send
    #[arg(long)]
    pub message: String,

    /// SIM slot to send from
    #[arg(long = "sim-slot", value_parser = clap::value_parser!(u8).range(1..=2))]
    pub sim_slot: Option<u8>,

    /// Per-attempt request timeout in seconds
    #[arg(long, default_value_t = 5.0)]
    pub timeout: f64,

    /// Retries on 5xx responses and connection failures
    #[arg(long = "max-retries", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Exponential backoff factor in seconds
    #[arg(long = "backoff-factor", default_value_t = DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: f64,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
