//! Command implementation for the CLI

use anyhow::Context;
use tracing::{debug, instrument};

use crate::{cli::Args, config::Config, domain::SendSms, domain::SendSmsResponse};

/// Validate the arguments, then send the SMS through the configured gateway
#[instrument(skip_all, fields(server = %args.server))]
pub async fn execute_command(args: &Args) -> anyhow::Result<SendSmsResponse> {
    let config = Config::from_args(args).context("Invalid configuration")?;
    let request = SendSms::from_parts(&args.phone, args.message.as_str(), args.sim_slot)
        .context("Invalid SMS request")?;
    let client = config.client().context("Failed to create gateway client")?;

    debug!(
        endpoint = client.send_endpoint(),
        recipients = request.recipients().as_slice().len(),
        "sending SMS"
    );

    client
        .send_sms(request)
        .await
        .context("Gateway request failed")
}

/// Lines printed to stdout after a successful send
pub fn success_report(response: &SendSmsResponse) -> String {
    format!("SMS sent successfully!\nResponse: {}", response.body)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_report_includes_raw_response() {
        let response = SendSmsResponse {
            body: json!({"status": "success"}),
        };
        assert_eq!(
            success_report(&response),
            "SMS sent successfully!\nResponse: {\"status\":\"success\"}"
        );
    }

    #[tokio::test]
    async fn test_invalid_server_fails_before_sending() {
        let args = Args::try_parse_from([
            "sms-send",
            "--server",
            "http://",
            "--phone",
            "15888888888",
            "--message",
            "Test",
        ])
        .unwrap();
        let err = execute_command(&args).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("Invalid configuration"), "{message}");
        assert!(message.contains("invalid server address"), "{message}");
    }

    #[tokio::test]
    async fn test_empty_recipient_fails_before_sending() {
        let args = Args::try_parse_from([
            "sms-send",
            "--server",
            "127.0.0.1:9",
            "--phone",
            "15888888888;",
            "--message",
            "Test",
        ])
        .unwrap();
        let err = execute_command(&args).await.unwrap_err();
        assert!(format!("{err:#}").contains("recipient #2 is empty"));
    }
}
