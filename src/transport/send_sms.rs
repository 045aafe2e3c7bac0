use serde::Serialize;
use serde_json::Value;

use crate::domain::{SendSms, SendSmsResponse, TimestampMillis};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SendSmsEnvelope<'a> {
    data: SendSmsData<'a>,
    timestamp: i64,
    sign: &'a str,
}

#[derive(Debug, Serialize)]
struct SendSmsData<'a> {
    phone_numbers: String,
    msg_content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sim_slot: Option<u8>,
}

/// Requests are not signed; the gateway accepts an empty `sign`.
const UNSIGNED: &str = "";

pub fn encode_send_sms_envelope(
    request: &SendSms,
    timestamp: TimestampMillis,
) -> Result<Value, TransportError> {
    let envelope = SendSmsEnvelope {
        data: SendSmsData {
            phone_numbers: request.recipients().joined(),
            msg_content: request.msg().as_str(),
            sim_slot: request.sim_slot().map(|slot| slot.value()),
        },
        timestamp: timestamp.value(),
        sign: UNSIGNED,
    };
    Ok(serde_json::to_value(envelope)?)
}

pub fn decode_send_sms_json_response(json: &str) -> Result<SendSmsResponse, TransportError> {
    let body: Value = serde_json::from_str(json)?;
    Ok(SendSmsResponse { body })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{SendSms, SimSlot, TimestampMillis};

    use super::*;

    #[test]
    fn encode_without_sim_slot_omits_the_key() {
        let request = SendSms::from_parts("15888888888", "Test message", None).unwrap();
        let body =
            encode_send_sms_envelope(&request, TimestampMillis::new(1_700_000_000_000)).unwrap();

        assert_eq!(
            body,
            json!({
                "data": {
                    "phone_numbers": "15888888888",
                    "msg_content": "Test message"
                },
                "timestamp": 1_700_000_000_000_i64,
                "sign": ""
            })
        );
        assert!(body["data"].get("sim_slot").is_none());
    }

    #[test]
    fn encode_with_sim_slot_includes_exact_value() {
        for slot in [1, 2] {
            let request = SendSms::from_parts("15888888888", "hi", None)
                .unwrap()
                .with_sim_slot(SimSlot::new(slot).unwrap());
            let body = encode_send_sms_envelope(&request, TimestampMillis::new(1)).unwrap();
            assert_eq!(body["data"]["sim_slot"], json!(slot));
        }
    }

    #[test]
    fn encode_keeps_multiple_recipients_joined() {
        let request = SendSms::from_parts("15888888888;19999999999", "hi", None).unwrap();
        let body = encode_send_sms_envelope(&request, TimestampMillis::new(1)).unwrap();
        assert_eq!(body["data"]["phone_numbers"], "15888888888;19999999999");
    }

    #[test]
    fn encoded_body_serializes_compactly_in_field_order() {
        let request = SendSms::from_parts("15888888888", "hi", Some(1)).unwrap();
        let body = encode_send_sms_envelope(&request, TimestampMillis::new(5)).unwrap();
        let text = serde_json::to_string(&body).unwrap();
        assert!(text.contains(r#""phone_numbers":"15888888888""#));
        assert!(text.contains(r#""sim_slot":1"#));
        assert!(text.contains(r#""sign":"""#));
    }

    #[test]
    fn decode_passes_body_through_unchanged() {
        let resp = decode_send_sms_json_response(
            r#"{"code": 0, "msg": "ok", "data": {"queued": [1, 2]}}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_json(),
            json!({"code": 0, "msg": "ok", "data": {"queued": [1, 2]}})
        );
    }

    #[test]
    fn decode_rejects_non_json() {
        let err = decode_send_sms_json_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON response"));
    }
}
