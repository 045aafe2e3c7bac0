use serde_json::Value;

/// Body returned by the gateway for `sms/send`.
///
/// The gateway does not publish a schema, so the decoded JSON is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SendSmsResponse {
    pub body: Value,
}

impl SendSmsResponse {
    pub fn into_json(self) -> Value {
        self.body
    }
}
