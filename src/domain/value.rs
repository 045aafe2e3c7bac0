use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number as sent to the gateway.
///
/// Invariant: non-empty after trimming. No normalization is applied; the gateway receives the
/// number exactly as typed (minus surrounding whitespace).
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON field name used by the gateway (`phone_numbers`).
    pub const FIELD: &'static str = "phone_numbers";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Ordered, non-empty list of recipients.
///
/// On the wire the list is a single string joined with [`Recipients::SEPARATOR`].
pub struct Recipients(Vec<RawPhoneNumber>);

impl Recipients {
    /// Separator between numbers in `phone_numbers`.
    pub const SEPARATOR: char = ';';

    /// Wrap an already validated list.
    pub fn new(recipients: Vec<RawPhoneNumber>) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self(recipients))
    }

    /// Parse a `;`-separated list such as `"15888888888;19999999999"`.
    ///
    /// Every segment must be non-empty after trimming; `"1;;2"` and `"1;"` are rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }

        let recipients = input
            .split(Self::SEPARATOR)
            .enumerate()
            .map(|(idx, segment)| {
                RawPhoneNumber::new(segment)
                    .map_err(|_| ValidationError::EmptyRecipient { position: idx + 1 })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(recipients)
    }

    /// Borrow the recipients in order.
    pub fn as_slice(&self) -> &[RawPhoneNumber] {
        &self.0
    }

    /// Wire representation (`a;b;c`).
    pub fn joined(&self) -> String {
        let separator = Self::SEPARATOR.to_string();
        self.0
            .iter()
            .map(RawPhoneNumber::raw)
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`msg_content`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by the gateway (`msg_content`).
    pub const FIELD: &'static str = "msg_content";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SIM card the gateway device should send from (`sim_slot`).
///
/// Invariant: `1..=2`.
pub struct SimSlot(u8);

impl SimSlot {
    /// JSON field name used by the gateway (`sim_slot`).
    pub const FIELD: &'static str = "sim_slot";

    pub const MIN: u8 = 1;
    pub const MAX: u8 = 2;

    /// Create a validated [`SimSlot`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::SimSlotOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Slot number (`1` or `2`).
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Milliseconds since the Unix epoch (`timestamp`).
pub struct TimestampMillis(i64);

impl TimestampMillis {
    /// JSON field name used by the gateway (`timestamp`).
    pub const FIELD: &'static str = "timestamp";

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current wall-clock time. Clocks set before the epoch yield negative values.
    pub fn now() -> Self {
        let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            Err(before) => -i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX),
        };
        Self(millis)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Normalized gateway base URL.
///
/// Accepts either `host:port` or a full `http(s)://` URL. A missing scheme becomes `http://`
/// and trailing slashes are removed, so `"10.0.0.2:8080/"` becomes `"http://10.0.0.2:8080"`.
pub struct GatewayUrl(String);

impl GatewayUrl {
    pub const FIELD: &'static str = "server";

    const SEND_PATH: &'static str = "sms/send";

    /// Normalize and validate a server address.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let lower = trimmed.to_ascii_lowercase();
        let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };
        let base = with_scheme.trim_end_matches('/').to_owned();

        let parsed =
            url::Url::parse(&base).map_err(|err| ValidationError::InvalidServerAddress {
                input: input.clone(),
                reason: err.to_string(),
            })?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ValidationError::InvalidServerAddress {
                input,
                reason: "missing host".to_owned(),
            });
        }

        Ok(Self(base))
    }

    /// Base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL of the send endpoint (`{base}/sms/send`).
    pub fn send_endpoint(&self) -> String {
        format!("{}/{}", self.0, Self::SEND_PATH)
    }
}
