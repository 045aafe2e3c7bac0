use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageText, Recipients, SimSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSms {
    recipients: Recipients,
    msg: MessageText,
    sim_slot: Option<SimSlot>,
}

impl SendSms {
    pub fn new(recipients: Recipients, msg: MessageText) -> Self {
        Self {
            recipients,
            msg,
            sim_slot: None,
        }
    }

    /// Build a request from raw CLI-style inputs: a `;`-separated recipient list, the text and
    /// an optional slot number.
    pub fn from_parts(
        phone_numbers: &str,
        msg: impl Into<String>,
        sim_slot: Option<u8>,
    ) -> Result<Self, ValidationError> {
        let request = Self::new(Recipients::parse(phone_numbers)?, MessageText::new(msg)?);
        match sim_slot {
            Some(slot) => Ok(request.with_sim_slot(SimSlot::new(slot)?)),
            None => Ok(request),
        }
    }

    pub fn with_sim_slot(mut self, sim_slot: SimSlot) -> Self {
        self.sim_slot = Some(sim_slot);
        self
    }

    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn sim_slot(&self) -> Option<SimSlot> {
        self.sim_slot
    }
}
