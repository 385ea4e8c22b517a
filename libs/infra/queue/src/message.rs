// [libs/infra/queue/src/message.rs]
//! The wire payload pushed onto the `conversion` queue (§4.8 step 4).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchMessage {
    pub job_id: Uuid,
}

impl DispatchMessage {
    pub fn new(job_id: Uuid) -> Self {
        Self { job_id }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("DispatchMessage always serializes")
    }

    pub fn decode(raw: &str) -> Result<Self, crate::errors::QueueError> {
        serde_json::from_str(raw)
            .map_err(|e| crate::errors::QueueError::MalformedMessage(e.to_string()))
    }
}

/// A message leased to a worker: carries the raw payload needed to remove
/// it from the processing list on ack (§8 "retry must not double-process").
#[derive(Debug, Clone)]
pub struct LeasedMessage {
    pub message: DispatchMessage,
    pub(crate) raw: String,
    pub(crate) processing_key: String,
}
