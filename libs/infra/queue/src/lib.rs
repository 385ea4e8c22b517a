// [libs/infra/queue/src/lib.rs]
//! Dispatch transport (C8, §4.8/§5): a reliable Redis queue giving the
//! worker pool late-ack semantics.

pub mod client;
pub mod errors;
pub mod message;

pub use client::DispatchQueue;
pub use errors::QueueError;
pub use message::{DispatchMessage, LeasedMessage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_message_round_trips_through_json() {
        let job_id = uuid::Uuid::new_v4();
        let message = DispatchMessage::new(job_id);
        let decoded = DispatchMessage::decode(&message.encode()).unwrap();
        assert_eq!(decoded.job_id, job_id);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let result = DispatchMessage::decode("not json");
        assert!(matches!(result, Err(QueueError::MalformedMessage(_))));
    }
}
