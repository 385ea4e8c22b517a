// [libs/infra/queue/src/client.rs]
//! Reliable dispatch transport: `LPUSH` onto the `conversion` queue,
//! `BRPOPLPUSH` into a per-worker processing list so a crash before ack
//! re-queues the message (§5, §8 late-ack semantics).

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{info, instrument, warn};

use crate::errors::QueueError;
use crate::message::{DispatchMessage, LeasedMessage};

const CONVERSION_QUEUE_KEY: &str = "geoconvert:queue:conversion";

fn processing_key(worker_id: &str) -> String {
    format!("geoconvert:processing:{worker_id}")
}

#[derive(Clone)]
pub struct DispatchQueue {
    connection: ConnectionManager,
}

impl DispatchQueue {
    #[instrument(skip(redis_url))]
    pub async fn connect(redis_url: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url).map_err(|e| QueueError::Connection(e.to_string()))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;
        Ok(Self { connection })
    }

    /// Enqueues a dispatch message (§4.8 step 4).
    pub async fn enqueue(&self, message: &DispatchMessage) -> Result<(), QueueError> {
        let mut connection = self.connection.clone();
        let _: i64 = connection.lpush(CONVERSION_QUEUE_KEY, message.encode()).await?;
        info!(job_id = %message.job_id, "job enqueued for dispatch");
        Ok(())
    }

    /// Blocks for up to `timeout_seconds` pulling at most one message into
    /// this worker's processing list (no prefetch beyond 1, §4.8).
    pub async fn pull(
        &self,
        worker_id: &str,
        timeout_seconds: u64,
    ) -> Result<Option<LeasedMessage>, QueueError> {
        let mut connection = self.connection.clone();
        let destination = processing_key(worker_id);

        let raw: Option<String> = connection
            .brpoplpush(CONVERSION_QUEUE_KEY, &destination, timeout_seconds as usize)
            .await?;

        match raw {
            None => Ok(None),
            Some(raw) => {
                let message = DispatchMessage::decode(&raw)?;
                Ok(Some(LeasedMessage {
                    message,
                    raw,
                    processing_key: destination,
                }))
            }
        }
    }

    /// Acknowledges a message after a terminal transition (success/failed),
    /// removing it from the worker's processing list.
    pub async fn ack(&self, leased: &LeasedMessage) -> Result<(), QueueError> {
        let mut connection = self.connection.clone();
        let _: i64 = connection
            .lrem(&leased.processing_key, 1, leased.raw.clone())
            .await?;
        Ok(())
    }

    /// Recovery sweep: moves any message still sitting in a dead worker's
    /// processing list back onto the main queue. Operators run this for a
    /// worker they know has crashed; it is not run automatically.
    pub async fn reclaim_stale_worker(&self, worker_id: &str) -> Result<u64, QueueError> {
        let mut connection = self.connection.clone();
        let source = processing_key(worker_id);
        let mut reclaimed = 0u64;

        loop {
            let moved: Option<String> = connection.rpoplpush(&source, CONVERSION_QUEUE_KEY).await?;
            match moved {
                Some(_) => reclaimed += 1,
                None => break,
            }
        }

        if reclaimed > 0 {
            warn!(worker_id, reclaimed, "reclaimed stale messages from dead worker");
        }
        Ok(reclaimed)
    }
}
