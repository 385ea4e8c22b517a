// [libs/infra/queue/src/errors.rs]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("redis connection failed: {0}")]
    Connection(String),

    #[error("redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("malformed dispatch message: {0}")]
    MalformedMessage(String),
}
