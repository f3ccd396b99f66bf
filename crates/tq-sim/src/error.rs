use thiserror::Error;
use tq_core::QueueError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("run configuration error: {0}")]
    Config(String),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

pub type SimResult<T> = Result<T, SimError>;
