use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("advertisement timeout")]
    Timeout,
    #[error("capture replay: {0}")]
    Replay(String),
}
