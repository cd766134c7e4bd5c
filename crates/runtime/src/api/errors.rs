//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and the combat
//! engine so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use defense_core::EngineError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown actor template '{0}'")]
    UnknownTemplate(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("snapshot encoding failed")]
    Snapshot(#[source] bincode::Error),

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
