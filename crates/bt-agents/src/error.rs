use bt_core::BtError;
use thiserror::Error;

/// Errors raised by agents and the world loop.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("target position error: ({x}, {y}) is not a finite point")]
    InvalidTarget { x: f32, y: f32 },

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("agent id {id} is already registered as `{existing}`")]
    DuplicateAgent { id: u64, existing: String },

    #[error("patrol route of `{0}` is empty")]
    EmptyPatrolRoute(String),

    #[error("behavior tree error: {0}")]
    Tree(#[from] BtError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
