//! Errors raised by the engine.
//!
//! Expected outcomes never show up here: a leaf that cannot do its job returns
//! [`Status::Failure`](crate::Status::Failure). These variants cover broken
//! tree configuration and programmer mistakes inside leaf callbacks.

use thiserror::Error;

/// Error type a fallible leaf callback may return.
pub type LeafError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BtError {
    #[error("composite `{node}` has no children")]
    EmptyComposite { node: String },

    #[error("condition `{node}` returned running; conditions may only succeed or fail")]
    ConditionRunning { node: String },

    #[error("leaf `{node}` raised an error: {source}")]
    Leaf { node: String, source: LeafError },
}

impl BtError {
    pub fn leaf(node: impl Into<String>, source: impl Into<LeafError>) -> Self {
        BtError::Leaf {
            node: node.into(),
            source: source.into(),
        }
    }

    /// Name of the node that raised the error.
    pub fn node(&self) -> &str {
        match self {
            BtError::EmptyComposite { node }
            | BtError::ConditionRunning { node }
            | BtError::Leaf { node, .. } => node,
        }
    }
}

pub type Result<T> = std::result::Result<T, BtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_error_keeps_source() {
        let err = BtError::leaf("Set Target", "target position error");
        assert_eq!(err.node(), "Set Target");
        assert_eq!(
            err.to_string(),
            "leaf `Set Target` raised an error: target position error"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
