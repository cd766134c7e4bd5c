//! Error types surfaced by the combat engine entry points.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{ActorId, Tick};

/// Errors surfaced while servicing a request through the combat engine.
///
/// Everything that can happen during normal play is absorbed by the engine;
/// the variants here signal caller misuse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("actor {actor} not found")]
    ActorNotFound {
        actor: ActorId,
        context: ErrorContext,
    },

    /// An actor resolved at the start of a request was gone when the engine
    /// came back to mutate it.
    #[error("actor {actor} left the registry during {}", .context.message.unwrap_or("a request"))]
    RegistryInconsistent {
        actor: ActorId,
        context: ErrorContext,
    },
}

impl EngineError {
    pub fn actor_not_found(actor: ActorId, tick: Tick) -> Self {
        Self::ActorNotFound {
            actor,
            context: ErrorContext::new(tick).with_actor(actor),
        }
    }

    pub fn registry_inconsistent(actor: ActorId, tick: Tick, during: &'static str) -> Self {
        Self::RegistryInconsistent {
            actor,
            context: ErrorContext::new(tick)
                .with_actor(actor)
                .with_message(during),
        }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActorNotFound { .. } => ErrorSeverity::Validation,
            Self::RegistryInconsistent { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::ActorNotFound { context, .. } | Self::RegistryInconsistent { context, .. } => {
                Some(context)
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound { .. } => "ACTOR_NOT_FOUND",
            Self::RegistryInconsistent { .. } => "REGISTRY_INCONSISTENT",
        }
    }
}
