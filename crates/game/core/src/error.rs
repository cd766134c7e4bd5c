//! Common error infrastructure for defense-core.
//!
//! The engine degrades gracefully for every anomaly reachable from normal
//! gameplay (unknown effect tags, dangling origins, double deaths, odd numeric
//! input). Only misuse by the caller, such as addressing an actor that does
//! not exist, surfaces as an error value.

use crate::state::{ActorId, Tick};

/// Severity level of an error, used to decide how loudly to report it.
///
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency that requires investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: actor not found
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Contextual information captured where an error was created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    /// Actor the request addressed (if applicable).
    pub actor: Option<ActorId>,

    /// Simulation tick at the time of the error.
    pub tick: Tick,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context at the given tick.
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            actor: None,
            tick,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all defense-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
