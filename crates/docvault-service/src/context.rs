//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// The user on whose behalf a mutation runs.
///
/// Recorded on every file row the user places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier.
    pub user_id: String,
    /// Display name shown next to files the user placed.
    pub user_name: String,
}

impl Actor {
    /// Creates an actor.
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }
}

/// Context for the current request.
///
/// Passed into every service method that changes state so the operation
/// knows *who* is acting. Authentication happens upstream; an absent actor
/// means the caller could not be identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user, if any.
    pub actor: Option<Actor>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for an identified user.
    pub fn for_user(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self::new(Some(Actor::new(user_id, user_name)))
    }

    /// Creates a context with no identified user.
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Creates a context from an optional actor.
    pub fn new(actor: Option<Actor>) -> Self {
        Self {
            actor,
            request_time: Utc::now(),
        }
    }

    /// Returns the acting user, or `Unauthenticated` when none is present.
    ///
    /// An actor with a blank ID or name counts as absent.
    pub fn require_actor(&self) -> AppResult<&Actor> {
        match &self.actor {
            Some(actor) if !actor.user_id.trim().is_empty() && !actor.user_name.trim().is_empty() => {
                Ok(actor)
            }
            _ => Err(AppError::unauthenticated(
                "An authenticated user is required for this operation",
            )),
        }
    }
}
