//! Shared-secret access gate
//!
//! The review surface sits behind a single shared password. Unlocking
//! yields a time-boxed session the application shell holds and checks at
//! its boundary; the engine itself never consults the gate. Expiry is an
//! explicit timestamp on the session, never ambient global state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GateError;

/// Default session lifetime of one hour
pub const DEFAULT_SESSION_MINUTES: i64 = 60;

/// The shared-secret gate in front of the review surface
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
    ttl: Duration,
}

impl AccessGate {
    /// Gate with the default one-hour session lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(DEFAULT_SESSION_MINUTES),
        }
    }

    /// Override the session lifetime
    pub fn with_session_minutes(mut self, minutes: i64) -> Self {
        self.ttl = Duration::minutes(minutes);
        self
    }

    /// Compare an attempt against the shared secret
    pub fn unlock(&self, attempt: &str) -> Result<GateSession, GateError> {
        if attempt != self.secret {
            return Err(GateError::IncorrectPassword);
        }
        Ok(GateSession::starting_now(self.ttl))
    }
}

/// A granted, time-boxed access session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSession {
    pub id: String,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl GateSession {
    fn starting_now(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            granted_at: now,
            expires_at: now + ttl,
        }
    }

    /// Rebuild a session from a persisted expiry timestamp
    ///
    /// Fails when the timestamp is already past, so a stale persisted
    /// session can never be restored into a valid one.
    pub fn restore(expires_at: DateTime<Utc>) -> Result<Self, GateError> {
        let now = Utc::now();
        if expires_at <= now {
            return Err(GateError::Expired);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            granted_at: now,
            expires_at,
        })
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Time left before expiry; zero once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}
