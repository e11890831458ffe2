//! # Messaging Token Provider
//!
//! The platform messaging token is owned by an external provider (the
//! platform SDK in a real deployment). The client only needs three things
//! from it: whether the platform is usable at all, the current token, and a
//! way to invalidate the token on full unregistration.
//!
//! Availability is data, not control flow: instead of an exception carrying
//! a resolution code, [`PlatformAvailability`] lets the embedder branch on
//! the reason explicitly.

use async_trait::async_trait;

use crate::error::PushResult;

// =============================================================================
// Platform Availability
// =============================================================================

/// Whether the messaging platform can be used on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAvailability {
    /// The platform is usable; operations may proceed.
    Available,

    /// The platform is currently unusable but the user can fix it (for
    /// example by updating a platform service). Carries the platform's
    /// resolution code for the embedder's UI.
    Resolvable(i32),

    /// The device does not support the messaging platform.
    Unsupported,
}

impl PlatformAvailability {
    /// True when operations may proceed.
    pub fn is_available(&self) -> bool {
        matches!(self, PlatformAvailability::Available)
    }
}

impl std::fmt::Display for PlatformAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformAvailability::Available => write!(f, "available"),
            PlatformAvailability::Resolvable(code) => {
                write!(f, "resolvable (code {code})")
            }
            PlatformAvailability::Unsupported => write!(f, "unsupported"),
        }
    }
}

// =============================================================================
// Token Provider Contract
// =============================================================================

/// External provider of the platform messaging token.
///
/// `token` is a single-completion asynchronous operation: the coordinator
/// awaits exactly one completion before proceeding, and a provider failure
/// surfaces as the coordinator's failure. Dropping the operation future
/// cancels interest in a late completion; no registration state has been
/// written at that point.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Reports whether the platform is usable right now.
    fn availability(&self) -> PlatformAvailability;

    /// Obtains the current messaging token.
    async fn token(&self) -> PushResult<String>;

    /// Invalidates the current token so the device stops receiving pushes.
    ///
    /// Called during full unregistration, after the backend has confirmed
    /// the removal.
    async fn invalidate(&self) -> PushResult<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_predicate() {
        assert!(PlatformAvailability::Available.is_available());
        assert!(!PlatformAvailability::Resolvable(9000).is_available());
        assert!(!PlatformAvailability::Unsupported.is_available());
    }

    #[test]
    fn test_display() {
        assert_eq!(PlatformAvailability::Available.to_string(), "available");
        assert_eq!(
            PlatformAvailability::Resolvable(9000).to_string(),
            "resolvable (code 9000)"
        );
        assert_eq!(PlatformAvailability::Unsupported.to_string(), "unsupported");
    }
}
