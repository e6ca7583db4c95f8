//! Authorization: per-board capability thresholds, the global admin
//! override and content ownership.

use crate::board::{Board, Capability};
use crate::{GnubridgeError, Result};

use super::external::ExternalClaims;
use super::token::AccessClaims;

/// Level assumed for callers with no verified identity.
pub const GUEST_LEVEL: i64 = 1;
/// Level that grants board management rights.
pub const ADMIN_LEVEL: i64 = 10;

/// True when `level` meets the board's threshold for `capability`.
pub fn has_capability(board: &Board, capability: Capability, level: i64) -> bool {
    level >= board.level_for(capability)
}

/// Fail with `Forbidden` unless `level` meets the threshold.
pub fn require_capability(board: &Board, capability: Capability, level: i64) -> Result<()> {
    if has_capability(board, capability, level) {
        Ok(())
    } else {
        Err(GnubridgeError::Forbidden(format!(
            "{} level {} required on board '{}'",
            capability,
            board.level_for(capability),
            board.board_id
        )))
    }
}

/// True for the global board-management level.
pub fn is_admin_level(level: i64) -> bool {
    level >= ADMIN_LEVEL
}

/// Fail with `Unauthorized` unless `actor_id` owns the content or the caller
/// passed an explicit admin override.
pub fn check_ownership(owner_id: &str, actor_id: &str, admin_override: bool) -> Result<()> {
    if admin_override || (!actor_id.is_empty() && owner_id == actor_id) {
        Ok(())
    } else {
        Err(GnubridgeError::Unauthorized(
            "only the author can modify this content".to_string(),
        ))
    }
}

/// Caller identity as resolved from both trust domains.
///
/// The two claim sets are kept side by side, never merged.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub internal: Option<AccessClaims>,
    pub external: Option<ExternalClaims>,
}

impl Identity {
    /// Identity with no verified tokens.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when neither domain produced a verified identity.
    pub fn is_anonymous(&self) -> bool {
        self.internal.is_none() && self.external.is_none()
    }

    /// Level used for read-side capability checks: the internal token if
    /// present, else the legacy cookie, else guest.
    pub fn effective_level(&self) -> i64 {
        if let Some(claims) = &self.internal {
            claims.level
        } else if let Some(claims) = &self.external {
            claims.level
        } else {
            GUEST_LEVEL
        }
    }

    /// Member id from the internal token, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.internal.as_ref().map(|c| c.sub.as_str())
    }

    /// Board management rights, derived only from a verified internal token.
    pub fn is_admin(&self) -> bool {
        self.internal
            .as_ref()
            .map(|c| is_admin_level(c.level))
            .unwrap_or(false)
    }
}
