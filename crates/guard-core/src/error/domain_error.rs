//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Member not found in guild")]
    MemberNotFound,

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Case not found: {0}")]
    CaseNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Limit count out of range: {0} (expected 1..=100)")]
    LimitOutOfRange(i32),

    #[error("Window out of range: {0}s (expected 1..=3600)")]
    WindowOutOfRange(i64),

    #[error("Timeout punishment requires a duration")]
    TimeoutDurationRequired,

    // =========================================================================
    // Enforcement Precondition Failures
    // =========================================================================
    #[error("Cannot punish the guild owner")]
    CannotPunishOwner,

    #[error("Role hierarchy prevents action against this member")]
    HierarchyViolation,

    #[error("Enforcing identity missing permission: {0}")]
    MissingBotPermission(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Platform gateway error: {0}")]
    GatewayError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and host-facing surfaces
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound => "UNKNOWN_MEMBER",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::CaseNotFound(_) => "UNKNOWN_CASE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::LimitOutOfRange(_) => "LIMIT_OUT_OF_RANGE",
            Self::WindowOutOfRange(_) => "WINDOW_OUT_OF_RANGE",
            Self::TimeoutDurationRequired => "TIMEOUT_DURATION_REQUIRED",

            // Preconditions
            Self::CannotPunishOwner => "CANNOT_PUNISH_OWNER",
            Self::HierarchyViolation => "HIERARCHY_VIOLATION",
            Self::MissingBotPermission(_) => "MISSING_BOT_PERMISSION",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::GatewayError(_) => "GATEWAY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::MemberNotFound
                | Self::RoleNotFound(_)
                | Self::CaseNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::LimitOutOfRange(_)
                | Self::WindowOutOfRange(_)
                | Self::TimeoutDurationRequired
        )
    }

    /// Check if this is an expected enforcement-precondition failure
    /// (logged, never surfaced as a system error)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::CannotPunishOwner | Self::HierarchyViolation | Self::MissingBotPermission(_)
        )
    }

    /// Check if this is a transient infrastructure failure
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::GatewayError(_))
    }
}
