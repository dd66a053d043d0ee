//! Audit action tags and their human-readable descriptions.
//!
//! Collaborators submit actions as plain string tags (`"LOGIN_SUCCESS"`,
//! `"CREATE_RESOURCE"`, …).  Known tags map onto a closed set of variants;
//! anything else is preserved verbatim in `AuditAction::Other` and described
//! as generic system activity.  Parsing a tag never fails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An audit-worthy action recorded in the ledger.
///
/// Serialized as its upper-snake-case tag so the persisted and wire forms
/// stay identical to what collaborators submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditAction {
    GenesisBlock,

    // Authentication middleware.
    LoginSuccess,
    LoginFailed,
    AuthFailed,
    TokenValidated,

    // Authorization middleware.
    UnauthorizedAccess,

    // Resource handlers.
    CreateResource,
    UpdateResource,
    DeleteResource,
    ViewResource,

    // Role and permission administration.
    RoleCreated,
    RoleUpdated,
    RoleDeleted,
    PermissionAssigned,
    UserRoleChanged,

    // IP reputation.
    IpWhitelistAdded,
    IpWhitelistRemoved,
    IpBlacklistAdded,
    IpBlacklistRemoved,
    IpAutoBlocked,
    BlacklistedIpAttempt,

    /// Any tag without a dedicated variant.  Holds the tag as submitted.
    Other(String),
}

impl AuditAction {
    /// Every variant with a dedicated tag, in declaration order.
    pub const KNOWN: [AuditAction; 21] = [
        AuditAction::GenesisBlock,
        AuditAction::LoginSuccess,
        AuditAction::LoginFailed,
        AuditAction::AuthFailed,
        AuditAction::TokenValidated,
        AuditAction::UnauthorizedAccess,
        AuditAction::CreateResource,
        AuditAction::UpdateResource,
        AuditAction::DeleteResource,
        AuditAction::ViewResource,
        AuditAction::RoleCreated,
        AuditAction::RoleUpdated,
        AuditAction::RoleDeleted,
        AuditAction::PermissionAssigned,
        AuditAction::UserRoleChanged,
        AuditAction::IpWhitelistAdded,
        AuditAction::IpWhitelistRemoved,
        AuditAction::IpBlacklistAdded,
        AuditAction::IpBlacklistRemoved,
        AuditAction::IpAutoBlocked,
        AuditAction::BlacklistedIpAttempt,
    ];

    /// Resolve a submitted tag.  Unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == tag)
            .cloned()
            .unwrap_or_else(|| AuditAction::Other(tag.to_string()))
    }

    /// Collapse an `Other` carrying a known tag onto its dedicated variant.
    ///
    /// Storage keeps only the tag, so a block must be sealed with the same
    /// variant (and description) that reloading the tag would produce.
    pub fn canonical(self) -> Self {
        match self {
            AuditAction::Other(tag) => Self::from_tag(&tag),
            known => known,
        }
    }

    /// The upper-snake-case tag for this action.
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::GenesisBlock => "GENESIS_BLOCK",
            AuditAction::LoginSuccess => "LOGIN_SUCCESS",
            AuditAction::LoginFailed => "LOGIN_FAILED",
            AuditAction::AuthFailed => "AUTH_FAILED",
            AuditAction::TokenValidated => "TOKEN_VALIDATED",
            AuditAction::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            AuditAction::CreateResource => "CREATE_RESOURCE",
            AuditAction::UpdateResource => "UPDATE_RESOURCE",
            AuditAction::DeleteResource => "DELETE_RESOURCE",
            AuditAction::ViewResource => "VIEW_RESOURCE",
            AuditAction::RoleCreated => "ROLE_CREATED",
            AuditAction::RoleUpdated => "ROLE_UPDATED",
            AuditAction::RoleDeleted => "ROLE_DELETED",
            AuditAction::PermissionAssigned => "PERMISSION_ASSIGNED",
            AuditAction::UserRoleChanged => "USER_ROLE_CHANGED",
            AuditAction::IpWhitelistAdded => "IP_WHITELIST_ADDED",
            AuditAction::IpWhitelistRemoved => "IP_WHITELIST_REMOVED",
            AuditAction::IpBlacklistAdded => "IP_BLACKLIST_ADDED",
            AuditAction::IpBlacklistRemoved => "IP_BLACKLIST_REMOVED",
            AuditAction::IpAutoBlocked => "IP_AUTO_BLOCKED",
            AuditAction::BlacklistedIpAttempt => "BLACKLISTED_IP_ATTEMPT",
            AuditAction::Other(tag) => tag,
        }
    }

    /// Human-readable description shown alongside the block.
    ///
    /// Exhaustive over the known variants; `Other` falls back to
    /// `"System activity"`.
    pub fn description(&self) -> &'static str {
        match self {
            AuditAction::GenesisBlock => "Genesis block - audit chain initialized",
            AuditAction::LoginSuccess => "User logged in successfully",
            AuditAction::LoginFailed => "Failed login attempt",
            AuditAction::AuthFailed => "Authentication failed",
            AuditAction::TokenValidated => "Access token validated",
            AuditAction::UnauthorizedAccess => "Unauthorized access attempt",
            AuditAction::CreateResource => "Resource created",
            AuditAction::UpdateResource => "Resource updated",
            AuditAction::DeleteResource => "Resource deleted",
            AuditAction::ViewResource => "Resource viewed",
            AuditAction::RoleCreated => "Role created",
            AuditAction::RoleUpdated => "Role updated",
            AuditAction::RoleDeleted => "Role deleted",
            AuditAction::PermissionAssigned => "Permissions assigned to role",
            AuditAction::UserRoleChanged => "User role changed",
            AuditAction::IpWhitelistAdded => "IP address added to whitelist",
            AuditAction::IpWhitelistRemoved => "IP address removed from whitelist",
            AuditAction::IpBlacklistAdded => "IP address added to blacklist",
            AuditAction::IpBlacklistRemoved => "IP address removed from blacklist",
            AuditAction::IpAutoBlocked => "IP address automatically blocked",
            AuditAction::BlacklistedIpAttempt => "Request from blacklisted IP address",
            AuditAction::Other(_) => "System activity",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl From<String> for AuditAction {
    fn from(tag: String) -> Self {
        match Self::from_tag(&tag) {
            AuditAction::Other(_) => AuditAction::Other(tag),
            known => known,
        }
    }
}

impl From<&str> for AuditAction {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<AuditAction> for String {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}
