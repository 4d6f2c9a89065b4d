//! Team role with different permission levels.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Role`] from an unknown string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected admin, user, or team-member)")]
pub struct RoleParseError(pub String);

/// Role of a team principal.
///
/// The set is closed: authorization decisions match on it exhaustively, so a
/// new role cannot be introduced without the compiler pointing at every
/// guard that must consider it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Full access, including team management, invitations, and deletions.
    Admin,
    /// Regular authenticated access to the store collections.
    User,
    /// Production staff: same data access as `User`, distinct for auditing.
    TeamMember,
}

impl Role {
    /// The wire/database representation of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::TeamMember => "team-member",
        }
    }

    /// Whether this role may be assigned through an invite.
    ///
    /// Invites provision staff accounts; the `user` role is created through
    /// other channels.
    #[must_use]
    pub const fn is_invitable(self) -> bool {
        matches!(self, Self::Admin | Self::TeamMember)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "team-member" => Ok(Self::TeamMember),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_roundtrip() {
        for role in [Role::Admin, Role::User, Role::TeamMember] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(format!("{}", Role::TeamMember), "team-member");
        assert_eq!(format!("{}", Role::Admin), "admin");
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("Team-Member".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Role::TeamMember).unwrap();
        assert_eq!(json, "\"team-member\"");

        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_invitable_roles() {
        assert!(Role::Admin.is_invitable());
        assert!(Role::TeamMember.is_invitable());
        assert!(!Role::User.is_invitable());
    }
}
