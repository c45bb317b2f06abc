//! Workspaces, memberships and the role lattice that gates them.
//!
//! Roles are totally ordered `member < admin < owner`; a capability granted to
//! a role is granted to every role above it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, UserId, Username, WorkspaceId};

/// Maximum length of a workspace name.
pub const WORKSPACE_NAME_MAX: usize = 255;

/// Role a user holds inside one workspace.
///
/// The derived ordering follows declaration order, so `Member < Admin < Owner`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    Member,
    Admin,
    Owner,
}

impl WorkspaceRole {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Whether this role carries `capability`.
    ///
    /// # Examples
    /// ```
    /// use nexus::domain::{Capability, WorkspaceRole};
    ///
    /// assert!(WorkspaceRole::Admin.grants(Capability::Manage));
    /// assert!(!WorkspaceRole::Member.grants(Capability::Manage));
    /// ```
    pub fn grants(self, capability: Capability) -> bool {
        self >= capability.minimum_role()
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workspace role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for WorkspaceRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Workspace-scoped action classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read workspace data: details, members, projects, tasks.
    View,
    /// Administer the workspace: invite members, delete it.
    Manage,
}

impl Capability {
    /// Lowest role that carries this capability.
    pub fn minimum_role(self) -> WorkspaceRole {
        match self {
            Self::View => WorkspaceRole::Member,
            Self::Manage => WorkspaceRole::Admin,
        }
    }
}

/// Tenant boundary owning projects and memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub description: String,
    pub owner_id: UserId,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

/// A workspace together with the caller's role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAccess {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub role: WorkspaceRole,
}

/// Membership row joined with the member's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: UserId,
    #[schema(value_type = String)]
    pub username: Username,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub role: WorkspaceRole,
    #[schema(value_type = String, format = DateTime)]
    pub joined_at: DateTime<Utc>,
}

/// Validation errors for new workspace input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceValidationError {
    #[error("workspace name must not be empty")]
    EmptyName,
    #[error("workspace name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Validated input for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkspace {
    name: String,
    description: String,
}

impl NewWorkspace {
    /// Validate the name and normalise the optional description.
    pub fn try_from_parts(
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, WorkspaceValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceValidationError::EmptyName);
        }
        if name.chars().count() > WORKSPACE_NAME_MAX {
            return Err(WorkspaceValidationError::NameTooLong {
                max: WORKSPACE_NAME_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            description: description.map(str::trim).unwrap_or_default().to_owned(),
        })
    }

    /// Default workspace seeded for a newly registered user.
    pub fn default_for(username: &Username) -> Self {
        Self {
            name: format!("{username} Workspace"),
            description: "Default workspace".to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WorkspaceRole::Member, Capability::View, true)]
    #[case(WorkspaceRole::Member, Capability::Manage, false)]
    #[case(WorkspaceRole::Admin, Capability::View, true)]
    #[case(WorkspaceRole::Admin, Capability::Manage, true)]
    #[case(WorkspaceRole::Owner, Capability::View, true)]
    #[case(WorkspaceRole::Owner, Capability::Manage, true)]
    fn role_grants_follow_lattice(
        #[case] role: WorkspaceRole,
        #[case] capability: Capability,
        #[case] expected: bool,
    ) {
        assert_eq!(role.grants(capability), expected);
    }

    #[rstest]
    fn grants_are_monotone_in_role() {
        let roles = [WorkspaceRole::Member, WorkspaceRole::Admin, WorkspaceRole::Owner];
        for capability in [Capability::View, Capability::Manage] {
            for (lower, higher) in roles.iter().zip(roles.iter().skip(1)) {
                if lower.grants(capability) {
                    assert!(higher.grants(capability), "{higher} must cover {lower}");
                }
            }
        }
    }

    #[rstest]
    #[case("member", WorkspaceRole::Member)]
    #[case("admin", WorkspaceRole::Admin)]
    #[case("owner", WorkspaceRole::Owner)]
    fn roles_parse_from_storage(#[case] raw: &str, #[case] expected: WorkspaceRole) {
        assert_eq!(raw.parse::<WorkspaceRole>().expect("known role"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert_eq!(
            "guest".parse::<WorkspaceRole>(),
            Err(UnknownRole("guest".to_owned()))
        );
    }

    #[rstest]
    fn new_workspace_rejects_blank_name() {
        assert_eq!(
            NewWorkspace::try_from_parts("   ", None),
            Err(WorkspaceValidationError::EmptyName)
        );
    }

    #[rstest]
    fn default_workspace_uses_username() {
        let username = Username::new("ada").expect("username");
        let workspace = NewWorkspace::default_for(&username);
        assert_eq!(workspace.name(), "ada Workspace");
        assert_eq!(workspace.description(), "Default workspace");
    }

    #[rstest]
    fn access_flattens_workspace_fields() {
        let access = WorkspaceAccess {
            workspace: Workspace {
                id: WorkspaceId::new(3),
                name: "Ops".to_owned(),
                description: String::new(),
                owner_id: UserId::new(1),
                created_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            role: WorkspaceRole::Admin,
        };
        let value = serde_json::to_value(&access).expect("serialise access");
        assert_eq!(value["id"], 3);
        assert_eq!(value["ownerId"], 1);
        assert_eq!(value["role"], "admin");
    }
}
