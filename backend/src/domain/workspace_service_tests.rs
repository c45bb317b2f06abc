//! Tests for the workspace service and the invite workflow.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockNotificationRepository, MockProjectRepository, MockUserRepository,
    MockWorkspaceRepository, NotificationRepositoryError, WorkspaceRepositoryError,
};
use crate::domain::test_fixtures::{access, fixture_clock, member, user};
use crate::domain::{ErrorCode, Notification, NotificationId};

type Service = WorkspaceService<
    MockWorkspaceRepository,
    MockUserRepository,
    MockProjectRepository,
    MockNotificationRepository,
>;

const OWNER: i64 = 1;
const INVITEE: i64 = 2;
const WORKSPACE: i64 = 10;

struct Mocks {
    workspaces: MockWorkspaceRepository,
    users: MockUserRepository,
    projects: MockProjectRepository,
    notifications: MockNotificationRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            workspaces: MockWorkspaceRepository::new(),
            users: MockUserRepository::new(),
            projects: MockProjectRepository::new(),
            notifications: MockNotificationRepository::new(),
        }
    }

    fn caller_role(mut self, role: Option<WorkspaceRole>) -> Self {
        self.workspaces
            .expect_find_access()
            .returning(move |_, _| Ok(role.map(|role| access(WORKSPACE, OWNER, role))));
        self
    }

    fn build(self) -> Service {
        WorkspaceService::new(
            Arc::new(self.workspaces),
            Arc::new(self.users),
            Arc::new(self.projects),
            Arc::new(self.notifications),
            fixture_clock(),
        )
    }
}

fn stored_notification(new: &NewNotification) -> Notification {
    Notification {
        id: NotificationId::new(1),
        user_id: new.user_id,
        kind: new.kind.as_str().to_owned(),
        title: new.title.clone(),
        message: new.message.clone(),
        meta: new.meta.clone(),
        is_read: false,
        created_at: crate::domain::test_fixtures::fixture_timestamp(),
    }
}

#[tokio::test]
async fn invite_adds_member_and_notifies_invitee() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Owner));
    mocks
        .users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "grace@example.com")
        .return_once(|_| Ok(Some(user(INVITEE, "grace"))));
    mocks
        .workspaces
        .expect_add_member()
        .withf(|ws, invitee, role| {
            ws.get() == WORKSPACE && invitee.get() == INVITEE && *role == WorkspaceRole::Member
        })
        .times(1)
        .return_once(|_, _, _| Ok(member(INVITEE, "grace", WorkspaceRole::Member)));
    mocks
        .notifications
        .expect_append()
        .withf(|new, _| {
            new.user_id.get() == INVITEE
                && new.kind == NotificationKind::WorkspaceInvite
                && new.title == "Workspace Invitation"
                && new.message == "You were added to Workspace 10."
                && new.meta["workspaceId"] == WORKSPACE
        })
        .times(1)
        .returning(|new, _| Ok(stored_notification(new)));

    let outcome = mocks
        .build()
        .invite_member(UserId::new(OWNER), WorkspaceId::new(WORKSPACE), " Grace@Example.com ")
        .await
        .expect("invite succeeds");

    assert_eq!(outcome.message, INVITE_SUCCESS_MESSAGE);
    assert_eq!(outcome.member.role, WorkspaceRole::Member);
}

#[rstest]
#[case::not_a_member(None)]
#[case::plain_member(Some(WorkspaceRole::Member))]
#[tokio::test]
async fn invite_requires_manage_capability(#[case] role: Option<WorkspaceRole>) {
    let mut mocks = Mocks::new().caller_role(role);
    mocks.users.expect_find_by_email().never();
    mocks.workspaces.expect_add_member().never();

    let err = mocks
        .build()
        .invite_member(UserId::new(3), WorkspaceId::new(WORKSPACE), "grace@example.com")
        .await
        .expect_err("denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn invite_rejects_blank_email() {
    let err = Mocks::new()
        .caller_role(Some(WorkspaceRole::Admin))
        .build()
        .invite_member(UserId::new(OWNER), WorkspaceId::new(WORKSPACE), "   ")
        .await
        .expect_err("blank email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn invite_reports_unknown_email() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Admin));
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks.workspaces.expect_add_member().never();

    let err = mocks
        .build()
        .invite_member(UserId::new(OWNER), WorkspaceId::new(WORKSPACE), "nobody@example.com")
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("user_not_found")
    );
}

#[tokio::test]
async fn invite_reports_existing_member_without_notifying() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Owner));
    mocks
        .users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(INVITEE, "grace"))));
    mocks
        .workspaces
        .expect_add_member()
        .return_once(|_, _, _| Err(WorkspaceRepositoryError::already_member(WORKSPACE, INVITEE)));
    mocks.notifications.expect_append().never();

    let err = mocks
        .build()
        .invite_member(UserId::new(OWNER), WorkspaceId::new(WORKSPACE), "grace@example.com")
        .await
        .expect_err("already member");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("already_member")
    );
}

#[tokio::test]
async fn invite_succeeds_when_notification_fails() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Owner));
    mocks
        .users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(INVITEE, "grace"))));
    mocks
        .workspaces
        .expect_add_member()
        .return_once(|_, _, _| Ok(member(INVITEE, "grace", WorkspaceRole::Member)));
    mocks
        .notifications
        .expect_append()
        .return_once(|_, _| Err(NotificationRepositoryError::connection("feed offline")));

    let outcome = mocks
        .build()
        .invite_member(UserId::new(OWNER), WorkspaceId::new(WORKSPACE), "grace@example.com")
        .await
        .expect("membership stands without notification");

    assert_eq!(outcome.member.user_id.get(), INVITEE);
}

#[tokio::test]
async fn list_members_denies_non_members_before_reading_rows() {
    let mut mocks = Mocks::new().caller_role(None);
    mocks.workspaces.expect_list_members().never();

    let err = mocks
        .build()
        .list_members(UserId::new(3), WorkspaceId::new(WORKSPACE))
        .await
        .expect_err("denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_requires_manage_and_cascades_through_repository() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Admin));
    mocks
        .workspaces
        .expect_delete_workspace()
        .withf(|ws| ws.get() == WORKSPACE)
        .times(1)
        .return_once(|_| Ok(()));

    mocks
        .build()
        .delete_workspace(UserId::new(OWNER), WorkspaceId::new(WORKSPACE))
        .await
        .expect("deleted");
}

#[tokio::test]
async fn list_projects_requires_view_capability() {
    let mut mocks = Mocks::new().caller_role(Some(WorkspaceRole::Member));
    mocks
        .projects
        .expect_list_with_counts()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let projects = mocks
        .build()
        .list_projects(UserId::new(INVITEE), WorkspaceId::new(WORKSPACE))
        .await
        .expect("member may view");
    assert!(projects.is_empty());
}

#[tokio::test]
async fn create_workspace_returns_owner_access() {
    let mut mocks = Mocks::new();
    mocks
        .workspaces
        .expect_create_workspace()
        .withf(|owner, new| owner.get() == OWNER && new.name() == "Research")
        .return_once(|_, _| Ok(access(WORKSPACE, OWNER, WorkspaceRole::Owner)));
    let input = NewWorkspace::try_from_parts("Research", None).expect("valid workspace");

    let created = mocks
        .build()
        .create_workspace(UserId::new(OWNER), &input)
        .await
        .expect("created");
    assert_eq!(created.role, WorkspaceRole::Owner);
}
