//! End-to-end workspace scenarios over the in-memory store.
//!
//! These drive the same ports the HTTP handlers call, wired exactly as the
//! server wires them when no database is configured.

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use mockable::Clock;
use nexus::domain::{
    AuthSession, DashboardStats, ErrorCode, INVITE_SUCCESS_MESSAGE, NewWorkspace, Registration,
    TaskPriority, TaskStatus, WorkspaceId, WorkspaceRole,
};
use nexus::inbound::http::state::HttpState;
use nexus::outbound::memory::{InMemoryStore, TaskDraft};
use nexus::test_support::{MutableClock, memory_state};
use rstest::{fixture, rstest};

struct World {
    clock: Arc<MutableClock>,
    state: HttpState,
    store: Arc<InMemoryStore>,
}

#[fixture]
fn world() -> World {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 4, 9, 0, 0)
        .single()
        .expect("valid start time");
    let clock = Arc::new(MutableClock::new(start));
    let (state, store) = memory_state(Arc::clone(&clock));
    World {
        clock,
        state,
        store,
    }
}

impl World {
    async fn register(&self, username: &str) -> AuthSession {
        let registration = Registration::try_from_parts(
            username,
            &format!("{username}@example.com"),
            "correct horse battery",
        )
        .expect("valid registration");
        self.state
            .accounts
            .register(&registration)
            .await
            .expect("registration succeeds")
    }

    async fn home_workspace(&self, session: &AuthSession) -> WorkspaceId {
        let workspaces = self
            .state
            .workspaces_query
            .list_workspaces(session.user.id)
            .await
            .expect("list workspaces");
        workspaces
            .first()
            .map(|access| access.workspace.id)
            .expect("registration seeds a workspace")
    }
}

#[rstest]
#[tokio::test]
async fn registration_seeds_an_owned_workspace_with_a_project(world: World) {
    let alice = world.register("alice").await;

    let workspaces = world
        .state
        .workspaces_query
        .list_workspaces(alice.user.id)
        .await
        .expect("list workspaces");
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].role, WorkspaceRole::Owner);
    assert_eq!(workspaces[0].workspace.name, "alice Workspace");

    let projects = world
        .state
        .workspaces_query
        .list_projects(alice.user.id, workspaces[0].workspace.id)
        .await
        .expect("list projects");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].task_count, 0);
}

#[rstest]
#[tokio::test]
async fn invite_notifies_and_mark_read_is_owner_only(world: World) {
    let alice = world.register("alice").await;
    let bob = world.register("bob").await;
    let workspace = world.home_workspace(&alice).await;
    world.clock.advance(TimeDelta::minutes(1));

    let outcome = world
        .state
        .workspaces
        .invite_member(alice.user.id, workspace, "BOB@example.com")
        .await
        .expect("invite succeeds");
    assert_eq!(outcome.message, INVITE_SUCCESS_MESSAGE);
    assert_eq!(outcome.member.user_id, bob.user.id);
    assert_eq!(outcome.member.role, WorkspaceRole::Member);

    let feed = &world.state.notifications;
    assert_eq!(feed.unread_count(bob.user.id).await.expect("count"), 1);
    let entries = feed.list(bob.user.id).await.expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, "workspace_invite");
    assert_eq!(entries[0].meta["workspaceId"], workspace.get());
    assert!(!entries[0].is_read);

    feed.mark_read(alice.user.id, entries[0].id)
        .await
        .expect("foreign mark read is a silent no-op");
    assert_eq!(feed.unread_count(bob.user.id).await.expect("count"), 1);

    feed.mark_read(bob.user.id, entries[0].id)
        .await
        .expect("mark read");
    assert_eq!(feed.unread_count(bob.user.id).await.expect("count"), 0);

    let members = world
        .state
        .workspaces_query
        .list_members(bob.user.id, workspace)
        .await
        .expect("members visible to the new member");
    let ids: Vec<_> = members.iter().map(|member| member.user_id).collect();
    assert_eq!(ids, vec![alice.user.id, bob.user.id]);
}

#[rstest]
#[tokio::test]
async fn repeat_invite_conflicts_without_a_second_notification(world: World) {
    let alice = world.register("alice").await;
    let bob = world.register("bob").await;
    let workspace = world.home_workspace(&alice).await;
    let commands = &world.state.workspaces;

    commands
        .invite_member(alice.user.id, workspace, "bob@example.com")
        .await
        .expect("first invite");
    let err = commands
        .invite_member(alice.user.id, workspace, "bob@example.com")
        .await
        .expect_err("second invite");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        world
            .state
            .notifications
            .unread_count(bob.user.id)
            .await
            .expect("count"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_invites_admit_exactly_one(world: World) {
    let alice = world.register("alice").await;
    let bob = world.register("bob").await;
    let workspace = world.home_workspace(&alice).await;
    let commands = &world.state.workspaces;

    let (first, second) = tokio::join!(
        commands.invite_member(alice.user.id, workspace, "bob@example.com"),
        commands.invite_member(alice.user.id, workspace, "bob@example.com"),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    let conflicts = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .filter(|err| err.code() == ErrorCode::Conflict)
        .count();
    assert_eq!(conflicts, 1);

    let members = world
        .state
        .workspaces_query
        .list_members(alice.user.id, workspace)
        .await
        .expect("members");
    assert_eq!(
        members
            .iter()
            .filter(|member| member.user_id == bob.user.id)
            .count(),
        1
    );
    assert_eq!(
        world
            .state
            .notifications
            .list(bob.user.id)
            .await
            .expect("feed")
            .len(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn outsiders_and_members_are_held_to_their_capabilities(world: World) {
    let alice = world.register("alice").await;
    let bob = world.register("bob").await;
    let carol = world.register("carol").await;
    let workspace = world.home_workspace(&alice).await;
    world
        .state
        .workspaces
        .invite_member(alice.user.id, workspace, "bob@example.com")
        .await
        .expect("invite bob");

    let outsider = world
        .state
        .workspaces_query
        .list_members(carol.user.id, workspace)
        .await
        .expect_err("non-member denied");
    assert_eq!(outsider.code(), ErrorCode::Forbidden);

    let member_invite = world
        .state
        .workspaces
        .invite_member(bob.user.id, workspace, "carol@example.com")
        .await
        .expect_err("members cannot invite");
    assert_eq!(member_invite.code(), ErrorCode::Forbidden);

    let member_delete = world
        .state
        .workspaces
        .delete_workspace(bob.user.id, workspace)
        .await
        .expect_err("members cannot delete");
    assert_eq!(member_delete.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn overdue_task_leaves_the_count_once_done(world: World) {
    let alice = world.register("alice").await;
    let workspace = world.home_workspace(&alice).await;
    let project = world
        .store
        .project_ids(workspace)
        .into_iter()
        .next()
        .expect("seeded project");
    let task = world
        .store
        .insert_task(TaskDraft {
            project_id: project,
            title: "File the report".to_owned(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(world.clock.utc() - TimeDelta::days(1)),
            created_by: Some(alice.user.id),
        })
        .expect("task inserted");

    let before = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert_eq!(before.total_tasks, 1);
    assert_eq!(before.in_progress_tasks, 1);
    assert_eq!(before.overdue_tasks, 1);
    assert_eq!(before.completed_tasks, 0);

    world.clock.advance(TimeDelta::hours(2));
    let updated = world
        .state
        .tasks
        .update_status(alice.user.id, task.id, TaskStatus::Done)
        .await
        .expect("status updated");
    assert!(updated.completed);

    let after = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert_eq!(after.overdue_tasks, 0);
    assert_eq!(after.completed_tasks, 1);
    assert_eq!(after.weekly_completion.len(), 1);
    assert_eq!(after.weekly_completion[0].completed, 1);

    world.clock.advance(TimeDelta::weeks(7));
    let later = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert!(later.weekly_completion.is_empty());
    assert_eq!(later.completed_tasks, 1);
}

#[rstest]
#[tokio::test]
async fn task_due_this_instant_is_not_yet_overdue(world: World) {
    let alice = world.register("alice").await;
    let workspace = world.home_workspace(&alice).await;
    let project = world
        .store
        .project_ids(workspace)
        .into_iter()
        .next()
        .expect("seeded project");
    world
        .store
        .insert_task(TaskDraft {
            project_id: project,
            title: "Ship the release".to_owned(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            due_date: Some(world.clock.utc()),
            created_by: Some(alice.user.id),
        })
        .expect("task inserted");

    let on_time = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert_eq!(on_time.overdue_tasks, 0);

    world.clock.advance(TimeDelta::seconds(1));
    let late = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert_eq!(late.overdue_tasks, 1);
}

#[rstest]
#[tokio::test]
async fn dashboard_is_zeroed_without_workspaces(world: World) {
    let alice = world.register("alice").await;
    let workspace = world.home_workspace(&alice).await;

    world
        .state
        .workspaces
        .delete_workspace(alice.user.id, workspace)
        .await
        .expect("owner deletes");

    let stats = world
        .state
        .dashboard
        .dashboard(alice.user.id)
        .await
        .expect("dashboard");
    assert_eq!(stats, DashboardStats::empty());
}

#[rstest]
#[tokio::test]
async fn created_workspaces_list_newest_first(world: World) {
    let alice = world.register("alice").await;
    world.clock.advance(TimeDelta::minutes(5));
    let new_workspace =
        NewWorkspace::try_from_parts("Launch", Some("Q3 launch")).expect("valid workspace");

    let created = world
        .state
        .workspaces
        .create_workspace(alice.user.id, &new_workspace)
        .await
        .expect("create");

    let listed = world
        .state
        .workspaces_query
        .list_workspaces(alice.user.id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].workspace.id, created.workspace.id);
    assert_eq!(created.role, WorkspaceRole::Owner);
}
