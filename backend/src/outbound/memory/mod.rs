//! In-process implementation of every repository port.
//!
//! Used when no database URL is configured and by scenario tests. One
//! mutex guards the whole state, so every port method is atomic with
//! respect to the others, matching the transactional guarantees of the
//! Diesel adapters.

mod repositories;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::{
    Notification, ProjectId, Task, TaskId, TaskPriority, TaskStatus, User, UserId, Workspace,
    WorkspaceId, WorkspaceRole,
};

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct MembershipRecord {
    workspace_id: WorkspaceId,
    user_id: UserId,
    role: WorkspaceRole,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ProjectRecord {
    id: ProjectId,
    workspace_id: WorkspaceId,
    name: String,
    description: String,
    color: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: BTreeMap<UserId, UserRecord>,
    workspaces: BTreeMap<WorkspaceId, Workspace>,
    members: Vec<MembershipRecord>,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    tasks: BTreeMap<TaskId, Task>,
    notifications: Vec<Notification>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn workspace_of_project(&self, project: ProjectId) -> Option<WorkspaceId> {
        self.projects.get(&project).map(|p| p.workspace_id)
    }

    fn tasks_in<'a>(&'a self, workspaces: &'a [WorkspaceId]) -> impl Iterator<Item = &'a Task> {
        self.tasks.values().filter(move |task| {
            self.workspace_of_project(task.project_id)
                .is_some_and(|ws| workspaces.contains(&ws))
        })
    }
}

/// Task fields accepted by [`InMemoryStore::insert_task`].
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub project_id: ProjectId,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: Option<UserId>,
}

/// Mutex-guarded store implementing all repository ports.
pub struct InMemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    /// Insert a task into an existing project.
    ///
    /// Task authoring has no port of its own; this seeds data for local
    /// development and scenario tests. Returns `None` for an unknown project.
    pub fn insert_task(&self, draft: TaskDraft) -> Option<Task> {
        let now = self.clock.utc();
        let mut state = self.lock().ok()?;
        state.projects.get(&draft.project_id)?;
        let id = TaskId::new(state.next_id());
        let task = Task {
            id,
            project_id: draft.project_id,
            title: draft.title,
            description: String::new(),
            status: draft.status,
            priority: draft.priority.as_str().to_owned(),
            due_date: draft.due_date,
            completed: draft.status.is_completed(),
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(id, task.clone());
        Some(task)
    }

    /// Ids of the projects in `workspace`, oldest first.
    pub fn project_ids(&self, workspace: WorkspaceId) -> Vec<ProjectId> {
        self.lock()
            .map(|state| {
                state
                    .projects
                    .values()
                    .filter(|project| project.workspace_id == workspace)
                    .map(|project| project.id)
                    .collect()
            })
            .unwrap_or_default()
    }
}
