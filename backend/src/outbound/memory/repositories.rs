//! Port implementations for [`InMemoryStore`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AnalyticsRepository, AnalyticsRepositoryError, NewAccount, NotificationRepository,
    NotificationRepositoryError, ProjectRepository, ProjectRepositoryError, StoredCredentials,
    TaskRepository, TaskRepositoryError, UserRepository, UserRepositoryError, WorkspaceRepository,
    WorkspaceRepositoryError,
};
use crate::domain::{
    EmailAddress, Member, NewNotification, NewWorkspace, Notification, NotificationId, ProjectId,
    ProjectSummary, Task, TaskId, TaskSnapshot, TaskStatus, User, UserId, Workspace,
    WorkspaceAccess, WorkspaceId, WorkspaceRole,
};

use super::{InMemoryStore, MembershipRecord, ProjectRecord, State, UserRecord};

fn histogram<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut counts = std::collections::BTreeMap::<String, u64>::new();
    for value in values {
        *counts.entry(value.to_owned()).or_default() += 1;
    }
    counts.into_iter().collect()
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

impl State {
    fn create_workspace_for(
        &mut self,
        owner: UserId,
        workspace: &NewWorkspace,
        now: DateTime<Utc>,
    ) -> Workspace {
        let id = WorkspaceId::new(self.next_id());
        let created = Workspace {
            id,
            name: workspace.name().to_owned(),
            description: workspace.description().to_owned(),
            owner_id: owner,
            created_at: now,
        };
        self.workspaces.insert(id, created.clone());
        self.members.push(MembershipRecord {
            workspace_id: id,
            user_id: owner,
            role: WorkspaceRole::Owner,
            joined_at: now,
        });
        created
    }

    fn member_view(&self, record: &MembershipRecord) -> Option<Member> {
        let user = &self.users.get(&record.user_id)?.user;
        Some(Member {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: record.role,
            joined_at: record.joined_at,
        })
    }

    fn find_user_by_email(&self, email: &EmailAddress) -> Option<&UserRecord> {
        self.users.values().find(|record| &record.user.email == email)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(&id).map(|record| record.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.find_user_by_email(email).map(|record| record.user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .find_user_by_email(email)
            .map(|record| StoredCredentials {
                user: record.user.clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn register_account(&self, account: &NewAccount) -> Result<User, UserRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if state.find_user_by_email(&account.email).is_some() {
            return Err(UserRepositoryError::duplicate_email(account.email.as_ref()));
        }

        let user = User {
            id: UserId::new(state.next_id()),
            username: account.username.clone(),
            email: account.email.clone(),
            created_at: now,
        };
        state.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        let workspace = state.create_workspace_for(user.id, &account.workspace, now);
        let project_id = ProjectId::new(state.next_id());
        state.projects.insert(
            project_id,
            ProjectRecord {
                id: project_id,
                workspace_id: workspace.id,
                name: account.project.name.clone(),
                description: account.project.description.clone(),
                color: account.project.color.clone(),
                created_at: now,
            },
        );
        Ok(user)
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryStore {
    async fn create_workspace(
        &self,
        owner: UserId,
        workspace: &NewWorkspace,
    ) -> Result<WorkspaceAccess, WorkspaceRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        if !state.users.contains_key(&owner) {
            return Err(WorkspaceRepositoryError::query("referenced row does not exist"));
        }
        Ok(WorkspaceAccess {
            workspace: state.create_workspace_for(owner, workspace, now),
            role: WorkspaceRole::Owner,
        })
    }

    async fn find_access(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
    ) -> Result<Option<WorkspaceAccess>, WorkspaceRepositoryError> {
        let state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        let Some(workspace) = state.workspaces.get(&workspace_id) else {
            return Ok(None);
        };
        Ok(state
            .members
            .iter()
            .find(|m| m.workspace_id == workspace_id && m.user_id == user)
            .map(|m| WorkspaceAccess {
                workspace: workspace.clone(),
                role: m.role,
            }))
    }

    async fn list_for_member(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceAccess>, WorkspaceRepositoryError> {
        let state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        let mut listed: Vec<WorkspaceAccess> = state
            .members
            .iter()
            .filter(|m| m.user_id == user)
            .filter_map(|m| {
                state.workspaces.get(&m.workspace_id).map(|ws| WorkspaceAccess {
                    workspace: ws.clone(),
                    role: m.role,
                })
            })
            .collect();
        listed.sort_by(|a, b| {
            b.workspace
                .created_at
                .cmp(&a.workspace.created_at)
                .then_with(|| b.workspace.id.cmp(&a.workspace.id))
        });
        Ok(listed)
    }

    async fn visible_workspace_ids(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceId>, WorkspaceRepositoryError> {
        let state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        let member_of = state
            .members
            .iter()
            .filter(|m| m.user_id == user)
            .map(|m| m.workspace_id);
        let owned = state
            .workspaces
            .values()
            .filter(|ws| ws.owner_id == user)
            .map(|ws| ws.id);
        let ids: BTreeSet<WorkspaceId> = member_of.chain(owned).collect();
        Ok(ids.into_iter().collect())
    }

    async fn list_members(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Member>, WorkspaceRepositoryError> {
        let state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        let mut members: Vec<Member> = state
            .members
            .iter()
            .filter(|m| m.workspace_id == workspace_id)
            .filter_map(|m| state.member_view(m))
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(members)
    }

    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
        role: WorkspaceRole,
    ) -> Result<Member, WorkspaceRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        if !state.workspaces.contains_key(&workspace_id) || !state.users.contains_key(&user) {
            return Err(WorkspaceRepositoryError::query("referenced row does not exist"));
        }
        if state
            .members
            .iter()
            .any(|m| m.workspace_id == workspace_id && m.user_id == user)
        {
            return Err(WorkspaceRepositoryError::already_member(
                workspace_id.get(),
                user.get(),
            ));
        }
        let record = MembershipRecord {
            workspace_id,
            user_id: user,
            role,
            joined_at: now,
        };
        let member = state
            .member_view(&record)
            .ok_or_else(|| WorkspaceRepositoryError::query("referenced row does not exist"))?;
        state.members.push(record);
        Ok(member)
    }

    async fn delete_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<(), WorkspaceRepositoryError> {
        let mut state = self.lock().map_err(WorkspaceRepositoryError::query)?;
        let doomed: BTreeSet<ProjectId> = state
            .projects
            .values()
            .filter(|p| p.workspace_id == workspace_id)
            .map(|p| p.id)
            .collect();
        state.tasks.retain(|_, task| !doomed.contains(&task.project_id));
        state.projects.retain(|id, _| !doomed.contains(id));
        state.members.retain(|m| m.workspace_id != workspace_id);
        state.workspaces.remove(&workspace_id);
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn list_with_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<ProjectSummary>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::query)?;
        let mut projects: Vec<ProjectSummary> = state
            .projects
            .values()
            .filter(|p| p.workspace_id == workspace_id)
            .map(|p| {
                let tasks = state.tasks.values().filter(|t| t.project_id == p.id);
                let (total, done) = tasks.fold((0_u64, 0_u64), |(total, done), task| {
                    (total + 1, done + u64::from(task.completed))
                });
                ProjectSummary {
                    id: p.id,
                    workspace_id: p.workspace_id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    color: p.color.clone(),
                    created_at: p.created_at,
                    task_count: total,
                    completed_count: done,
                }
            })
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(projects)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn workspace_of(&self, task: TaskId) -> Result<Option<WorkspaceId>, TaskRepositoryError> {
        let state = self.lock().map_err(TaskRepositoryError::query)?;
        Ok(state
            .tasks
            .get(&task)
            .and_then(|t| state.workspace_of_project(t.project_id)))
    }

    async fn update_status(
        &self,
        task: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut state = self.lock().map_err(TaskRepositoryError::query)?;
        Ok(state.tasks.get_mut(&task).map(|stored| {
            stored.status = status;
            stored.completed = status.is_completed();
            stored.updated_at = now;
            stored.clone()
        }))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn append(
        &self,
        notification: &NewNotification,
        now: DateTime<Utc>,
    ) -> Result<Notification, NotificationRepositoryError> {
        let mut state = self.lock().map_err(NotificationRepositoryError::query)?;
        if !state.users.contains_key(&notification.user_id) {
            return Err(NotificationRepositoryError::query(
                "referenced row does not exist",
            ));
        }
        let stored = Notification {
            id: NotificationId::new(state.next_id()),
            user_id: notification.user_id,
            kind: notification.kind.as_str().to_owned(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            meta: notification.meta.clone(),
            is_read: false,
            created_at: now,
        };
        state.notifications.push(stored.clone());
        Ok(stored)
    }

    async fn list_for(&self, user: UserId) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let state = self.lock().map_err(NotificationRepositoryError::query)?;
        let mut feed: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(feed)
    }

    async fn unread_count(&self, user: UserId) -> Result<u64, NotificationRepositoryError> {
        let state = self.lock().map_err(NotificationRepositoryError::query)?;
        Ok(count(
            state
                .notifications
                .iter()
                .filter(|n| n.user_id == user && !n.is_read)
                .count(),
        ))
    }

    async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut state = self.lock().map_err(NotificationRepositoryError::query)?;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user)
        {
            Some(entry) => {
                entry.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn task_snapshot(
        &self,
        workspaces: &[WorkspaceId],
        now: DateTime<Utc>,
        since: DateTime<Utc>,
    ) -> Result<TaskSnapshot, AnalyticsRepositoryError> {
        let state = self.lock().map_err(AnalyticsRepositoryError::query)?;
        let tasks: Vec<&Task> = state.tasks_in(workspaces).collect();

        Ok(TaskSnapshot {
            status_counts: histogram(tasks.iter().map(|t| t.status.as_str())),
            priority_counts: histogram(tasks.iter().map(|t| t.priority.as_str())),
            overdue: count(
                tasks
                    .iter()
                    .filter(|t| t.status != TaskStatus::Done && t.due_date.is_some_and(|d| d < now))
                    .count(),
            ),
            project_count: count(
                state
                    .projects
                    .values()
                    .filter(|p| workspaces.contains(&p.workspace_id))
                    .count(),
            ),
            completions: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Done)
                .map(|t| t.updated_at)
                .filter(|at| *at >= since && *at <= now)
                .collect(),
        })
    }
}
