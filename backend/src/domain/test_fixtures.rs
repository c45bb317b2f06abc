//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    EmailAddress, Member, User, UserId, Username, Workspace, WorkspaceAccess, WorkspaceId,
    WorkspaceRole,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    clock_at(fixture_timestamp())
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

pub(crate) fn user(id: i64, name: &str) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(name).expect("fixture username"),
        email: EmailAddress::new(format!("{name}@example.com")).expect("fixture email"),
        created_at: fixture_timestamp(),
    }
}

pub(crate) fn workspace(id: i64, owner: i64) -> Workspace {
    Workspace {
        id: WorkspaceId::new(id),
        name: format!("Workspace {id}"),
        description: String::new(),
        owner_id: UserId::new(owner),
        created_at: fixture_timestamp(),
    }
}

pub(crate) fn access(id: i64, owner: i64, role: WorkspaceRole) -> WorkspaceAccess {
    WorkspaceAccess {
        workspace: workspace(id, owner),
        role,
    }
}

pub(crate) fn member(user_id: i64, name: &str, role: WorkspaceRole) -> Member {
    let profile = user(user_id, name);
    Member {
        user_id: profile.id,
        username: profile.username,
        email: profile.email,
        role,
        joined_at: fixture_timestamp(),
    }
}
