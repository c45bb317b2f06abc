//! Diesel table definitions.
//!
//! These must match `migrations/` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    workspaces (id) {
        id -> Int8,
        name -> Varchar,
        description -> Text,
        owner_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows keyed by `(workspace_id, user_id)`.
    workspace_members (workspace_id, user_id) {
        workspace_id -> Int8,
        user_id -> Int8,
        role -> Varchar,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    projects (id) {
        id -> Int8,
        workspace_id -> Int8,
        name -> Varchar,
        description -> Text,
        color -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Int8,
        project_id -> Int8,
        title -> Varchar,
        description -> Text,
        status -> Varchar,
        priority -> Varchar,
        due_date -> Nullable<Timestamptz>,
        completed -> Bool,
        created_by -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Int8,
        user_id -> Int8,
        #[sql_name = "type"]
        kind -> Varchar,
        title -> Varchar,
        message -> Text,
        meta -> Jsonb,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(projects -> workspaces (workspace_id));
diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(workspace_members -> users (user_id));
diesel::joinable!(workspace_members -> workspaces (workspace_id));

diesel::allow_tables_to_appear_in_same_query!(
    notifications,
    projects,
    tasks,
    users,
    workspace_members,
    workspaces,
);
