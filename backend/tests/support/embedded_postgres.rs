//! Database provisioning on the embedded cluster.
//!
//! Each suite gets a freshly created database with the embedded Diesel
//! migrations applied, so tests never see each other's rows. Resets use the
//! `postgres` client because `DROP DATABASE` cannot run inside Diesel's
//! transaction handling.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use nexus::outbound::persistence::MIGRATIONS;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

/// Create an empty, migrated database and return its URL.
pub fn provision_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("nexus_test_{}", Uuid::new_v4().simple());
    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;

    let url = cluster.connection().database_url(&name);
    let mut conn = PgConnection::establish(&url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(url)
}

/// Insert a task directly; task authoring has no repository port.
///
/// `overdue` places the due date one day in the past.
pub fn seed_task(url: &str, project_id: i64, status: &str, overdue: bool) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let due = if overdue { "NOW() - INTERVAL '1 day'" } else { "NULL" };
    let row = client
        .query_one(
            &format!(
                "INSERT INTO tasks (project_id, title, status, priority, due_date, completed) \
                 VALUES ($1, 'Seeded task', $2, 'high', {due}, $2 = 'done') RETURNING id"
            ),
            &[&project_id, &status],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
