//! Shared repository plumbing: the transaction helper, label normalization
//! and schema readiness checks.

use super::{RepoError, RepoResult};
use crate::db::migrations::latest_version;
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `work` inside one IMMEDIATE transaction on `conn`.
///
/// Commits when `work` returns `Ok`. On `Err` the transaction is rolled back
/// and the error is returned to the caller as a value; a failed commit is
/// rolled back when the transaction drops. `operation` names the unit of
/// work in log events.
pub fn run_in_transaction<T>(
    conn: &Connection,
    operation: &'static str,
    work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|err| {
        warn!("event=tx_begin module=repo status=error operation={operation} error={err}");
        RepoError::from(err)
    })?;

    match work(&tx) {
        Ok(value) => {
            tx.commit().map_err(|err| {
                warn!("event=tx_commit module=repo status=error operation={operation} error={err}");
                RepoError::from(err)
            })?;
            debug!("event=tx_commit module=repo status=ok operation={operation}");
            Ok(value)
        }
        Err(err) => {
            warn!("event=tx_rollback module=repo status=error operation={operation} error={err}");
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=repo status=error operation={operation} error_code=rollback_failed error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}

/// Normalizes a station name or hazard label: trimmed and uppercase.
///
/// Returns `None` for blank input. Writes and lookups both go through this,
/// so `"kurils"`, `" Kurils "` and `"KURILS"` address the same row.
pub fn normalize_label(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Current wall-clock time in epoch milliseconds, as stored in timestamp
/// columns.
pub(crate) fn now_epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn require_label(field: &'static str, value: &str) -> RepoResult<String> {
    normalize_label(value).ok_or_else(|| RepoError::InvalidLabel {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{normalize_label, run_in_transaction};
    use crate::db::open_db_in_memory;
    use crate::repo::RepoError;

    #[test]
    fn normalize_label_trims_and_uppercases() {
        assert_eq!(normalize_label(" kurils ").as_deref(), Some("KURILS"));
        assert_eq!(normalize_label("Very Danger").as_deref(), Some("VERY DANGER"));
    }

    #[test]
    fn normalize_label_rejects_blank_input() {
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label("   \t"), None);
    }

    #[test]
    fn failed_work_is_rolled_back() {
        let conn = open_db_in_memory().unwrap();

        let result: Result<(), RepoError> = run_in_transaction(&conn, "test_rollback", |tx| {
            tx.execute("INSERT INTO station (name) VALUES ('KURILS');", [])?;
            Err(RepoError::not_found("station", "forced"))
        });
        assert!(matches!(result, Err(RepoError::NotFound { .. })));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM station;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn successful_work_is_committed() {
        let conn = open_db_in_memory().unwrap();

        let id = run_in_transaction(&conn, "test_commit", |tx| {
            tx.execute("INSERT INTO station (name) VALUES ('KAMCHATKA');", [])?;
            Ok(tx.last_insert_rowid())
        })
        .unwrap();

        let name: String = conn
            .query_row("SELECT name FROM station WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(name, "KAMCHATKA");
    }
}
