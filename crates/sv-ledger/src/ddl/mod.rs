//! DDL for the ledger table.
//!
//! The table name is configurable, so statements are built at runtime from an
//! identifier that [`sv_core::config::is_sql_identifier`] has accepted.

use crate::error::{LedgerError, LedgerResult};
use sv_core::config::is_sql_identifier;

/// Columns selected when reading records, in [`crate::record`] decode order.
pub const RECORD_COLUMNS: &str =
    "id, deployment, version, pre_release, build, release_notes, deployed_at::VARCHAR";

/// Validate a table name before it is interpolated into SQL.
pub fn checked_table_name(table: &str) -> LedgerResult<&str> {
    if is_sql_identifier(table) {
        Ok(table)
    } else {
        Err(LedgerError::Schema(format!(
            "invalid ledger table name '{table}'"
        )))
    }
}

/// Name of the sequence backing the `id` column.
pub fn sequence_name(table: &str) -> String {
    format!("{table}_id_seq")
}

/// Statements creating the ledger table and its id sequence.
///
/// `deployment` carries a UNIQUE constraint so a concurrent double-append is
/// surfaced as a constraint violation instead of a second row.
pub fn create_table_sql(table: &str) -> String {
    let seq = sequence_name(table);
    format!(
        "CREATE SEQUENCE {seq} START 1;
         CREATE TABLE {table} (
             id            INTEGER PRIMARY KEY DEFAULT nextval('{seq}'),
             deployment    VARCHAR NOT NULL UNIQUE,
             version       VARCHAR NOT NULL,
             pre_release   VARCHAR,
             build         VARCHAR,
             release_notes VARCHAR NOT NULL,
             deployed_at   TIMESTAMP
         );"
    )
}
