use crate::config::ConnectionParams;
use crate::error::SqlQueryError;
use crate::mysql_db::connection::{close, connect};
use crate::mysql_db::execution::execute_statement;
use crate::mysql_db::{JsonRow, StatementOutcome};
use serde_json::Value;

const SHOW_TABLES: &str = "SHOW TABLES";

/// Names of the tables in the connected database, in server order.
pub async fn list_tables(params: &ConnectionParams) -> Result<Vec<String>, SqlQueryError> {
    let mut conn = connect(params).await?;
    let outcome = execute_statement(&mut conn, SHOW_TABLES).await;
    close(conn).await;
    match outcome?.normalize()? {
        StatementOutcome::Rows(rows) => Ok(rows.iter().filter_map(table_name).collect()),
        StatementOutcome::RowsAffected(_) => Ok(Vec::new()),
    }
}

// `SHOW TABLES` has a single column named after the database.
fn table_name(row: &JsonRow) -> Option<String> {
    match row.values().next() {
        Some(Value::String(name)) => Some(name.clone()),
        _ => None,
    }
}
