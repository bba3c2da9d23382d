pub mod connection;
pub mod execution;
pub mod tables;
pub mod values;

use crate::config::QueryConfig;
use crate::error::SqlQueryError;
use crate::mysql_db::connection::{close, connect};
use crate::mysql_db::execution::execute_batch;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::mysql::MySqlConnection;
use tokio::time::timeout;

pub type JsonRow = Map<String, Value>;

/// What one statement produced: either the rows it returned, or how many
/// rows it changed.
#[derive(Debug, PartialEq, Serialize)]
pub enum StatementOutcome {
    #[serde(rename = "result")]
    Rows(Vec<JsonRow>),
    #[serde(rename = "rows_affected")]
    RowsAffected(u64),
}

#[derive(Debug, PartialEq, Serialize)]
pub struct StatementResult {
    pub query: String,
    #[serde(flatten)]
    pub outcome: StatementOutcome,
}

/// Connect, resolve the SQL to run, execute it and release the
/// connection. The connection is closed exactly once, whether or not
/// loading or execution fails.
pub async fn run_query(config: &QueryConfig) -> Result<Vec<StatementResult>, SqlQueryError> {
    let mut conn = connect(&config.connection).await?;
    let outcome = load_and_execute(&mut conn, config).await;
    close(conn).await;
    outcome
}

async fn load_and_execute(
    conn: &mut MySqlConnection,
    config: &QueryConfig,
) -> Result<Vec<StatementResult>, SqlQueryError> {
    let sql = config.request.load()?;
    debug!("Loaded {} bytes of SQL", sql.len());
    match config.query_timeout {
        Some(limit) => timeout(limit, execute_batch(conn, &sql))
            .await
            .map_err(|_| SqlQueryError::DatabaseExecution {
                message: format!("Query timed out after {}s", limit.as_secs()),
            })?,
        None => execute_batch(conn, &sql).await,
    }
}
