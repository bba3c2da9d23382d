use crate::error::SqlQueryError;
use crate::mysql_db::values::decode_row;
use crate::mysql_db::{StatementOutcome, StatementResult};
use crate::statements::{execution_mode, split_statements, strip_terminator, ExecutionMode};
use futures::TryStreamExt;
use log::{debug, info};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Either, Executor, Statement};

/// A statement's outcome as the driver returned it, before any value is
/// converted to JSON.
#[derive(Debug)]
pub enum RawOutcome {
    Rows(Vec<MySqlRow>),
    RowsAffected(u64),
}

impl RawOutcome {
    pub fn normalize(self) -> Result<StatementOutcome, SqlQueryError> {
        Ok(match self {
            RawOutcome::Rows(rows) => StatementOutcome::Rows(
                rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?,
            ),
            RawOutcome::RowsAffected(count) => StatementOutcome::RowsAffected(count),
        })
    }
}

/// Run `sql` inside one transaction and commit once everything has
/// succeeded. The first failing statement aborts the batch; its
/// predecessors are left uncommitted. Values are converted to JSON only
/// after the commit, so a value with no JSON form never undoes writes.
pub async fn execute_batch(
    conn: &mut MySqlConnection,
    sql: &str,
) -> Result<Vec<StatementResult>, SqlQueryError> {
    let mode = execution_mode(sql);
    info!("Executing in {:?} statement mode", mode);

    let mut tx = conn.begin().await?;
    let mut executed = Vec::new();
    match mode {
        ExecutionMode::Single => {
            let outcome = execute_statement(&mut *tx, strip_terminator(sql)).await?;
            executed.push((sql.to_string(), outcome));
        }
        ExecutionMode::Multi => {
            for statement in split_statements(sql) {
                let outcome = execute_statement(&mut *tx, statement).await?;
                executed.push((statement.to_string(), outcome));
            }
        }
    }

    tx.commit().await?;
    debug!("Committed {} statement(s)", executed.len());

    let mut results = Vec::with_capacity(executed.len());
    for (query, outcome) in executed {
        results.push(StatementResult {
            query,
            outcome: outcome.normalize()?,
        });
    }
    Ok(results)
}

/// Execute one statement over the text protocol.
///
/// A statement with zero rows looks the same on the wire whether it is an
/// empty `SELECT` or an `UPDATE` that matched nothing, so the statement
/// is prepared first to learn whether it has result columns. Statements
/// the server can't prepare fall back to "rows if any came back".
pub async fn execute_statement(
    conn: &mut MySqlConnection,
    sql: &str,
) -> Result<RawOutcome, SqlQueryError> {
    debug!("Executing statement: {}", sql);

    let returns_rows = match (&mut *conn).prepare(sql).await {
        Ok(prepared) => Some(!prepared.columns().is_empty()),
        Err(err) => {
            debug!("Unable to prepare statement, inferring its shape: {}", err);
            None
        }
    };

    let mut rows = Vec::new();
    let mut rows_affected = 0;
    let mut stream = (&mut *conn).fetch_many(sql);
    while let Some(step) = stream.try_next().await? {
        match step {
            Either::Left(done) => rows_affected += done.rows_affected(),
            Either::Right(row) => rows.push(row),
        }
    }

    Ok(match returns_rows {
        Some(true) => RawOutcome::Rows(rows),
        Some(false) => RawOutcome::RowsAffected(rows_affected),
        None if !rows.is_empty() => RawOutcome::Rows(rows),
        None => RawOutcome::RowsAffected(rows_affected),
    })
}
