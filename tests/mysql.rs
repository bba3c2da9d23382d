// End-to-end runs against a live MySQL server. They are ignored by
// default; run them with `cargo test -- --ignored` once SQLQUERY_TEST_HOST
// (see `utils::TestDatabase`) points at a server.
use assert_cmd::prelude::*;
use assert_json_diff::assert_json_eq;
use serde_json::{json, Value};
use std::env;
use std::fs;
use std::process::{self, Command, Output};

#[macro_use]
mod utils;

use utils::TestDatabase;

fn run(db: &TestDatabase, extra: &[&str]) -> Result<Output, Box<dyn std::error::Error>> {
    let mut args = db.args();
    args.extend(extra.iter().map(|arg| arg.to_string()));
    Ok(sqlquery_cmd!(args).output()?)
}

fn success(output: &Output) -> Result<Value, Box<dyn std::error::Error>> {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stderr.is_empty());
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn failure(output: &Output) -> Result<Value, Box<dyn std::error::Error>> {
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    Ok(serde_json::from_slice(&output.stderr)?)
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn select_literal() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = success(&run(&db, &["--query", "SELECT 1 AS x"])?)?;
    assert_json_eq!(
        envelope,
        json!({
            "status": "success",
            "host": db.host,
            "database": db.database,
            "results": [{"query": "SELECT 1 AS x", "result": [{"x": 1}]}]
        })
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn missing_sql_file() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = failure(&run(&db, &["--sqlfile", "missing.sql"])?)?;
    assert_json_eq!(
        envelope,
        json!({"status": "error", "message": "SQL file not found: missing.sql"})
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn missing_query() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = failure(&run(&db, &[])?)?;
    assert_json_eq!(
        envelope,
        json!({"status": "error", "message": "No SQL query or file provided"})
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn bad_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let output = sqlquery_cmd!([
        "--host",
        db.host.as_str(),
        "--port",
        db.port.as_str(),
        "--user",
        "sqlquery_no_such_user",
        "--password",
        "wrong",
        "--database",
        db.database.as_str(),
        "--query",
        "SELECT 1",
    ])
    .output()?;
    let envelope = failure(&output)?;
    assert_eq!(envelope["status"], "error");
    assert!(envelope["message"]
        .as_str()
        .is_some_and(|message| message.contains("1045")));
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn batch_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let path = env::temp_dir().join(format!("sqlquery-batch-{}.sql", process::id()));
    fs::write(
        &path,
        "DROP TABLE IF EXISTS sqlquery_batch;\n\
         CREATE TABLE sqlquery_batch (id INT PRIMARY KEY, label VARCHAR(20), price DECIMAL(6,2), added DATE, seen DATETIME(6));\n\
         INSERT INTO sqlquery_batch VALUES (1, 'a;b', 12.50, '2024-02-29', '2024-01-02 03:04:05.250000'), (2, 'café', NULL, NULL, NULL);\n\
         SELECT label, id, price, added, seen FROM sqlquery_batch ORDER BY id;\n\
         SELECT id FROM sqlquery_batch WHERE id > 10;\n\
         UPDATE sqlquery_batch SET label = 'z' WHERE id = 2;\n",
    )?;

    let envelope = success(&run(&db, &["--sqlfile", path.to_str().unwrap_or_default()])?)?;
    fs::remove_file(&path)?;

    let results = envelope["results"].as_array().cloned().unwrap_or_default();
    assert_eq!(results.len(), 6);
    assert_eq!(results[0]["query"], "DROP TABLE IF EXISTS sqlquery_batch");
    assert_eq!(results[2]["rows_affected"], 2);
    assert_json_eq!(
        results[3],
        json!({
            "query": "SELECT label, id, price, added, seen FROM sqlquery_batch ORDER BY id",
            "result": [
                {"label": "a;b", "id": 1, "price": 12.5, "added": "2024-02-29", "seen": "2024-01-02T03:04:05.250000"},
                {"label": "café", "id": 2, "price": null, "added": null, "seen": null}
            ]
        })
    );
    let keys: Vec<&str> = results[3]["result"][0]
        .as_object()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["label", "id", "price", "added", "seen"]);
    assert_json_eq!(results[4]["result"], json!([]));
    assert!(results[4].get("rows_affected").is_none());
    assert_json_eq!(
        results[5],
        json!({"query": "UPDATE sqlquery_batch SET label = 'z' WHERE id = 2", "rows_affected": 1})
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn single_statement_with_terminator() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    success(&run(
        &db,
        &[
            "--query",
            "DROP TABLE IF EXISTS sqlquery_single; CREATE TABLE sqlquery_single (id INT PRIMARY KEY, a INT); INSERT INTO sqlquery_single VALUES (5, 0);",
        ],
    )?)?;

    let query = "UPDATE sqlquery_single SET a=1 WHERE id=5;";
    let envelope = success(&run(&db, &["--query", query])?)?;
    assert_json_eq!(
        envelope["results"],
        json!([{"query": query, "rows_affected": 1}])
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn failing_statement_aborts_batch() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = failure(&run(
        &db,
        &["--query", "SELECT 1; SELECT * FROM sqlquery_no_such_table; SELECT 2"],
    )?)?;
    assert_eq!(envelope["status"], "error");
    assert!(envelope["message"]
        .as_str()
        .is_some_and(|message| message.contains("1146")));
    assert!(envelope.get("results").is_none());
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn binary_columns_are_not_serializable() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = failure(&run(&db, &["--query", "SELECT UNHEX('DEAD') AS raw"])?)?;
    assert_json_eq!(
        envelope,
        json!({"status": "error", "message": "Type bytes not serializable"})
    );
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn list_tables_prints_names() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    success(&run(
        &db,
        &["--query", "CREATE TABLE IF NOT EXISTS sqlquery_listed (id INT)"],
    )?)?;

    let output = Command::cargo_bin("list_tables")?
        .args(db.args())
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some(format!("Connected to MySQL server and database '{}'", db.database).as_str())
    );
    assert_eq!(
        lines.next(),
        Some(format!("Tables in '{}' database:", db.database).as_str())
    );
    assert!(lines.any(|line| line == "sqlquery_listed"));
    Ok(())
}

#[test]
#[ignore = "needs a live MySQL server; set SQLQUERY_TEST_HOST"]
fn writes_survive_unserializable_results() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDatabase::from_env()?;
    let envelope = failure(&run(
        &db,
        &[
            "--query",
            "DROP TABLE IF EXISTS sqlquery_kept; CREATE TABLE sqlquery_kept (id INT); INSERT INTO sqlquery_kept VALUES (1); SELECT UNHEX('AB') AS raw",
        ],
    )?)?;
    assert_json_eq!(
        envelope,
        json!({"status": "error", "message": "Type bytes not serializable"})
    );

    let envelope = success(&run(
        &db,
        &["--query", "SELECT COUNT(*) AS n FROM sqlquery_kept"],
    )?)?;
    assert_json_eq!(envelope["results"][0]["result"], json!([{"n": 1}]));
    Ok(())
}
