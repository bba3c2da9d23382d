use sqlquery::cli::{query_command, query_config};
use sqlquery::mysql_db::run_query;
use sqlquery::report::{report, Envelope};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let matches = query_command().get_matches();
    let config = query_config(&matches);
    let outcome = run_query(&config)
        .await
        .map(|results| Envelope::success(&config.connection, results));
    report(outcome)
}
