use sqlquery::cli::{connection_params, list_tables_command};
use sqlquery::mysql_db::tables::list_tables;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let matches = list_tables_command().get_matches();
    let params = connection_params(&matches);
    match list_tables(&params).await {
        Ok(tables) => {
            println!(
                "Connected to MySQL server and database '{}'",
                params.database
            );
            println!("Tables in '{}' database:", params.database);
            for table in tables {
                println!("{}", table);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
