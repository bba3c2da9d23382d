use crate::config::{ConnectionParams, QueryConfig, DEFAULT_PORT};
use crate::statements::StatementRequest;
use clap::{arg, command, crate_version, value_parser, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

fn connection_args(command: Command, credentials_required: bool) -> Command {
    let host = arg!(--host <HOST> "MySQL host").env("SQLQUERY_HOST");
    let user = arg!(--user <USER> "MySQL username").env("SQLQUERY_USER");
    let password = arg!(--password <PASSWORD> "MySQL password")
        .env("SQLQUERY_PASSWORD")
        .hide_env_values(true);
    let (host, user, password) = if credentials_required {
        (
            host.required(true),
            user.required(true),
            password.required(true),
        )
    } else {
        (
            host.default_value("localhost"),
            user.default_value("root"),
            password.default_value(""),
        )
    };

    command
        .arg(host)
        .arg(
            arg!(--port <PORT> "MySQL port")
                .value_parser(value_parser!(u16))
                .env("SQLQUERY_PORT")
                .default_value("3306"),
        )
        .arg(user)
        .arg(password)
        .arg(
            arg!(--database <DATABASE> "Database name")
                .env("SQLQUERY_DATABASE")
                .required(true),
        )
        .arg(
            arg!(--"connect-timeout" <SECONDS> "Give up connecting after this many seconds")
                .value_parser(value_parser!(u64))
                .required(false),
        )
}

pub fn query_command() -> Command {
    connection_args(
        command!().about("Run SQL queries or files and return JSON"),
        true,
    )
    .arg(arg!(--query <SQL> "SQL query to execute").required(false))
    .arg(
        arg!(--sqlfile <FILE> "Path to SQL file to execute")
            .value_parser(value_parser!(PathBuf))
            .required(false),
    )
    .arg(
        arg!(--"query-timeout" <SECONDS> "Abort execution after this many seconds")
            .value_parser(value_parser!(u64))
            .required(false),
    )
}

pub fn list_tables_command() -> Command {
    connection_args(
        Command::new("list_tables")
            .version(crate_version!())
            .about("List the tables of a MySQL database"),
        false,
    )
}

fn string_arg(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn seconds_arg(matches: &ArgMatches, id: &str) -> Option<Duration> {
    matches.get_one::<u64>(id).map(|seconds| Duration::from_secs(*seconds))
}

pub fn connection_params(matches: &ArgMatches) -> ConnectionParams {
    ConnectionParams {
        host: string_arg(matches, "host"),
        port: matches
            .get_one::<u16>("port")
            .copied()
            .unwrap_or(DEFAULT_PORT),
        user: string_arg(matches, "user"),
        password: string_arg(matches, "password"),
        database: string_arg(matches, "database"),
        connect_timeout: seconds_arg(matches, "connect-timeout"),
    }
}

pub fn query_config(matches: &ArgMatches) -> QueryConfig {
    QueryConfig {
        connection: connection_params(matches),
        request: StatementRequest {
            query: matches.get_one::<String>("query").cloned(),
            sql_file: matches.get_one::<PathBuf>("sqlfile").cloned(),
        },
        query_timeout: seconds_arg(matches, "query-timeout"),
    }
}
