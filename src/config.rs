use crate::statements::StatementRequest;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3306;

/// Credentials and address of the database to connect to. Built once
/// from the command line and never modified afterwards.
#[derive(Clone, Debug)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout: Option<Duration>,
}

impl ConnectionParams {
    /// `host:port/database`, for log lines. Leaves out the credentials.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

#[derive(Clone, Debug)]
pub struct QueryConfig {
    pub connection: ConnectionParams,
    pub request: StatementRequest,
    pub query_timeout: Option<Duration>,
}
