use crate::config::ConnectionParams;
use crate::error::{driver_message, SqlQueryError};
use log::{debug, info, warn};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::time::timeout;

fn connect_options(params: &ConnectionParams) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .username(&params.user)
        .password(&params.password)
        .database(&params.database)
}

/// Open a single connection. Any failure, including an expired
/// `connect_timeout`, is a `ConnectionFailure` carrying the driver's
/// message.
pub async fn connect(params: &ConnectionParams) -> Result<MySqlConnection, SqlQueryError> {
    info!("Connecting to {} as {}", params.target(), params.user);
    let options = connect_options(params);
    let connecting = options.connect();
    let connected = match params.connect_timeout {
        Some(limit) => timeout(limit, connecting)
            .await
            .map_err(|_| SqlQueryError::ConnectionFailure {
                message: format!(
                    "Timed out connecting to {} after {}s",
                    params.target(),
                    limit.as_secs()
                ),
            })?,
        None => connecting.await,
    };
    connected.map_err(|err| SqlQueryError::ConnectionFailure {
        message: driver_message(&err),
    })
}

pub async fn close(conn: MySqlConnection) {
    match conn.close().await {
        Ok(()) => debug!("Connection closed"),
        Err(err) => warn!("Unable to close connection cleanly: {}", err),
    }
}
