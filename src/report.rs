use crate::config::ConnectionParams;
use crate::error::SqlQueryError;
use crate::mysql_db::StatementResult;
use serde::Serialize;
use std::process::ExitCode;

/// The single JSON document written per invocation.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        host: String,
        database: String,
        results: Vec<StatementResult>,
    },
    Error {
        message: String,
    },
}

impl Envelope {
    pub fn success(params: &ConnectionParams, results: Vec<StatementResult>) -> Envelope {
        Envelope::Success {
            host: params.host.clone(),
            database: params.database.clone(),
            results,
        }
    }

    pub fn error(err: &SqlQueryError) -> Envelope {
        Envelope::Error {
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error { .. })
    }

    /// Two-space indented JSON with non-ASCII text left as-is.
    pub fn render(&self) -> Result<String, SqlQueryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Print the outcome to stdout (success) or stderr (error) and return
/// the matching exit status.
pub fn report(outcome: Result<Envelope, SqlQueryError>) -> ExitCode {
    let envelope = match outcome {
        Ok(envelope) => envelope,
        Err(err) => Envelope::error(&err),
    };
    match envelope.render() {
        Ok(text) if envelope.is_error() => {
            eprintln!("{}", text);
            ExitCode::FAILURE
        }
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Ok(text) = Envelope::error(&err).render() {
                eprintln!("{}", text);
            }
            ExitCode::FAILURE
        }
    }
}
