use std::env;

// Connection settings for the live-server tests. They're read from the
// same variables the binaries accept, prefixed with `SQLQUERY_TEST_`.
#[allow(dead_code)]
pub struct TestDatabase {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[allow(dead_code)]
impl TestDatabase {
    pub fn from_env() -> Result<TestDatabase, String> {
        let host = env::var("SQLQUERY_TEST_HOST")
            .map_err(|_| "SQLQUERY_TEST_HOST is not set; no MySQL server to test against".to_string())?;
        Ok(TestDatabase {
            host,
            port: env::var("SQLQUERY_TEST_PORT").unwrap_or_else(|_| "3306".to_string()),
            user: env::var("SQLQUERY_TEST_USER").unwrap_or_else(|_| "root".to_string()),
            password: env::var("SQLQUERY_TEST_PASSWORD").unwrap_or_default(),
            database: env::var("SQLQUERY_TEST_DATABASE").unwrap_or_else(|_| "sqlquery_test".to_string()),
        })
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "--host".to_string(),
            self.host.clone(),
            "--port".to_string(),
            self.port.clone(),
            "--user".to_string(),
            self.user.clone(),
            "--password".to_string(),
            self.password.clone(),
            "--database".to_string(),
            self.database.clone(),
        ]
    }
}

// sqlquery_cmd!(&["--query", "SELECT 1"])
#[macro_export]
macro_rules! sqlquery_cmd {
    ($args:expr) => {{
        let mut cmd = Command::cargo_bin("sqlquery")?;
        cmd.args($args)
            .env_remove("SQLQUERY_HOST")
            .env_remove("SQLQUERY_PORT")
            .env_remove("SQLQUERY_USER")
            .env_remove("SQLQUERY_PASSWORD")
            .env_remove("SQLQUERY_DATABASE")
            .env_remove("RUST_LOG");
        cmd
    }};
}
