//! Connection to the database under test.

use std::env;
use std::fmt;

pub mod client;
pub mod decode;
pub mod retry;

/// Connection settings for the database under test, drawn from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    MissingHost,
    MissingPort,
    PortNotNumber,
    MissingUser,
    MissingPassword,
    MissingDatabase,
}

impl CredentialsError {
    pub fn message(&self) -> String {
        match self {
            CredentialsError::MissingHost => "DB_HOST is not set".to_string(),
            CredentialsError::MissingPort => "DB_PORT is not set".to_string(),
            CredentialsError::PortNotNumber => "DB_PORT is not a number".to_string(),
            CredentialsError::MissingUser => "DB_USER is not set".to_string(),
            CredentialsError::MissingPassword => "DB_PASSWORD is not set".to_string(),
            CredentialsError::MissingDatabase => "DB_NAME is not set".to_string(),
        }
    }
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Credentials {
    /// Read the DB_* environment variables. An unset or empty variable is an
    /// error naming the variable.
    pub fn from_env() -> Result<Credentials, CredentialsError> {
        let host = required("DB_HOST", CredentialsError::MissingHost)?;
        let port = required("DB_PORT", CredentialsError::MissingPort)?
            .parse::<u16>()
            .map_err(|_| CredentialsError::PortNotNumber)?;
        let user = required("DB_USER", CredentialsError::MissingUser)?;
        let password = required("DB_PASSWORD", CredentialsError::MissingPassword)?;
        let database = required("DB_NAME", CredentialsError::MissingDatabase)?;

        Ok(Credentials {
            host,
            port,
            user,
            password,
            database,
        })
    }

    /// Key=value connection string in the form the server expects. TLS is off
    /// and the client encoding pinned so result text is stable across
    /// environments.
    pub fn connection_string(&self) -> String {
        format!(
            "user={} password={} dbname={} host={} port={} sslmode=disable client_encoding=UTF8",
            self.user, self.password, self.database, self.host, self.port
        )
    }
}

fn required(name: &str, missing: CredentialsError) -> Result<String, CredentialsError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(missing),
    }
}

#[cfg(test)]
mod check {
    use super::*;

    // env mutations are process-wide, so all the environment cases live in
    // this one test.
    #[test]
    fn credentials_from_env() {
        env::remove_var("DB_HOST");
        assert_eq!(Credentials::from_env(), Err(CredentialsError::MissingHost));

        env::set_var("DB_HOST", "localhost");
        assert_eq!(Credentials::from_env(), Err(CredentialsError::MissingPort));

        env::set_var("DB_PORT", "not-a-port");
        assert_eq!(
            Credentials::from_env(),
            Err(CredentialsError::PortNotNumber)
        );

        env::set_var("DB_PORT", "5432");
        env::set_var("DB_USER", "assay");
        env::set_var("DB_PASSWORD", "secret");

        env::set_var("DB_NAME", "");
        assert_eq!(
            Credentials::from_env(),
            Err(CredentialsError::MissingDatabase)
        );

        env::set_var("DB_NAME", "inventory");
        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.host, "localhost");
        assert_eq!(credentials.port, 5432);
        assert_eq!(
            credentials.connection_string(),
            "user=assay password=secret dbname=inventory host=localhost port=5432 \
             sslmode=disable client_encoding=UTF8"
        );
    }
}
