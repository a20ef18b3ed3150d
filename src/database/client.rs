//! The live Postgres collaborator.
//!
//! One connection, statements forwarded in source order. A script's later
//! statements may depend on the side effects of earlier ones, so there is
//! nothing to gain from a pool here.

use std::time::Duration;

use tokio_postgres::NoTls;
use tracing::{debug, warn};

use crate::database::decode;
use crate::database::retry::Retry;
use crate::database::Credentials;
use crate::running::{ExecutionError, Executor};
use crate::Table;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A connected database ready to execute statement groups.
pub struct Database {
    client: tokio_postgres::Client,
    retry: Retry,
}

impl Database {
    /// Connect with the given credentials. The connection task is spawned off
    /// to drive the socket for as long as the client lives.
    pub async fn connect(
        credentials: &Credentials,
        retry: Retry,
    ) -> Result<Database, ExecutionError> {
        let config = credentials.connection_string();

        let attempt = tokio_postgres::connect(&config, NoTls);
        let (client, connection) = tokio::time::timeout(CONNECT_TIMEOUT, attempt)
            .await
            .map_err(|_| ExecutionError {
                problem: "connection timed out".to_string(),
                details: format!("{}:{}", credentials.host, credentials.port),
            })?
            .map_err(|error| ExecutionError {
                problem: "unable to connect".to_string(),
                details: error.to_string(),
            })?;

        tokio::spawn(async move {
            if let Err(error) = connection.await {
                warn!(%error, "connection terminated");
            }
        });

        debug!(host = %credentials.host, "connected");

        Ok(Database { client, retry })
    }

    async fn attempt(&self, sql: &str) -> Result<Table, ExecutionError> {
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|error| ExecutionError {
                problem: "statement failed".to_string(),
                details: error.to_string(),
            })?;

        let mut table = Vec::with_capacity(rows.len());
        for row in &rows {
            table.push(decode::row_to_strings(row)?);
        }

        Ok(table)
    }
}

impl Executor for Database {
    /// Run one statement, retrying on the schedule before giving up. The
    /// result set is fully materialized before returning, so no cursor is
    /// ever held open across groups.
    async fn query(&self, sql: &str) -> Result<Table, ExecutionError> {
        let mut backoffs = self
            .retry
            .backoffs();

        loop {
            match self
                .attempt(sql)
                .await
            {
                Ok(table) => return Ok(table),
                Err(error) => match backoffs.next() {
                    Some(delay) => {
                        warn!(%error, ?delay, "query failed; retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(error),
                },
            }
        }
    }
}
