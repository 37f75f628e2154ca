//! One-shot schema bootstrap run before the listener starts.
//!
//! The script is split on `;` and executed in order over a single connection.
//! The first failing statement stops the run; earlier statements stay applied.

use std::path::{Path, PathBuf};
use std::time::Instant;

use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read DDL script {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not acquire a connection for schema init: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("DDL statement #{index} failed: {source}")]
    Statement {
        /// 1-based position of the failing statement in the script.
        index: usize,
        #[source]
        source: sqlx::Error,
    },
}

pub async fn load_ddl(path: &Path) -> Result<String, SchemaError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Split a script into executable statements. `--` comment lines and empty
/// fragments are dropped. A `;` inside a string literal is not understood.
pub fn split_statements(ddl: &str) -> Vec<String> {
    let without_comments: String = ddl
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(str::to_string)
        .collect()
}

/// Execute every statement of `ddl` in order. Returns how many ran.
pub async fn init_schema(pool: &PgPool, ddl: &str) -> Result<usize, SchemaError> {
    let statements = split_statements(ddl);
    let start = Instant::now();

    let mut conn = pool.acquire().await.map_err(SchemaError::Connection)?;

    for (i, statement) in statements.iter().enumerate() {
        debug!(index = i + 1, "Executing DDL statement");
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|source| SchemaError::Statement {
                index: i + 1,
                source,
            })?;
    }

    info!(
        statements = statements.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Schema initialised"
    );
    Ok(statements.len())
}
