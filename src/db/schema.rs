use anyhow::{Context, Result};
use std::path::Path;

#[cfg(feature = "postgres")]
use sqlx::PgPool;
#[cfg(feature = "postgres")]
use tracing::info;

/// Migrations compiled into the binary, applied when no folder is configured
const EMBEDDED_MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_users.sql",
    include_str!("../../migrations/001_create_users.sql"),
)];

/// A named migration script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: String,
    pub sql: String,
}

/// Migrations from `folder` (every `*.sql` file, by file name) or the
/// embedded set
pub fn load_migrations(folder: Option<&Path>) -> Result<Vec<Migration>> {
    let Some(folder) = folder else {
        return Ok(EMBEDDED_MIGRATIONS
            .iter()
            .map(|(name, sql)| Migration {
                name: name.to_string(),
                sql: sql.to_string(),
            })
            .collect());
    };

    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("Failed to read migrations folder {}", folder.display()))?;

    let mut migrations = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
            continue;
        }

        let sql = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read migration {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        migrations.push(Migration { name, sql });
    }

    migrations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(migrations)
}

#[cfg(feature = "postgres")]
pub async fn run_migrations(pool: &PgPool, folder: Option<&Path>) -> Result<()> {
    info!("Running database migrations...");

    for migration in load_migrations(folder)? {
        for (i, statement) in split_sql_statements(&migration.sql).iter().enumerate() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| {
                    format!(
                        "Failed to execute statement {} of migration {}: {}",
                        i + 1,
                        migration.name,
                        statement_preview(statement)
                    )
                })?;
        }
        info!(migration = %migration.name, "Applied migration");
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// First 100 characters of a statement, for error messages
fn statement_preview(statement: &str) -> String {
    statement.chars().take(100).collect()
}

/// Split a script into statements on trailing semicolons, keeping
/// dollar-quoted bodies intact
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_dollar_quote = false;

    for line in sql.lines() {
        let trimmed = line.trim();

        // Skip comments
        if trimmed.starts_with("--") || (trimmed.is_empty() && current.is_empty()) {
            continue;
        }

        if trimmed.matches("$$").count() % 2 == 1 {
            in_dollar_quote = !in_dollar_quote;
        }

        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') && !in_dollar_quote {
            statements.push(current.trim().to_string());
            current.clear();
        }
    }

    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}
