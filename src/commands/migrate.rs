//! Migration management command.

use crate::cli::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::db::Database;

pub async fn run(args: MigrateArgs, config: Config) -> AppResult<()> {
    let database = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            database.run_migrations().await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            database.rollback_migration().await?;
            tracing::info!("Rolled back last migration");
        }
        MigrateAction::Fresh => {
            database.fresh_migrations().await?;
            tracing::info!("Database reset and migrations re-applied");
        }
        MigrateAction::Status => {
            for (name, applied) in database.migration_status().await? {
                let marker = if applied { "applied" } else { "pending" };
                println!("{:<60} {}", name, marker);
            }
        }
    }

    Ok(())
}
