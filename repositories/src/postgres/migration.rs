use crate::postgres::RepoMigrationErr;
use error_stack::{Report, ResultExt};
use tokio_postgres::Client;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    // need to force recompilation of this (add a line or whitespace and build/run again, or run cargo clean
    embed_migrations!("./src/postgres/migrations");
}

pub async fn run(client: &mut Client) -> Result<(), Report<RepoMigrationErr>> {
    let report = embedded::migrations::runner()
        .run_async(client)
        .await
        .change_context(RepoMigrationErr)?;

    for migration in report.applied_migrations() {
        debug!("applied migration {migration}");
    }
    Ok(())
}
