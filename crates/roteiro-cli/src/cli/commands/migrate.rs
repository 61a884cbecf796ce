use super::super::args::MigrateArgs;
use anyhow::Context;
use roteiro_cli::exit_codes::SUCCESS;
use roteiro_core::config::ServerConfig;
use roteiro_core::Store;

pub fn run(args: MigrateArgs) -> anyhow::Result<i32> {
    let database = match args.database {
        Some(path) => path,
        None => ServerConfig::from_env()?.database,
    };

    let store = Store::open(&database)
        .with_context(|| format!("failed to open database {}", database.display()))?;
    store.init_schema().context("failed to apply schema")?;

    tracing::info!(database = %database.display(), "schema up to date");
    Ok(SUCCESS)
}
