use super::super::args::ServeArgs;
use anyhow::Context;
use roteiro_cli::exit_codes::SUCCESS;
use roteiro_core::auth::{AuthConfig, TokenAuthority};
use roteiro_core::config::ServerConfig;
use roteiro_core::Store;
use std::time::Duration;

pub async fn run(args: ServeArgs) -> anyhow::Result<i32> {
    let (config, auth) = resolve(args)?;
    tracing::info!(
        database = %config.database.display(),
        sql_debug = config.debug,
        token_ttl_secs = auth.token_ttl.as_secs(),
        "starting roteiro"
    );

    let store = Store::open(&config.database)
        .and_then(|store| store.with_sql_debug(config.debug))
        .with_context(|| format!("failed to open database {}", config.database.display()))?;
    store.init_schema().context("failed to initialise schema")?;

    let schema = roteiro_server::build_schema(store, TokenAuthority::new(&auth));
    roteiro_server::serve(config.bind, roteiro_server::router(schema))
        .await
        .with_context(|| format!("server on {} failed", config.bind))?;
    Ok(SUCCESS)
}

/// Environment first, then explicit flags on top.
fn resolve(args: ServeArgs) -> anyhow::Result<(ServerConfig, AuthConfig)> {
    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(database) = args.database {
        config.database = database;
    }
    config.debug |= args.debug;

    let mut auth = AuthConfig::from_env().context("APP_SECRET must be set")?;
    if let Some(secs) = args.token_ttl_secs.filter(|s| *s > 0) {
        auth = auth.with_token_ttl(Duration::from_secs(secs));
    }
    Ok((config, auth))
}
