use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roteiro",
    version,
    about = "Grappling notebook backend: GraphQL API, schema migration and demo data"
)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "ROTEIRO_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the GraphQL server
    Serve(ServeArgs),
    /// Create the database schema if it does not exist
    Migrate(MigrateArgs),
    /// Clear and refill demo data through a running server
    Seed(SeedArgs),
    /// Print the GraphQL schema definition
    Schema,
    /// Hash a password the way sign-up does
    HashPassword(HashPasswordArgs),
    Version,
}

/// Unset options fall back to `ROTEIRO_BIND`, `ROTEIRO_DATABASE`,
/// `ROTEIRO_DEBUG`, `APP_SECRET` and `ROTEIRO_TOKEN_TTL_SECS`.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to listen on [default: 0.0.0.0:4000]
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// SQLite database file [default: roteiro.db]
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Log every SQL statement
    #[arg(long)]
    pub debug: bool,

    /// Bearer token lifetime in seconds
    #[arg(long)]
    pub token_ttl_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// SQLite database file [default: $ROTEIRO_DATABASE or roteiro.db]
    #[arg(long)]
    pub database: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// GraphQL endpoint of a running server
    #[arg(long, env = "GRAPHQL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token of the user to seed
    #[arg(long, env = "TOKEN", hide_env_values = true, conflicts_with = "email")]
    pub token: Option<String>,

    /// Sign in with this email instead of passing a token
    #[arg(long, requires = "password")]
    pub email: Option<String>,

    #[arg(long, env = "ROTEIRO_SEED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Only delete existing records
    #[arg(long)]
    pub clear_only: bool,

    /// Seed for the random generator, for reproducible data
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_token_and_email_conflict() {
        let res = Cli::try_parse_from([
            "roteiro", "seed", "--token", "t", "--email", "a@b.com", "--password", "pw",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "roteiro",
            "--log-format",
            "json",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Serve(args) = cli.cmd else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, Some("127.0.0.1:8080".parse().unwrap()));
        assert!(args.debug);
        assert!(args.database.is_none());
    }
}
