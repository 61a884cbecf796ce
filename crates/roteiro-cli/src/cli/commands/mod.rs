use super::args::*;

pub mod hash_password;
pub mod migrate;
pub mod schema;
pub mod seed;
pub mod serve;

use roteiro_cli::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Serve(args) => serve::run(args).await,
        Command::Migrate(args) => migrate::run(args),
        Command::Seed(args) => seed::run(args).await,
        Command::Schema => schema::run(),
        Command::HashPassword(args) => hash_password::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
