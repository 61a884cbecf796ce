use super::super::args::HashPasswordArgs;
use roteiro_cli::exit_codes::SUCCESS;
use roteiro_core::auth::hash_password;

pub fn run(args: HashPasswordArgs) -> anyhow::Result<i32> {
    println!("{}", hash_password(&args.password)?);
    Ok(SUCCESS)
}
