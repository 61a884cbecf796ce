use roteiro_cli::exit_codes::SUCCESS;

pub fn run() -> anyhow::Result<i32> {
    println!("{}", roteiro_server::schema::sdl());
    Ok(SUCCESS)
}
