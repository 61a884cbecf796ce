use super::super::args::SeedArgs;
use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use roteiro_cli::exit_codes::SUCCESS;
use roteiro_cli::seed::{self, GraphqlClient, SeedError};

pub async fn run(args: SeedArgs) -> anyhow::Result<i32> {
    let endpoint = args
        .endpoint
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| SeedError::config("no endpoint; pass --endpoint or set GRAPHQL_ENDPOINT"))?;
    let mut client = GraphqlClient::new(&endpoint)?;

    match (args.token, args.email, args.password) {
        (_, Some(email), Some(password)) => {
            client
                .authenticate(&email, &password)
                .await
                .with_context(|| format!("failed to sign in as {}", email))?;
        }
        (Some(token), _, _) if !token.trim().is_empty() => client = client.with_token(token),
        _ => {
            return Err(SeedError::config(
                "no credentials; pass --token (or TOKEN) or --email with --password",
            )
            .into())
        }
    }

    let cleared = seed::clear(&client).await.context("clearing records failed")?;
    println!("deleted {} records", cleared.total());
    if args.clear_only {
        return Ok(SUCCESS);
    }

    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let filled = seed::fill(&client, &mut rng)
        .await
        .context("creating records failed")?;
    println!(
        "created {} positions, {} tags, {} submissions, {} transitions, {} topics",
        filled.positions, filled.tags, filled.submissions, filled.transitions, filled.topics
    );
    Ok(SUCCESS)
}
