use std::io::{self, Write};

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use brawl_stats::brawlstars::{battlelog, BrawlStarsError, PlayerTag};
use brawl_stats::report;
use brawl_stats::settings::Settings;

fn read_player_tag() -> io::Result<PlayerTag> {
    print!("{}", report::PROMPT);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PlayerTag::new(&input))
}

fn main() {
    dotenv::dotenv().ok();

    // Set up logging, stdout is reserved for the report
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to start the logger");

    let settings = Settings::from_env();

    println!("{}", report::header());
    let tag = match read_player_tag() {
        Ok(tag) => tag,
        Err(why) => {
            println!("{}", report::error(&BrawlStarsError::Unexpected(why.to_string())));
            return;
        }
    };
    println!("{}", report::querying(&tag));

    match battlelog::fetch_summary(&settings, &tag) {
        Ok(summary) => println!("{}", report::summary(&tag, &summary)),
        Err(why) => {
            tracing::debug!("Request failed: {:?}", why);
            println!("{}", report::error(&why));
        }
    }
}
