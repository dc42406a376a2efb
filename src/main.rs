mod config;
mod duplicates;
mod report;
mod resolve;
mod spotify;
mod types;

use config::Config;
use spotify::SpotifyClient;
use std::io::{self, BufRead, Write};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_dupes=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let reference = match prompt("Enter Spotify playlist URL: ") {
        Ok(line) => line,
        Err(e) => {
            println!("Error: failed to read input: {}", e);
            return;
        }
    };

    let client = SpotifyClient::new(&config);
    let outcome = report::run(&client, &reference).await;
    if let Ok(ref r) = outcome {
        info!("Scanned {} tracks", r.tracks_scanned);
    }
    print!("{}", report::render(&outcome));
}

fn prompt(message: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", message)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
