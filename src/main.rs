#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::Result;
use cass::backend::BackendClient;
use cass::connectivity::Connectivity;
use cass::orchestrator::ChatSession;
use cass::personality::Personality;
use cass::speech::NoopSpeech;
use cass::{CassError, Config, SessionError};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cass", about = "Voice-first conversational assistant client")]
struct Cli {
    /// Path to a config file (defaults to ~/.cass/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting personality.
    #[arg(long, default_value = "friend")]
    personality: Personality,

    /// Probe URL for the connectivity monitor.
    #[arg(long, default_value = "https://www.google.com/generate_204")]
    probe_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let connectivity = Connectivity::new(true);
    let _probe = connectivity.spawn_probe(
        reqwest::Client::new(),
        cli.probe_url,
        Duration::from_secs(15),
    );

    let backend = BackendClient::new(&config, connectivity);
    let session = ChatSession::new(cli.personality, backend, Arc::new(NoopSpeech));

    println!(
        "{}",
        style(format!(
            "CASS ({}) — /personality <friend|mentor|debator>, /quit to exit",
            session.personality()
        ))
        .dim()
    );
    for message in session.transcript() {
        println!("{} {}", style("cass>").cyan().bold(), message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style("you>").green().bold());
        use std::io::Write as _;
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Some(name) = line.strip_prefix("/personality ") {
            match name.trim().parse::<Personality>() {
                Ok(personality) => {
                    let welcome = session.switch_personality(personality);
                    println!("{} {}", style("cass>").cyan().bold(), welcome.content);
                }
                Err(_) => eprintln!("unknown personality: {name}"),
            }
            continue;
        }

        match session.send_message(line).await {
            Ok(reply) => println!("{} {}", style("cass>").cyan().bold(), reply.content),
            Err(CassError::Session(SessionError::Busy)) => {
                eprintln!("still working on the previous message");
            }
            Err(CassError::Session(SessionError::Superseded)) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
