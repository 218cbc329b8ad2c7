use std::time::Duration;

use chess_tourney::client::Client;
use chess_tourney::config::Config;
use chess_tourney::players::{RandomPlayer, Seat};
use tracing_subscriber::EnvFilter;

const POLL: Duration = Duration::from_secs(1);
const MAX_PLIES: usize = 500;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let name = match std::env::args().nth(1) {
        Some(name) => name,
        None => format!("random-{:08x}", rand::random::<u32>()),
    };

    let client = Client::new(config.connect_addr());
    tracing::info!(addr = client.addr(), %name, "connecting");
    let mut seat = Seat::register(client, &name, RandomPlayer::new()).await?;
    let game = seat.join().await?;
    tracing::info!(%game, "joined");

    let status = seat.play(POLL, MAX_PLIES).await?;
    eprintln!("{name} left game {game}: {status}");
    Ok(())
}
