use std::sync::Arc;

use chess_tourney::dispatch::Dispatcher;
use chess_tourney::game::Outcome;
use chess_tourney::piece::Color;
use chess_tourney::players::{RandomPlayer, Seat, TurnResult};
use chess_tourney::registry::Registry;
use tracing_subscriber::EnvFilter;

const MAX_PLIES: usize = 200;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let seed: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => rand::random(),
    };

    let registry = Arc::new(Registry::new());
    let dispatcher = Dispatcher::new(registry.clone());
    let mut first = Seat::register(dispatcher.clone(), "random-1", RandomPlayer::seeded(seed)).await?;
    let mut second =
        Seat::register(dispatcher, "random-2", RandomPlayer::seeded(seed.wrapping_add(1))).await?;
    let game = first.join().await?;
    second.join().await?;

    let mut ply_count = 0;
    let mut stuck = None;
    'play: while ply_count < MAX_PLIES {
        for seat in [&mut first, &mut second] {
            match seat.take_turn().await? {
                TurnResult::Played(..) => ply_count += 1,
                TurnResult::Waiting => {}
                TurnResult::NoPly => {
                    stuck = Some(seat.state().await?.you_are);
                    break 'play;
                }
                TurnResult::Finished(_) => break 'play,
            }
        }
    }

    // A side without a ply loses; running out of plies is a draw
    let outcome = match stuck {
        Some(Color::White) => Outcome::BlackWon,
        Some(Color::Black) => Outcome::WhiteWon,
        None => Outcome::Drawn,
    };
    registry.conclude_game(game, outcome)?;

    let view = first.state().await?;
    println!("{}", view.board);
    eprintln!(
        "Game over after {ply_count} plies (seed {seed}): {}",
        registry.get_status(game)?
    );
    Ok(())
}
