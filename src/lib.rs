pub mod board;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod players;
pub mod protocol;
pub mod random;
pub mod registry;
pub mod server;
pub mod snapshot;
