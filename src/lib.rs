//! Two-player Reversi on an 8x8 board: rule engine, turn control and the
//! frame-driven glue a host (native or browser) needs to run a game.

pub mod animation;
pub mod board;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod input;
pub mod session;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::LayoutConfig;
pub use controller::{CommitOutcome, TurnController};
pub use session::{FrameHost, FrameInput, Session};
pub use types::{Cell, Color, Outcome, Phase, Position};
