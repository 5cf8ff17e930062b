//! Falling-block puzzle core
//!
//! Pieces, board, collision, scoring and the per-frame session controller live
//! here. The terminal front end in `main.rs` only feeds [`game::InputIntent`]s
//! in and draws [`game::Snapshot`]s out.

pub mod board;
pub mod collision;
pub mod game;
pub mod input;
pub mod piece;
pub mod randomizer;
pub mod rules;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod ui;
