//! A character-cell game engine scripted in Lua.
//!
//! A game is a directory holding a `main.lua`.  The engine runs it against a
//! fixed grid of glyph cells, renders the grid with wgpu and reloads the
//! script whenever it changes on disk.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod palette;
pub mod reload;
pub mod renderer;
pub mod script;
pub mod state;
pub mod window;

pub use error::{Error, Result};
