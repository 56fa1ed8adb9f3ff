//! A terminal arcade of five small board games.
//!
//! Each game is an engine that owns its state, its RNG and its timers; the
//! binary drives whichever one is open with key presses and clock ticks.

pub mod app;
pub mod event;
pub mod games;
pub mod timer;
pub mod ui;
