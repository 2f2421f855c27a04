pub mod apps;
pub mod cmds;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod hal;
pub mod term;
