pub mod assets;
pub mod config;
pub mod engine;
pub mod hud;
pub mod logging;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod types;
