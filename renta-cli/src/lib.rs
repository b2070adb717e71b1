pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod shell;
pub mod state;
pub mod view;
