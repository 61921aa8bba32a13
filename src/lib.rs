pub mod app;
pub mod command;
pub mod config;
pub mod console;
pub mod data;
pub mod error;
pub mod refresh;
pub mod session;
pub mod ui;
