mod app;
mod commands;
mod effects;
mod persistence;
mod ui;

pub use app::run;
