mod cli;
mod config;
mod db;
mod hero;
mod khatam;
mod models;
mod schedule;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Times) | None => {
            handlers::handle_times(&conn, &config)?;
        }
        Some(Commands::Hero { watch, interval }) => {
            handlers::handle_hero(&conn, watch, interval)?;
        }
        Some(Commands::Schedule { action }) => {
            handlers::handle_schedule(&conn, &config, &action)?;
        }
        Some(Commands::Khatam { action }) => {
            handlers::handle_khatam(&conn, &config, &action)?;
        }
        Some(Commands::Read { minutes }) => {
            handlers::handle_read(&conn, minutes)?;
        }
        Some(Commands::Stats { week }) => {
            handlers::handle_stats(&conn, week)?;
        }
        Some(Commands::Bookmark { action }) => {
            handlers::handle_bookmark(&conn, &action)?;
        }
        Some(Commands::Config { city, offset, hijri_offset }) => {
            handlers::handle_config(&mut config, city, offset, hijri_offset)?;
        }
    }

    Ok(())
}
