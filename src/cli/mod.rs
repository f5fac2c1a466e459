//! CLI module for the deliverables gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Deliverables Gateway - Airtable-backed read facade with an in-process cache
#[derive(Parser)]
#[command(name = "deliverables-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
