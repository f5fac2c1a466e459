//! Airtable REST integration

mod client;

pub use client::AirtableClient;
