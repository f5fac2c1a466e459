//! Request middleware and extractors

mod webhook_auth;

pub use webhook_auth::{RequireWebhookSecret, WEBHOOK_SECRET_HEADER};
