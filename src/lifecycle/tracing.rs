//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! The service uses a compact format that hides the crate/module prefix (`with_target(false)`).
//! Levels come from `RUST_LOG`; without it everything at `info` and above is shown.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Request lines, dispatcher and store lifecycle (default)
//! RUST_LOG=info cargo run
//!
//! # Every command sent and every store call
//! RUST_LOG=debug cargo run
//!
//! # Only the dispatcher
//! RUST_LOG=catalog_bus::dispatcher=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! With `RUST_LOG=debug` a single `POST /api/v1/products` looks like:
//!
//! ```text
//! DEBUG request{method=POST uri=/api/v1/products}: started processing request
//! DEBUG create:send{command="ADD"}: Sending request
//! DEBUG Dispatching command="ADD"
//! INFO  Inserted id="2c1a..." size=1
//! INFO  Product added id="2c1a..."
//! DEBUG Request completed address="catalog.products" ok=true
//! DEBUG request{method=POST uri=/api/v1/products}: finished processing request status=201
//! ```
//!
//! Business errors (`No items found`) are logged at `debug`, rejected envelopes
//! and timeouts at `warn`, store failures at `error`.
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
