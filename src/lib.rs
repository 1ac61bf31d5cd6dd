//! # Catalog Bus
//!
//! > **A product catalog served over an in-process request/reply bus.**
//!
//! The HTTP layer never touches the store. It turns each request into a
//! command envelope, sends it to a well-known service address, and maps the
//! single reply back to a status code. A dispatcher behind that address is the
//! only code that talks to the store.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why a bus between HTTP and storage?
//!
//! - **Location Transparency**: The producer only knows an address string, never the dispatcher.
//! - **One Reply per Request**: Every command gets exactly one answer or a timeout.
//! - **Swappable Storage**: The dispatcher is generic over [`DocumentStore`](store::DocumentStore).
//!
//! ## 🚀 Core Concepts
//!
//! ### The Envelope
//! Commands are JSON objects with a `command` tag (`FIND_ALL`, `FIND_BY_ID`, `ADD`,
//! `UPDATE`, `DELETE`). Replies are either a command-specific success shape or
//! `{"error": "..."}`. See [`protocol`].
//!
//! ### Mocking: Testing without Pain
//! Both sides of the bus can be tested alone. [`framework::mock`] stands in for the
//! dispatcher when testing the producer; [`store::mock`] stands in for storage when
//! testing the dispatcher.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer defines its own error type (`BusError`, `StoreError`, `DispatchError`,
//! `ClientError`). `#[from]` conversions carry a failure up one layer at a time, and
//! only the producer decides what status code it becomes.
//!
//! ### 2. Concurrency Model
//! The in-memory store is an actor: one task owns the documents and processes
//! requests sequentially. The dispatcher handles each envelope in its own task, so
//! a slow store call never blocks the inbox.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging, plus `tower-http`'s
//! `TraceLayer` for HTTP requests. See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Transport ([`framework`])
//! - **Role**: Address registry and timeout-bounded request/reply.
//! - **Key items**: [`EventBus`](framework::EventBus), [`Message`](framework::Message).
//!
//! ### 2. The Contract ([`protocol`], [`model`])
//! - **Role**: Command and reply envelopes, the product record, and input validation.
//! - **Key items**: [`Command`](protocol::Command), [`Reply`](protocol::Reply), [`Product`](model::Product).
//!
//! ### 3. The Service ([`dispatcher`], [`store`])
//! - **Role**: Demultiplexes commands and runs them against a document store.
//! - **Key items**: [`CommandDispatcher`](dispatcher::CommandDispatcher), [`StoreActor`](store::StoreActor).
//!
//! ### 4. The Interface ([`clients`], [`api`])
//! - **Role**: The producer and the HTTP routes in front of it.
//! - **Key items**: [`ProductClient`](clients::ProductClient), [`build_app`](api::build_app).
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Reads configuration, starts the tasks, and shuts them down in order.
//! - **Key items**: [`CatalogSystem`](lifecycle::CatalogSystem), [`Config`](config::Config).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! AUTH_TOKEN=123 RUST_LOG=info cargo run
//!
//! curl -H 'AuthToken: 123' -H 'Content-Type: application/json' \
//!      -d '{"number":"432","description":"Item 2"}' \
//!      localhost:8080/api/v1/products
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod dispatcher;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod protocol;
pub mod store;
