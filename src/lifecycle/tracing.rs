//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup with the configured page size and supersede
//!   policy, shutdown with the final page
//! - **Operations**: every request the actor receives (`LoadPage`, `Create`,
//!   `Update`, `Delete`) and its outcome (`Page loaded`, `Created`, `Deleted`)
//! - **Remote calls**: one span per HTTP call with its arguments
//! - **Errors**: the remote error behind every fixed user-facing failure message
//!
//! ## Usage Examples
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run
//!
//! # Requests with their drafts, discarded superseded pages
//! RUST_LOG=debug cargo run
//!
//! # Only the controller
//! RUST_LOG=user_directory::directory=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create followed by its refetch reads:
//!
//! ```text
//! INFO Created id=11
//! INFO Page loaded page=2 records=5 total_pages=2
//! ```
//!
//! Logs go to stderr so they never interleave with the console's table on stdout.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
