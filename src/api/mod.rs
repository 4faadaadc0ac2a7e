//! REST API interaction module
//!
//! Talks to the ENCODE-style JSON service that serves the targets resource.
//!
//! # Module Structure
//!
//! - [`client`] - Main API client bound to a base URL
//! - [`http`] - HTTP utilities for REST calls and error formatting
//!
//! # Example
//!
//! ```ignore
//! use ttargets::api::client::ApiClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:6543")?;
//!     let targets = client.get("/targets/").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
