//! Resource abstraction layer
//!
//! Models and collections backed by the REST service, plus the embedded
//! resource and template definitions they are described by.
//!
//! # Architecture
//!
//! - [`registry`] - Loads resource and template definitions from embedded JSON
//! - [`record`] - Record extraction, display fields, and path lookup
//! - [`deferred`] - Handles on in-flight fetches
//! - [`model`] - The single target model
//! - [`collection`] - The targets collection
//!
//! # Example
//!
//! ```ignore
//! use ttargets::api::client::ApiClient;
//! use ttargets::resource::{Fetchable, TargetCollection};
//!
//! async fn list(client: &ApiClient) -> anyhow::Result<usize> {
//!     let mut targets = TargetCollection::new();
//!     targets.fetch(client).wait().await.map_err(|e| anyhow::anyhow!("{:#}", e))?;
//!     targets.sync();
//!     Ok(targets.len())
//! }
//! ```

pub mod collection;
pub mod deferred;
pub mod model;
pub mod record;
pub mod registry;

pub use collection::TargetCollection;
pub use deferred::{Deferred, FetchResult, FetchState};
pub use model::Target;
pub use record::{
    extract_id, extract_json_value, extract_records, lookup_json_value, post_process_record,
};
pub use registry::*;

use crate::api::client::ApiClient;

/// Something addressable on the REST service that can be fetched
pub trait Fetchable {
    type Output: Clone + Send + Sync + 'static;

    /// Resource path relative to the service root
    fn path(&self) -> String;

    /// Absolute URL on the given client
    fn url(&self, client: &ApiClient) -> String {
        client.url(&self.path())
    }

    /// Issue one fetch and keep its handle
    fn fetch(&mut self, client: &ApiClient) -> Deferred<Self::Output>;
}
