//! Target collection
//!
//! The ordered list of targets served at `/targets/`.

use super::deferred::{Deferred, FetchState};
use super::model::Target;
use super::record::extract_records;
use super::registry::targets_resource;
use super::Fetchable;
use crate::api::client::ApiClient;
use serde_json::Value;

/// Ordered targets, in response order
#[derive(Debug, Clone, Default)]
pub struct TargetCollection {
    models: Vec<Target>,
    deferred: Option<Deferred<Vec<Value>>>,
    applied: bool,
}

impl TargetCollection {
    pub const URL: &'static str = "/targets/";

    /// An empty, unfetched collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a collection response into records, one per target
    pub fn parse(response: &Value) -> Vec<Value> {
        extract_records(response, targets_resource())
    }

    /// Replace membership with one model per record
    pub fn reset(&mut self, records: Vec<Value>) {
        self.models = records.into_iter().map(Target::new).collect();
    }

    pub fn models(&self) -> &[Target] {
        &self.models
    }

    pub fn get(&self, index: usize) -> Option<&Target> {
        self.models.get(index)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn deferred(&self) -> Option<&Deferred<Vec<Value>>> {
        self.deferred.as_ref()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.deferred
            .as_ref()
            .map(Deferred::state)
            .unwrap_or(FetchState::Unfetched)
    }

    /// Apply a resolved fetch to the membership
    ///
    /// Returns true when membership changed during this call.
    pub fn sync(&mut self) -> bool {
        if self.applied {
            return false;
        }

        let records = match self.deferred.as_ref().and_then(Deferred::peek) {
            Some(Ok(records)) => records.clone(),
            _ => return false,
        };

        tracing::debug!("Collection resolved with {} targets", records.len());
        self.reset(records);
        self.applied = true;
        true
    }
}

impl Fetchable for TargetCollection {
    type Output = Vec<Value>;

    fn path(&self) -> String {
        Self::URL.to_string()
    }

    fn fetch(&mut self, client: &ApiClient) -> Deferred<Vec<Value>> {
        let client = client.clone();
        let path = self.path();

        tracing::debug!("Fetching collection {}", path);
        let deferred = Deferred::spawn(async move {
            let response = client.get(&path).await?;
            Ok(Self::parse(&response))
        });

        self.deferred = Some(deferred.clone());
        self.applied = false;
        deferred
    }
}

impl FromIterator<Target> for TargetCollection {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}
