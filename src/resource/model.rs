//! Target model
//!
//! A single target, addressable at `/targets/{id}`.

use super::deferred::{Deferred, FetchState};
use super::record::{extract_id, extract_json_value, post_process_record};
use super::registry::targets_resource;
use super::Fetchable;
use crate::api::client::ApiClient;
use anyhow::Result;
use serde_json::{Map, Value};

/// One target record
#[derive(Debug, Clone)]
pub struct Target {
    id: Option<String>,
    attributes: Value,
    deferred: Option<Deferred<Value>>,
    applied: bool,
}

impl Target {
    pub const URL_ROOT: &'static str = "/targets/";

    /// Build an unfetched target from a server record
    pub fn new(attributes: Value) -> Self {
        let id = extract_id(&attributes, &targets_resource().id_field);
        Self {
            id,
            attributes,
            deferred: None,
            applied: false,
        }
    }

    /// Build an unfetched target that only knows its id
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            attributes: Value::Object(Map::new()),
            deferred: None,
            applied: false,
        }
    }

    /// Build a target for direct navigation
    ///
    /// The first route argument becomes the id and exactly one fetch is issued.
    pub fn from_route_args(client: &ApiClient, args: &[String]) -> Result<Self> {
        let Some(id) = args.first().filter(|id| !id.is_empty()) else {
            return Err(anyhow::anyhow!("A target id is required"));
        };

        let mut target = Self::with_id(id);
        target.fetch(client);
        Ok(target)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current attributes
    pub fn attributes(&self) -> &Value {
        &self.attributes
    }

    /// Attribute at a dot-notation path, `-` when absent
    pub fn get(&self, path: &str) -> String {
        extract_json_value(&self.attributes, path)
    }

    /// Display name of the target, falling back to its id
    pub fn display_name(&self) -> String {
        let name = self.get(&targets_resource().name_field);
        if name != "-" && !name.is_empty() {
            return name;
        }
        self.id.clone().unwrap_or_else(|| "-".to_string())
    }

    /// Handle on the latest fetch, if one was issued
    pub fn deferred(&self) -> Option<&Deferred<Value>> {
        self.deferred.as_ref()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.deferred
            .as_ref()
            .map(Deferred::state)
            .unwrap_or(FetchState::Unfetched)
    }

    /// Replace the attributes; the id follows the record when it carries one
    pub fn set(&mut self, attributes: Value) {
        if let Some(id) = extract_id(&attributes, &targets_resource().id_field) {
            self.id = Some(id);
        }
        self.attributes = attributes;
    }

    /// Apply a resolved fetch to the attributes
    ///
    /// Returns true when attributes changed during this call.
    pub fn sync(&mut self) -> bool {
        if self.applied {
            return false;
        }

        let resolved = match self.deferred.as_ref().and_then(Deferred::peek) {
            Some(Ok(value)) => value.clone(),
            _ => return false,
        };

        self.set(resolved);
        self.applied = true;
        true
    }
}

impl Fetchable for Target {
    type Output = Value;

    fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("{}{}", Self::URL_ROOT, urlencoding::encode(id)),
            None => Self::URL_ROOT.to_string(),
        }
    }

    fn fetch(&mut self, client: &ApiClient) -> Deferred<Value> {
        let client = client.clone();
        let path = self.path();

        tracing::debug!("Fetching target {}", path);
        let deferred = Deferred::spawn(async move {
            let record = client.get(&path).await?;
            Ok(post_process_record(record))
        });

        self.deferred = Some(deferred.clone());
        self.applied = false;
        deferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_reads_id_from_record() {
        let target = Target::new(json!({"id": "CTCF-human", "label": "CTCF"}));
        assert_eq!(target.id(), Some("CTCF-human"));
        assert_eq!(target.get("label"), "CTCF");
        assert_eq!(target.fetch_state(), FetchState::Unfetched);
    }

    #[test]
    fn test_path_encodes_id() {
        assert_eq!(Target::with_id("42").path(), "/targets/42");
        assert_eq!(Target::with_id("a b/c").path(), "/targets/a%20b%2Fc");
        assert_eq!(Target::new(json!({})).path(), "/targets/");
    }

    #[test]
    fn test_route_args_require_an_id() {
        let client = ApiClient::new("http://localhost:6543").unwrap();
        assert!(Target::from_route_args(&client, &[]).is_err());
        assert!(Target::from_route_args(&client, &[String::new()]).is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(Target::with_id("7").display_name(), "7");
        assert_eq!(
            Target::new(json!({"id": "7", "label": "POLR2A"})).display_name(),
            "POLR2A"
        );
    }

    #[test]
    fn test_sync_applies_resolved_fetch_once() {
        let mut target = Target::with_id("42");
        target.deferred = Some(Deferred::resolved(json!({"id": "42", "label": "EP300"})));

        assert!(target.sync());
        assert_eq!(target.get("label"), "EP300");
        assert!(!target.sync());
    }

    #[test]
    fn test_sync_ignores_rejected_fetch() {
        let mut target = Target::with_id("42");
        target.deferred = Some(Deferred::rejected(anyhow::anyhow!("API request failed: 404")));

        assert!(!target.sync());
        assert_eq!(target.id(), Some("42"));
        assert!(matches!(target.fetch_state(), FetchState::Rejected(_)));
    }

    #[test]
    fn test_from_route_args_issues_fetch() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let target = Target::from_route_args(&client, &["42".to_string()]).unwrap();

        assert_eq!(target.id(), Some("42"));
        assert!(target.deferred().is_some());
        assert_ne!(target.fetch_state(), FetchState::Unfetched);
    }
}
