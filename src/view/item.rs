//! Target detail view

use super::template::{ItemFragment, ItemTemplate};
use super::Renderable;
use crate::api::client::ApiClient;
use crate::resource::{Deferred, FetchState, Target};
use crate::router::Routable;
use anyhow::Result;
use serde_json::Value;

/// Detail page of one target
#[derive(Debug, Clone)]
pub struct TargetItemView {
    model: Target,
    /// The model's fetch handle, captured at construction
    deferred: Option<Deferred<Value>>,
    template: ItemTemplate,
}

impl TargetItemView {
    pub fn new(model: Target) -> Self {
        let deferred = model.deferred().cloned();
        Self {
            model,
            deferred,
            template: ItemTemplate::targets(),
        }
    }

    pub fn model(&self) -> &Target {
        &self.model
    }

    /// Handle to wait on before rendering the detail
    pub fn deferred(&self) -> Option<&Deferred<Value>> {
        self.deferred.as_ref()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.model.fetch_state()
    }

    pub fn sync(&mut self) -> bool {
        self.model.sync()
    }
}

impl Renderable for TargetItemView {
    type Output = ItemFragment;

    fn render(&self) -> ItemFragment {
        let fallback = self.model.id().unwrap_or("-");
        self.template.render(self.model.attributes(), fallback)
    }
}

impl Routable for TargetItemView {
    const ROUTE_NAME: &'static str = "target";

    fn from_route(client: &ApiClient, args: &[String]) -> Result<Self> {
        Ok(Self::new(Target::from_route_args(client, args)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_captures_model_deferred() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();

        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let view = TargetItemView::from_route(&client, &["42".to_string()]).unwrap();

        let own = view.model().deferred().expect("model should be fetching");
        let captured = view.deferred().expect("view should capture the handle");
        assert!(captured.ptr_eq(own));
    }

    #[test]
    fn test_unfetched_model_has_no_handle() {
        let view = TargetItemView::new(Target::new(json!({"id": "1"})));
        assert!(view.deferred().is_none());
        assert_eq!(view.fetch_state(), FetchState::Unfetched);
    }

    #[test]
    fn test_render_uses_id_until_attributes_arrive() {
        let view = TargetItemView::new(Target::with_id("42"));
        let fragment = view.render();
        assert_eq!(fragment.title, "42");
        assert_eq!(fragment.json, "{}");
    }

    #[test]
    fn test_render_after_attributes() {
        let view = TargetItemView::new(Target::new(json!({
            "id": "42",
            "label": "CTCF",
            "organism": {"name": "human"}
        })));
        let fragment = view.render();
        assert_eq!(fragment.title, "CTCF");
        assert!(fragment
            .fields
            .contains(&("Organism".to_string(), "human".to_string())));
    }

    #[test]
    fn test_missing_route_argument_is_an_error() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(TargetItemView::from_route(&client, &[]).is_err());
    }
}
