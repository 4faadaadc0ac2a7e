//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the resource and template definitions from embedded
//! JSON and provides lookup functions for the rest of the application.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/targets.json")];

/// Key of the targets resource
pub const TARGETS: &str = "targets";

/// Column definition for the row template
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
}

/// Field definition for the item template
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub label: String,
    pub json_path: String,
}

/// Home (list) template
#[derive(Debug, Clone, Deserialize)]
pub struct HomeTemplateDef {
    pub title: String,
    pub empty_message: String,
    /// Shown when a filter hides every row
    #[serde(default = "default_no_match_message")]
    pub no_match_message: String,
    #[serde(default = "default_loading_message")]
    pub loading_message: String,
}

fn default_no_match_message() -> String {
    "No rows match the filter".to_string()
}

fn default_loading_message() -> String {
    "Loading...".to_string()
}

/// Row template
#[derive(Debug, Clone, Deserialize)]
pub struct RowTemplateDef {
    pub columns: Vec<ColumnDef>,
}

/// Item (detail) template
#[derive(Debug, Clone, Deserialize)]
pub struct ItemTemplateDef {
    pub title_field: String,
    pub fields: Vec<FieldDef>,
}

/// The three template sources of a resource
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesDef {
    pub home: HomeTemplateDef,
    pub row: RowTemplateDef,
    pub item: ItemTemplateDef,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub url_root: String,
    /// Where records sit when the collection response is an object
    #[serde(default)]
    pub response_path: String,
    pub id_field: String,
    pub name_field: String,
    pub templates: TemplatesDef,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Definition of the targets resource
///
/// The embedded file always carries it; a missing entry is a build defect.
pub fn targets_resource() -> &'static ResourceDef {
    get_resource(TARGETS)
        .unwrap_or_else(|| panic!("Embedded resource JSON has no '{}' entry", TARGETS))
}
