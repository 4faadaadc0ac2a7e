//! Templates
//!
//! Pure functions from data to rendered fragments, driven by the template
//! definitions embedded with the resource registry.

use crate::resource::registry::{
    targets_resource, HomeTemplateDef, ItemTemplateDef, RowTemplateDef,
};
use crate::resource::{extract_id, extract_json_value};
use serde_json::Value;

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFragment {
    /// Identifier of the record the row was rendered from
    pub id: Option<String>,
    pub cells: Vec<String>,
}

/// A rendered detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFragment {
    pub title: String,
    /// (label, value) pairs in template order
    pub fields: Vec<(String, String)>,
    /// Pretty-printed attributes
    pub json: String,
}

/// Row template
#[derive(Debug, Clone, Copy)]
pub struct RowTemplate {
    def: &'static RowTemplateDef,
    id_field: &'static str,
}

impl RowTemplate {
    pub fn targets() -> Self {
        let resource = targets_resource();
        Self {
            def: &resource.templates.row,
            id_field: &resource.id_field,
        }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.def.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Relative column widths, in percent
    pub fn widths(&self) -> Vec<u16> {
        self.def.columns.iter().map(|c| c.width).collect()
    }

    pub fn render(&self, attributes: &Value) -> RowFragment {
        RowFragment {
            id: extract_id(attributes, self.id_field),
            cells: self
                .def
                .columns
                .iter()
                .map(|col| extract_json_value(attributes, &col.json_path))
                .collect(),
        }
    }
}

/// Home (list) template
#[derive(Debug, Clone, Copy)]
pub struct HomeTemplate {
    def: &'static HomeTemplateDef,
}

impl HomeTemplate {
    pub fn targets() -> Self {
        Self {
            def: &targets_resource().templates.home,
        }
    }

    /// Title with `[shown]`, or `[shown/total]` while a filter hides rows
    pub fn title(&self, shown: usize, total: usize) -> String {
        if shown == total {
            format!(" {}[{}] ", self.def.title, shown)
        } else {
            format!(" {}[{}/{}] ", self.def.title, shown, total)
        }
    }

    pub fn empty_message(&self) -> &'static str {
        &self.def.empty_message
    }

    pub fn no_match_message(&self) -> &'static str {
        &self.def.no_match_message
    }

    pub fn loading_message(&self) -> &'static str {
        &self.def.loading_message
    }
}

/// Item (detail) template
#[derive(Debug, Clone, Copy)]
pub struct ItemTemplate {
    def: &'static ItemTemplateDef,
}

impl ItemTemplate {
    pub fn targets() -> Self {
        Self {
            def: &targets_resource().templates.item,
        }
    }

    /// Render `attributes`; `fallback_title` is used when the title field is absent
    pub fn render(&self, attributes: &Value, fallback_title: &str) -> ItemFragment {
        let title = match extract_json_value(attributes, &self.def.title_field) {
            t if t == "-" || t.is_empty() => fallback_title.to_string(),
            t => t,
        };

        let fields = self
            .def
            .fields
            .iter()
            .map(|f| (f.label.clone(), extract_json_value(attributes, &f.json_path)))
            .collect();

        let json = serde_json::to_string_pretty(attributes).unwrap_or_default();

        ItemFragment {
            title,
            fields,
            json,
        }
    }
}
