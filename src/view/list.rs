//! Targets home view
//!
//! The sortable, filterable table of every target, one row view per model.

use super::row::TargetRowView;
use super::table::{TableFilter, TableSorter};
use super::template::{HomeTemplate, RowFragment, RowTemplate};
use super::Renderable;
use crate::api::client::ApiClient;
use crate::resource::{FetchState, Fetchable, TargetCollection};
use crate::router::Routable;
use anyhow::Result;

/// Rendered home table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFragment {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub widths: Vec<u16>,
    pub rows: Vec<RowFragment>,
    /// Models in the collection, before filtering
    pub total: usize,
    /// Shown instead of rows while loading, when empty, or on failure
    pub message: Option<String>,
}

/// Home view over a target collection
#[derive(Debug, Clone)]
pub struct TargetListView {
    collection: TargetCollection,
    template: HomeTemplate,
    row_template: RowTemplate,
    pub filter: TableFilter,
    pub sorter: TableSorter,
}

impl TargetListView {
    pub fn new(collection: TargetCollection) -> Self {
        Self {
            collection,
            template: HomeTemplate::targets(),
            row_template: RowTemplate::targets(),
            filter: TableFilter::default(),
            sorter: TableSorter::default(),
        }
    }

    pub fn collection(&self) -> &TargetCollection {
        &self.collection
    }

    pub fn fetch_state(&self) -> FetchState {
        self.collection.fetch_state()
    }

    /// Pull a resolved fetch into the collection
    pub fn sync(&mut self) -> bool {
        self.collection.sync()
    }

    /// One row view per model, in collection order
    pub fn row_views(&self) -> Vec<TargetRowView<'_>> {
        self.collection.models().iter().map(TargetRowView::new).collect()
    }

    /// Columns of the row template
    pub fn column_count(&self) -> usize {
        self.row_template.headers().len()
    }

    fn status_message(&self, shown: usize, total: usize) -> Option<String> {
        match self.fetch_state() {
            FetchState::Pending => Some(self.template.loading_message().to_string()),
            FetchState::Rejected(msg) => Some(msg),
            _ if shown == 0 && total > 0 => Some(self.template.no_match_message().to_string()),
            _ if shown == 0 => Some(self.template.empty_message().to_string()),
            _ => None,
        }
    }
}

impl Renderable for TargetListView {
    type Output = ListFragment;

    fn render(&self) -> ListFragment {
        let mut rows: Vec<RowFragment> = self
            .row_views()
            .iter()
            .map(|row| row.render())
            .filter(|row| self.filter.matches(&row.cells))
            .collect();
        self.sorter.apply(&mut rows);

        let total = self.collection.len();
        ListFragment {
            title: self.template.title(rows.len(), total),
            headers: self.row_template.headers(),
            widths: self.row_template.widths(),
            message: self.status_message(rows.len(), total),
            rows,
            total,
        }
    }
}

impl Routable for TargetListView {
    const ROUTE_NAME: &'static str = "targets";

    fn from_route(client: &ApiClient, _args: &[String]) -> Result<Self> {
        let mut collection = TargetCollection::new();
        collection.fetch(client);
        Ok(Self::new(collection))
    }
}
