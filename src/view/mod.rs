//! Views over targets
//!
//! - [`template`] - The home, row and item templates
//! - [`table`] - Filtering and sorting collaborators for tables
//! - [`row`] - One target as a table row
//! - [`list`] - The targets home table (`targets` route)
//! - [`item`] - One target's detail page (`target` route)

pub mod item;
pub mod list;
pub mod row;
pub mod table;
pub mod template;

pub use item::TargetItemView;
pub use list::{ListFragment, TargetListView};
pub use row::TargetRowView;
pub use table::{TableFilter, TableSorter};
pub use template::{ItemFragment, RowFragment};

use crate::resource::FetchState;

/// Something that renders a fragment from its current data
pub trait Renderable {
    type Output;

    fn render(&self) -> Self::Output;
}

/// The top-level view bound to the current route
#[derive(Debug, Clone)]
pub enum ActiveView {
    List(TargetListView),
    Item(TargetItemView),
}

impl ActiveView {
    pub fn fetch_state(&self) -> FetchState {
        match self {
            ActiveView::List(view) => view.fetch_state(),
            ActiveView::Item(view) => view.fetch_state(),
        }
    }

    /// Apply a resolved fetch to the bound model or collection
    pub fn sync(&mut self) -> bool {
        match self {
            ActiveView::List(view) => view.sync(),
            ActiveView::Item(view) => view.sync(),
        }
    }
}

impl From<TargetListView> for ActiveView {
    fn from(view: TargetListView) -> Self {
        ActiveView::List(view)
    }
}

impl From<TargetItemView> for ActiveView {
    fn from(view: TargetItemView) -> Self {
        ActiveView::Item(view)
    }
}
