//! Row view

use super::template::{RowFragment, RowTemplate};
use super::Renderable;
use crate::resource::Target;

/// One target rendered as a table row
#[derive(Debug, Clone, Copy)]
pub struct TargetRowView<'a> {
    model: &'a Target,
    template: RowTemplate,
}

impl<'a> TargetRowView<'a> {
    pub fn new(model: &'a Target) -> Self {
        Self {
            model,
            template: RowTemplate::targets(),
        }
    }

    pub fn model(&self) -> &'a Target {
        self.model
    }
}

impl Renderable for TargetRowView<'_> {
    type Output = RowFragment;

    fn render(&self) -> RowFragment {
        let mut row = self.template.render(self.model.attributes());
        // Models built for navigation know their id before any attributes arrive
        if row.id.is_none() {
            row.id = self.model.id().map(str::to_string);
        }
        row
    }
}
