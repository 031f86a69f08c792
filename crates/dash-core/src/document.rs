//! Published-copy wrapper around the current [`Template`].
//!
//! Observers hold `Arc<Template>` snapshots. A published snapshot is never
//! mutated: every change builds a new template and publishes it, so a change
//! is visible both through `Arc::ptr_eq` and through the revision counter.

use crate::id::{GridItemId, WidgetId};
use crate::model::{GridItem, Template, Widget, WidgetConfig, WidgetType};
use std::sync::Arc;

/// The layout document currently being edited.
#[derive(Debug, Clone)]
pub struct LayoutDocument {
    current: Arc<Template>,
    revision: u64,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self::new(Template::default())
    }
}

impl LayoutDocument {
    pub fn new(template: Template) -> Self {
        Self {
            current: Arc::new(template),
            revision: 0,
        }
    }

    /// The currently published template.
    pub fn template(&self) -> &Arc<Template> {
        &self.current
    }

    /// Bumped on every publish.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the template with a new value and publish it.
    pub fn replace(&mut self, template: Template) -> Arc<Template> {
        self.current = Arc::new(template);
        self.revision += 1;
        log::trace!("published template revision {}", self.revision);
        Arc::clone(&self.current)
    }

    /// Copy the current template, apply `f` to the copy, and publish it.
    /// Returns whatever `f` returns alongside the new snapshot.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Template) -> R) -> (R, Arc<Template>) {
        let mut next = Template::clone(&self.current);
        let out = f(&mut next);
        (out, self.replace(next))
    }

    /// Create a widget of `widget_type` at cell `(x, y)` and append it.
    ///
    /// Both the widget id and the grid item id are freshly generated. The
    /// display name is `"<Label> #<n+1>"` where `n` counts existing widgets
    /// of the same type, or `"Widget #<id>"` when the type has no label.
    /// The grid item is fitted to the template's column count.
    pub fn create_widget(&mut self, widget_type: WidgetType, x: u32, y: u32) -> Widget {
        let id = WidgetId::generate();
        let display_name = match widget_type.label() {
            Some(label) => format!(
                "{label} #{}",
                self.current.count_of_type(&widget_type) + 1
            ),
            None => format!("Widget #{id}"),
        };
        let mut grid_item = GridItem::for_type(GridItemId::generate(), &widget_type, x, y);
        grid_item.fit_columns(self.current.columns);
        let widget = Widget {
            id,
            display_name,
            grid_item,
            widget_type,
            widget_config: WidgetConfig::default(),
        };
        log::debug!("creating widget {} ({})", widget.display_name, widget.id);

        let created = widget.clone();
        self.edit(|t| t.widgets.push(widget));
        created
    }

    /// Remove the widget `id` together with its grid item.
    /// Returns the removed widget, or `None` (and publishes nothing) if absent.
    pub fn remove_widget(&mut self, id: WidgetId) -> Option<Widget> {
        let pos = self.current.widgets.iter().position(|w| w.id == id)?;
        let (removed, _) = self.edit(|t| t.widgets.remove(pos));
        log::debug!("removed widget {} ({})", removed.display_name, removed.id);
        Some(removed)
    }
}
