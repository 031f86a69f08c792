//! Single-selection state machine.
//!
//! At most one widget is selected. The selected widget's surface item
//! carries the visual-selection marker; every other item is unmarked
//! before a marker is applied, so two items are never marked at once.

use crate::events::{Notification, Notifications};
use crate::surface::GridSurface;
use dash_core::id::{GridItemId, WidgetId};
use dash_core::model::{Template, Widget};

/// Remove the selection marker from every live item.
fn unmark_all<S: GridSurface + ?Sized>(surface: &mut S) {
    for item in surface.items() {
        if item.marked {
            surface.set_marked(item.handle, false);
        }
    }
}

/// Mark only the live item whose id is `id`. Returns whether it was found.
fn mark_only<S: GridSurface + ?Sized>(surface: &mut S, id: GridItemId) -> bool {
    unmark_all(surface);
    let found = surface.items().into_iter().find(|item| item.node.id == Some(id));
    match found {
        Some(item) => {
            surface.set_marked(item.handle, true);
            true
        }
        None => false,
    }
}

/// Tracks which widget, if any, is selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    /// Snapshot of the selected widget, carried by `deselected`.
    selected: Option<Widget>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Widget> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<WidgetId> {
        self.selected.as_ref().map(|w| w.id)
    }

    pub fn is_selected(&self, id: WidgetId) -> bool {
        self.selected_id() == Some(id)
    }

    /// Select `widget`. A different previous selection is deselected first.
    pub fn select<S: GridSurface + ?Sized>(
        &mut self,
        widget: &Widget,
        surface: Option<&mut S>,
    ) -> Notifications {
        let mut notes = Notifications::new();
        if let Some(previous) = self.selected.take_if(|prev| prev.id != widget.id) {
            notes.push(Notification::Deselected(Some(previous)));
        }
        if let Some(surface) = surface
            && !mark_only(surface, widget.grid_item.id)
        {
            log::debug!("no live item for grid item {}; selection left unmarked", widget.grid_item.id);
        }
        self.selected = Some(widget.clone());
        notes.push(Notification::Selected(widget.clone()));
        notes
    }

    /// Release the selection. No-op when nothing is selected.
    pub fn clear<S: GridSurface + ?Sized>(&mut self, surface: Option<&mut S>) -> Notifications {
        let mut notes = Notifications::new();
        if let Some(previous) = self.selected.take() {
            if let Some(surface) = surface {
                unmark_all(surface);
            }
            notes.push(Notification::Deselected(Some(previous)));
        }
        notes
    }

    /// A surface item was clicked. Ignored outside edit mode.
    ///
    /// Clicking the selected widget's item deselects it; clicking another
    /// item selects the widget owning it.
    pub fn click<S: GridSurface + ?Sized>(
        &mut self,
        grid_item: GridItemId,
        template: &Template,
        edit_mode: bool,
        surface: Option<&mut S>,
    ) -> Notifications {
        if !edit_mode {
            return Notifications::new();
        }
        if self.selected.as_ref().map(|w| w.grid_item.id) == Some(grid_item) {
            return self.clear(surface);
        }
        match template.widget_by_grid_item(grid_item) {
            Some(widget) => self.select(widget, surface),
            None => {
                log::debug!("click on grid item {grid_item} with no owning widget");
                Notifications::new()
            }
        }
    }

    /// Reconcile with a newly published template and a freshly mounted
    /// surface: refresh the selected snapshot and re-apply its marker, or
    /// release the selection if its widget no longer exists.
    pub fn reconcile<S: GridSurface + ?Sized>(
        &mut self,
        template: &Template,
        surface: Option<&mut S>,
    ) -> Notifications {
        let Some(id) = self.selected_id() else {
            return Notifications::new();
        };
        match template.widget(id) {
            Some(widget) => {
                if let Some(surface) = surface {
                    mark_only(surface, widget.grid_item.id);
                }
                self.selected = Some(widget.clone());
                Notifications::new()
            }
            None => self.clear(surface),
        }
    }
}
