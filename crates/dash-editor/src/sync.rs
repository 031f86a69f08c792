//! Layout surface adapter: grid surface ↔ layout document.
//!
//! The adapter owns the lifecycle of the interactive grid surface and keeps
//! its live items isomorphic to the template's grid items:
//!
//! - **Surface → Document**: a palette drop becomes a new widget (the
//!   surface's own placeholder is removed so the rebuilt surface does not
//!   show it twice); a batch of moved/resized items overwrites the matching
//!   grid items' geometry and is published as one new template.
//!
//! - **Document → Surface**: any template replacement, edit-mode toggle, or
//!   container resize tears the surface down and mounts a fresh one. There
//!   is no partial-update path.

use crate::events::{Notification, Notifications};
use crate::surface::{GridSurface, SurfaceConfig, SurfaceEvent, SurfaceFactory, SurfaceNode};
use dash_core::document::LayoutDocument;
use dash_core::layout::CellMetrics;
use dash_core::model::Template;
use smallvec::smallvec;

/// Owns the surface instance mounted by `F`.
pub struct LayoutAdapter<F: SurfaceFactory> {
    factory: F,
    surface: Option<F::Surface>,
    config: Option<SurfaceConfig>,
    /// Cell size published for background-grid rendering.
    background: Option<CellMetrics>,
}

impl<F: SurfaceFactory> LayoutAdapter<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            surface: None,
            config: None,
            background: None,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        self.surface.as_mut()
    }

    /// Configuration of the mounted surface.
    pub fn config(&self) -> Option<&SurfaceConfig> {
        self.config.as_ref()
    }

    /// Cell size of the mounted surface, for drawing background grid lines.
    pub fn background_cells(&self) -> Option<CellMetrics> {
        self.background
    }

    /// Mount a surface for `template`.
    ///
    /// With `force`, an existing instance is destroyed first; without it an
    /// existing instance is kept as is. When the root element has not been
    /// rendered yet this is a no-op and the caller retries on its next
    /// render pass. Returns whether a new surface was mounted.
    pub fn initialize(&mut self, template: &Template, edit_mode: bool, force: bool) -> bool {
        if !self.factory.root_present() {
            log::debug!("surface root not rendered yet; deferring initialization");
            return false;
        }
        if let Some(existing) = self.surface.as_mut() {
            if !force {
                return false;
            }
            existing.destroy(false);
        }

        let config = SurfaceConfig::for_template(template, edit_mode);
        log::debug!(
            "mounting grid surface: {} columns, {} widgets, edit_mode={edit_mode}",
            config.columns,
            template.widgets.len()
        );
        let mut surface = self.factory.mount(&config, template);
        self.background = Some(surface.cell_metrics());
        surface.fill_parent();

        self.surface = Some(surface);
        self.config = Some(config);
        true
    }

    /// Destroy the mounted surface, if any.
    pub fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy(false);
        }
        self.config = None;
        self.background = None;
    }

    /// Dispatch a native surface event.
    pub fn handle_event(&mut self, doc: &mut LayoutDocument, event: SurfaceEvent) -> Notifications {
        match event {
            SurfaceEvent::Dropped(node) => self.on_dropped(doc, node),
            SurfaceEvent::Changed(nodes) => self.on_changed(doc, &nodes),
        }
    }

    /// A palette item was dropped: drop the surface placeholder, then create
    /// the widget in the document.
    pub fn on_dropped(&mut self, doc: &mut LayoutDocument, mut node: SurfaceNode) -> Notifications {
        if let (Some(surface), Some(handle)) = (self.surface.as_mut(), node.handle) {
            surface.remove_item(handle);
        }
        let Some(widget_type) = node.widget_type.clone() else {
            log::warn!("dropped item at ({}, {}) carries no widget type; ignoring", node.x, node.y);
            return Notifications::new();
        };
        let widget = doc.create_widget(widget_type, node.x, node.y);
        node.id = Some(widget.grid_item.id);
        smallvec![Notification::Dropped { node, widget }]
    }

    /// Items were moved/resized: copy each node's geometry onto the grid
    /// item with the same id and publish the batch as one template.
    ///
    /// Only `x, y, w, h` are written; ids, minimum sizes and lock flags stay
    /// as they are. Nodes without a matching widget are surface bookkeeping
    /// and are skipped.
    pub fn on_changed(&mut self, doc: &mut LayoutDocument, nodes: &[SurfaceNode]) -> Notifications {
        let (matched, template) = doc.edit(|t| {
            let mut matched = 0usize;
            for node in nodes {
                let Some(id) = node.id else { continue };
                if let Some(widget) = t.widget_by_grid_item_mut(id) {
                    let item = &mut widget.grid_item;
                    item.x = node.x;
                    item.y = node.y;
                    item.w = node.w;
                    item.h = node.h;
                    matched += 1;
                }
            }
            matched
        });
        log::debug!("applied geometry of {matched}/{} changed nodes", nodes.len());
        smallvec![Notification::Changed { template }]
    }
}

impl<F: SurfaceFactory> Drop for LayoutAdapter<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}
