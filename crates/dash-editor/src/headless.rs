//! In-memory grid surface.
//!
//! Behaves like an interactive grid without any rendering: it mounts the
//! template's grid items, accepts palette drops as placeholder items, and
//! applies moves/resizes with the column bound and minimum sizes enforced,
//! reporting each gesture as the [`SurfaceEvent`] a real surface would.

use crate::surface::{
    CellHeight, GridSurface, ItemHandle, SurfaceConfig, SurfaceEvent, SurfaceFactory, SurfaceItem,
    SurfaceNode,
};
use dash_core::id::GridItemId;
use dash_core::layout::{CellMetrics, Viewport};
use dash_core::model::{DEFAULT_ITEM_SIZE, Template, WidgetType};

/// Mounts [`HeadlessSurface`]s into a container of a given size.
#[derive(Debug, Clone)]
pub struct HeadlessFactory {
    /// Simulates whether the root element has been rendered yet.
    pub root_present: bool,
    /// Rendered container size handed to new surfaces.
    pub container: Viewport,
    mounts: usize,
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl HeadlessFactory {
    pub fn new(container: Viewport) -> Self {
        Self {
            root_present: true,
            container,
            mounts: 0,
        }
    }

    /// Number of surfaces mounted so far.
    pub fn mounts(&self) -> usize {
        self.mounts
    }
}

impl SurfaceFactory for HeadlessFactory {
    type Surface = HeadlessSurface;

    fn root_present(&self) -> bool {
        self.root_present
    }

    fn mount(&mut self, config: &SurfaceConfig, template: &Template) -> HeadlessSurface {
        self.mounts += 1;
        let mut surface = HeadlessSurface::new(config.clone(), self.container);
        for widget in &template.widgets {
            let g = &widget.grid_item;
            let limits = Limits {
                min_w: g.min_w,
                min_h: g.min_h,
                no_move: g.no_move || g.locked,
                no_resize: g.no_resize || g.locked,
            };
            let (x, y, w, h) = surface.clamp(limits, g.x, g.y, g.w, g.h);
            if (x, w) != (g.x, g.w) {
                log::warn!("grid item {} does not fit {} columns; mounted at x={x} w={w}", g.id, config.columns);
            }
            surface.push(
                SurfaceNode {
                    handle: None,
                    id: Some(g.id),
                    x,
                    y,
                    w,
                    h,
                    widget_type: None,
                },
                limits,
            );
        }
        surface
    }
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    min_w: u32,
    min_h: u32,
    no_move: bool,
    no_resize: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    item: SurfaceItem,
    limits: Limits,
}

/// A mounted in-memory surface.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    config: SurfaceConfig,
    container: Viewport,
    entries: Vec<Entry>,
    next_handle: u64,
    destroyed: bool,
    filled: bool,
}

impl HeadlessSurface {
    pub fn new(config: SurfaceConfig, container: Viewport) -> Self {
        Self {
            config,
            container,
            entries: Vec::new(),
            next_handle: 1,
            destroyed: false,
            filled: false,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether [`GridSurface::fill_parent`] has been applied.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Handle of the live item with grid item id `id`.
    pub fn handle_of(&self, id: GridItemId) -> Option<ItemHandle> {
        self.entries
            .iter()
            .find(|e| e.item.node.id == Some(id))
            .map(|e| e.item.handle)
    }

    /// Handles currently carrying the selection marker.
    pub fn marked(&self) -> Vec<ItemHandle> {
        self.entries
            .iter()
            .filter(|e| e.item.marked)
            .map(|e| e.item.handle)
            .collect()
    }

    fn interactive(&self) -> bool {
        !self.destroyed && !self.config.static_grid
    }

    fn push(&mut self, mut node: SurfaceNode, limits: Limits) -> ItemHandle {
        let handle = ItemHandle(self.next_handle);
        self.next_handle += 1;
        node.handle = Some(handle);
        self.entries.push(Entry {
            item: SurfaceItem {
                handle,
                node,
                marked: false,
            },
            limits,
        });
        handle
    }

    /// Clamp a requested geometry to the column bound and minimum size.
    /// A minimum width larger than the grid yields to the column bound.
    fn clamp(&self, limits: Limits, x: u32, y: u32, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let columns = self.config.columns.max(1);
        let min_w = limits.min_w.clamp(1, columns);
        let w = w.max(min_w).min(columns);
        let h = h.max(limits.min_h).max(1);
        let x = x.min(columns - w);
        (x, y, w, h)
    }

    /// Drop a palette item of `widget_type` at `(x, y)`.
    ///
    /// The surface adds a placeholder item and reports the drop. Returns
    /// `None` when the surface does not accept drops.
    pub fn drop_external(&mut self, widget_type: WidgetType, x: u32, y: u32) -> Option<SurfaceEvent> {
        if !self.interactive() || !self.config.accept_drops {
            return None;
        }
        let limits = Limits {
            min_w: 1,
            min_h: 1,
            no_move: false,
            no_resize: false,
        };
        let (x, y, w, h) = self.clamp(limits, x, y, DEFAULT_ITEM_SIZE, DEFAULT_ITEM_SIZE);
        let node = SurfaceNode {
            handle: None,
            id: None,
            x,
            y,
            w,
            h,
            widget_type: Some(widget_type),
        };
        let handle = self.push(node, limits);
        self.entries
            .iter()
            .find(|e| e.item.handle == handle)
            .map(|e| SurfaceEvent::Dropped(e.item.node.clone()))
    }

    /// Move/resize the item `id` as a single-item gesture.
    pub fn move_item(&mut self, id: GridItemId, x: u32, y: u32, w: u32, h: u32) -> Option<SurfaceEvent> {
        self.move_items(&[(id, x, y, w, h)])
    }

    /// Move/resize several items in one gesture. Items that are unknown,
    /// locked, or left unchanged after clamping are not reported. Returns
    /// `None` when nothing changed.
    pub fn move_items(&mut self, moves: &[(GridItemId, u32, u32, u32, u32)]) -> Option<SurfaceEvent> {
        if !self.interactive() {
            return None;
        }
        let mut changed = Vec::new();
        for &(id, x, y, w, h) in moves {
            let Some(pos) = self.entries.iter().position(|e| e.item.node.id == Some(id)) else {
                continue;
            };
            let limits = self.entries[pos].limits;
            let node = &self.entries[pos].item.node;
            let (x, y) = if limits.no_move { (node.x, node.y) } else { (x, y) };
            let (w, h) = if limits.no_resize { (node.w, node.h) } else { (w, h) };
            let (x, y, w, h) = self.clamp(limits, x, y, w, h);

            let node = &mut self.entries[pos].item.node;
            if (node.x, node.y, node.w, node.h) == (x, y, w, h) {
                continue;
            }
            node.x = x;
            node.y = y;
            node.w = w;
            node.h = h;
            changed.push(node.clone());
        }
        (!changed.is_empty()).then_some(SurfaceEvent::Changed(changed))
    }
}

impl GridSurface for HeadlessSurface {
    fn items(&self) -> Vec<SurfaceItem> {
        self.entries.iter().map(|e| e.item.clone()).collect()
    }

    fn remove_item(&mut self, handle: ItemHandle) {
        self.entries.retain(|e| e.item.handle != handle);
    }

    fn destroy(&mut self, keep_content: bool) {
        self.destroyed = true;
        if !keep_content {
            self.entries.clear();
        }
    }

    fn cell_metrics(&self) -> CellMetrics {
        let square = CellMetrics::square(self.container, self.config.columns);
        match self.config.cell_height {
            CellHeight::Auto => square,
            CellHeight::Fixed(cell_height) => CellMetrics {
                cell_width: square.cell_width,
                cell_height,
            },
        }
    }

    fn set_marked(&mut self, handle: ItemHandle, marked: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.item.handle == handle) {
            entry.item.marked = marked;
        }
    }

    fn fill_parent(&mut self) {
        self.filled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::model::{GridItem, Widget, WidgetConfig};
    use dash_core::WidgetId;

    fn template_with(id: &str, x: u32, w: u32) -> Template {
        let mut t = Template::new(12);
        let mut grid_item = GridItem::for_type(GridItemId::intern(id), &WidgetType::Chart, x, 0);
        grid_item.w = w;
        t.widgets.push(Widget {
            id: WidgetId::intern(&format!("w_{id}")),
            display_name: "Chart #1".into(),
            widget_type: WidgetType::Chart,
            grid_item,
            widget_config: WidgetConfig::default(),
        });
        t
    }

    fn editable(t: &Template) -> HeadlessSurface {
        HeadlessFactory::default().mount(&SurfaceConfig::for_template(t, true), t)
    }

    #[test]
    fn mount_mirrors_template_items() {
        let t = template_with("hl_mount", 3, 2);
        let surface = editable(&t);
        let items = surface.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].node.id, Some(GridItemId::intern("hl_mount")));
        assert_eq!(items[0].node.x, 3);
    }

    #[test]
    fn moves_are_clamped_to_columns_and_min_size() {
        let t = template_with("hl_clamp", 0, 2);
        let mut surface = editable(&t);
        let Some(SurfaceEvent::Changed(nodes)) =
            surface.move_item(GridItemId::intern("hl_clamp"), 11, 1, 1, 5)
        else {
            panic!("expected a change");
        };
        // min width 2 wins over the requested 1, then x is pulled back inside 12 columns
        assert_eq!((nodes[0].x, nodes[0].y, nodes[0].w, nodes[0].h), (10, 1, 2, 5));
    }

    #[test]
    fn unchanged_move_reports_nothing() {
        let t = template_with("hl_same", 0, 2);
        let mut surface = editable(&t);
        assert!(surface.move_item(GridItemId::intern("hl_same"), 0, 0, 2, 2).is_none());
    }

    #[test]
    fn static_surface_rejects_gestures() {
        let t = template_with("hl_static", 0, 2);
        let mut surface = HeadlessFactory::default().mount(&SurfaceConfig::for_template(&t, false), &t);
        assert!(surface.drop_external(WidgetType::Chart, 0, 0).is_none());
        assert!(surface.move_item(GridItemId::intern("hl_static"), 4, 0, 2, 2).is_none());
    }

    #[test]
    fn drop_adds_placeholder() {
        let t = Template::new(12);
        let mut surface = editable(&t);
        let Some(SurfaceEvent::Dropped(node)) = surface.drop_external(WidgetType::Map, 5, 1) else {
            panic!("expected a drop");
        };
        assert!(node.id.is_none());
        assert_eq!(node.widget_type, Some(WidgetType::Map));
        assert_eq!(surface.items().len(), 1);
        surface.remove_item(node.handle.unwrap());
        assert!(surface.items().is_empty());
    }

    #[test]
    fn destroy_detaches_items() {
        let t = template_with("hl_destroy", 0, 2);
        let mut surface = editable(&t);
        surface.destroy(false);
        assert!(surface.is_destroyed());
        assert!(surface.items().is_empty());
    }

    #[test]
    fn mount_pulls_overflowing_items_inside() {
        let mut t = template_with("hl_over", 11, 4);
        t.widgets[0].grid_item.min_w = 4;
        let surface = editable(&t);
        let node = &surface.items()[0].node;
        assert_eq!((node.x, node.w), (8, 4));

        let mut narrow = template_with("hl_narrow", 0, 4);
        narrow.columns = 3;
        narrow.widgets[0].grid_item.min_w = 4;
        let mut surface = editable(&narrow);
        assert_eq!(surface.items()[0].node.w, 3);
        // min width wider than the grid: the column bound wins on moves too
        assert!(surface.move_item(GridItemId::intern("hl_narrow"), 0, 2, 4, 4).is_some());
        assert_eq!(surface.items()[0].node.w, 3);
    }
}
