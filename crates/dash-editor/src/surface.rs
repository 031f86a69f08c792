//! Capability interface of the interactive grid surface.
//!
//! The surface renders draggable/resizable boxes and reports the user's
//! gestures. It is an external collaborator: the engine only talks to it
//! through [`GridSurface`] and mounts it through [`SurfaceFactory`], so a
//! real binding and the in-memory [`HeadlessSurface`](crate::headless::HeadlessSurface)
//! are interchangeable.
//!
//! Gesture events are delivered by the host, which forwards the surface's
//! native callbacks as [`SurfaceEvent`]s to the adapter.

use dash_core::id::GridItemId;
use dash_core::layout::CellMetrics;
use dash_core::model::{Template, WidgetType};

/// Opaque handle of a live item on the surface. Only meaningful for the
/// surface instance that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(pub u64);

/// Which edges of an item carry resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandles {
    None,
    All,
}

/// How the surface derives its cell height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellHeight {
    /// Square cells: height follows the computed cell width.
    Auto,
    Fixed(f32),
}

/// Construction parameters for a surface instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub columns: u32,
    /// Accept items dragged in from an external palette.
    pub accept_drops: bool,
    /// Non-interactive: no dragging, resizing or dropping.
    pub static_grid: bool,
    /// Uniform gap around every item, in pixels.
    pub margin: f32,
    pub resize_handles: ResizeHandles,
    /// Let items stay where they are dropped instead of settling upward.
    pub float: bool,
    pub animate: bool,
    pub cell_height: CellHeight,
    pub disable_one_column_mode: bool,
}

impl SurfaceConfig {
    /// Configuration for `template`, interactive when `edit_mode` is set.
    pub fn for_template(template: &Template, edit_mode: bool) -> Self {
        Self {
            columns: template.columns,
            accept_drops: edit_mode,
            static_grid: !edit_mode,
            margin: 4.0,
            resize_handles: if edit_mode {
                ResizeHandles::All
            } else {
                ResizeHandles::None
            },
            float: true,
            animate: true,
            cell_height: CellHeight::Auto,
            disable_one_column_mode: true,
        }
    }
}

/// Geometry of a surface item as the surface reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceNode {
    /// Live handle, when the node is (or was) mounted on the surface.
    pub handle: Option<ItemHandle>,
    /// Grid item id; `None` for transient drop placeholders.
    pub id: Option<GridItemId>,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Type carried by a palette item being dropped.
    pub widget_type: Option<WidgetType>,
}

/// A live item currently mounted on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceItem {
    pub handle: ItemHandle,
    pub node: SurfaceNode,
    /// Whether the visual-selection marker is applied.
    pub marked: bool,
}

/// Native gesture events of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// An external palette item was dropped onto the grid.
    Dropped(SurfaceNode),
    /// One or more items were moved or resized in a single gesture.
    Changed(Vec<SurfaceNode>),
}

/// Operations the engine needs from a mounted surface instance.
pub trait GridSurface {
    /// All live items, in surface order.
    fn items(&self) -> Vec<SurfaceItem>;

    /// Remove a live item from the surface only.
    fn remove_item(&mut self, handle: ItemHandle);

    /// Tear the instance down. With `keep_content` false the rendered items
    /// are detached too; document data is never touched.
    fn destroy(&mut self, keep_content: bool);

    /// Current effective cell size in pixels.
    fn cell_metrics(&self) -> CellMetrics;

    /// Apply or remove the visual-selection marker on one item.
    fn set_marked(&mut self, handle: ItemHandle, marked: bool);

    /// Stretch the surface container to fill its parent.
    fn fill_parent(&mut self);
}

/// Mounts surface instances onto the host's root element.
pub trait SurfaceFactory {
    type Surface: GridSurface;

    /// Whether the root element the surface mounts on has been rendered.
    fn root_present(&self) -> bool;

    /// Construct a surface showing every grid item of `template`.
    fn mount(&mut self, config: &SurfaceConfig, template: &Template) -> Self::Surface;
}
