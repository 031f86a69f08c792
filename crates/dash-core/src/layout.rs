//! Grid geometry: cell metrics and pixel bounds of grid items.
//!
//! Grid items are positioned in cell units. Hosts rendering the grid (and
//! its background lines) need the pixel size of a cell, which depends on the
//! container's rendered width and therefore changes on every resize.

use crate::model::GridItem;

/// Rendered dimensions of the grid container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Effective pixel size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellMetrics {
    /// Square cells spanning `viewport.width` across `columns` columns.
    pub fn square(viewport: Viewport, columns: u32) -> Self {
        let cell_width = viewport.width / columns.max(1) as f32;
        Self {
            cell_width,
            cell_height: cell_width,
        }
    }
}

/// Absolute pixel rectangle of a grid item inside the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Pixel bounds of `item`, inset by `margin` on every side.
pub fn resolve_bounds(item: &GridItem, metrics: CellMetrics, margin: f32) -> ResolvedBounds {
    let outer_w = item.w as f32 * metrics.cell_width;
    let outer_h = item.h as f32 * metrics.cell_height;
    ResolvedBounds {
        x: item.x as f32 * metrics.cell_width + margin,
        y: item.y as f32 * metrics.cell_height + margin,
        width: (outer_w - 2.0 * margin).max(0.0),
        height: (outer_h - 2.0 * margin).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::GridItemId;
    use crate::model::WidgetType;

    #[test]
    fn square_cells_divide_width() {
        let m = CellMetrics::square(
            Viewport {
                width: 960.0,
                height: 540.0,
            },
            12,
        );
        assert_eq!(m.cell_width, 80.0);
        assert_eq!(m.cell_height, 80.0);
    }

    #[test]
    fn zero_columns_does_not_divide_by_zero() {
        let m = CellMetrics::square(Viewport::default(), 0);
        assert_eq!(m.cell_width, 1280.0);
    }

    #[test]
    fn bounds_are_inset_by_margin() {
        let item = GridItem::for_type(GridItemId::intern("layout_g"), &WidgetType::Chart, 1, 2);
        let b = resolve_bounds(
            &item,
            CellMetrics {
                cell_width: 100.0,
                cell_height: 50.0,
            },
            4.0,
        );
        assert_eq!(
            b,
            ResolvedBounds {
                x: 104.0,
                y: 104.0,
                width: 192.0,
                height: 92.0,
            }
        );
    }
}
