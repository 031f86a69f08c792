pub mod document;
pub mod id;
pub mod layout;
pub mod lint;
pub mod model;

pub use document::LayoutDocument;
pub use id::{GridItemId, WidgetId};
pub use layout::{CellMetrics, ResolvedBounds, Viewport, resolve_bounds};
pub use lint::{LintDiagnostic, LintSeverity, is_valid, lint_template};
pub use model::*;
