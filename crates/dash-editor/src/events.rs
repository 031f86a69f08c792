//! Consumer-facing notifications raised by the preview engine.
//!
//! Components return the notifications an operation produced, in emission
//! order; the preview queues them until the host drains them.

use crate::surface::SurfaceNode;
use dash_core::model::{Template, Widget};
use smallvec::SmallVec;
use std::sync::Arc;

/// A notification for the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A palette item was dropped and turned into a widget. Carries the
    /// surface node as reported by the drop, with `id` set to the new grid
    /// item, and the widget that was created.
    Dropped { node: SurfaceNode, widget: Widget },
    /// A batch of geometry edits (or a removal) produced a new template.
    Changed { template: Arc<Template> },
    /// A widget became selected.
    Selected(Widget),
    /// The previous selection was released. `None` when nothing was selected.
    Deselected(Option<Widget>),
}

/// Notifications produced by one operation. Most operations emit at most two.
pub type Notifications = SmallVec<[Notification; 2]>;
