//! Dashboard preview engine.
//!
//! Keeps a grid layout surface and the dashboard template in sync, tracks
//! the selected widget, negotiates the preview size, and resolves widget
//! content from mock data or the asset service.

pub mod content;
pub mod error;
pub mod events;
pub mod headless;
pub mod preview;
pub mod selection;
pub mod services;
pub mod sizing;
pub mod surface;
pub mod sync;

pub use content::{ContentResolver, WidgetContent};
pub use error::{ContentError, PreviewError, ServiceError, SizeError};
pub use events::{Notification, Notifications};
pub use headless::{HeadlessFactory, HeadlessSurface};
pub use preview::{DashboardPreview, LoadState, WidgetFrame};
pub use selection::SelectionController;
pub use services::{AssetRecord, AssetService, AttributeValue, DocumentStore};
pub use sizing::{ContainerStyle, Length, PresetTable, SizeNegotiator, SizeOption};
pub use surface::{GridSurface, SurfaceConfig, SurfaceEvent, SurfaceFactory, SurfaceNode};
pub use sync::LayoutAdapter;
