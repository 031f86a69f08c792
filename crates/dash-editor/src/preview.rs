//! Dashboard preview: the component the host embeds.
//!
//! Wires the layout document, surface adapter, selection controller, size
//! negotiator and content resolver together. Every input has its own setter
//! that performs exactly the downstream work the input requires; setters
//! never diff a bag of changed properties.
//!
//! Notifications produced along the way are queued and handed to the host
//! through [`DashboardPreview::take_notifications`].

use crate::content::{ContentResolver, WidgetContent};
use crate::error::{ContentError, PreviewError, SizeError};
use crate::events::Notification;
use crate::selection::SelectionController;
use crate::services::{AssetService, DocumentStore};
use crate::sizing::{ContainerStyle, Length, PresetTable, SizeNegotiator, SizeOption};
use crate::surface::{SurfaceEvent, SurfaceFactory};
use crate::sync::LayoutAdapter;
use dash_core::document::LayoutDocument;
use dash_core::id::{GridItemId, WidgetId};
use dash_core::layout::{ResolvedBounds, Viewport, resolve_bounds};
use dash_core::lint::{LintSeverity, lint_template};
use dash_core::model::{GridItem, Template, Widget, WidgetType};
use std::collections::VecDeque;
use std::sync::Arc;

/// Whether the document is available for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing supplied yet; an empty grid is shown.
    Empty,
    /// Waiting for the document store.
    Loading,
    Ready,
    /// The fetch failed; a failed-to-load placeholder replaces the grid.
    Failed(String),
}

/// What the host needs to render one widget's box.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetFrame {
    pub widget_id: WidgetId,
    pub display_name: String,
    pub widget_type: WidgetType,
    pub grid_item: GridItem,
    /// Pixel bounds, once a surface is mounted.
    pub bounds: Option<ResolvedBounds>,
    pub selected: bool,
}

/// The interactive dashboard preview.
pub struct DashboardPreview<F: SurfaceFactory> {
    document: LayoutDocument,
    /// A template was supplied directly (or already loaded).
    has_template: bool,
    document_id: Option<String>,
    load_state: LoadState,
    edit_mode: bool,
    adapter: LayoutAdapter<F>,
    selection: SelectionController,
    sizing: SizeNegotiator,
    resolver: ContentResolver,
    outbox: VecDeque<Notification>,
}

impl<F: SurfaceFactory> DashboardPreview<F> {
    pub fn new(factory: F) -> Self {
        Self::with_presets(factory, PresetTable::default())
    }

    /// A preview whose size presets come from `table`.
    pub fn with_presets(factory: F, table: PresetTable) -> Self {
        Self {
            document: LayoutDocument::default(),
            has_template: false,
            document_id: None,
            load_state: LoadState::Empty,
            edit_mode: false,
            adapter: LayoutAdapter::new(factory),
            selection: SelectionController::new(),
            sizing: SizeNegotiator::new(table),
            resolver: ContentResolver::default(),
            outbox: VecDeque::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn template(&self) -> &Arc<Template> {
        self.document.template()
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn selected_widget(&self) -> Option<&Widget> {
        self.selection.selected()
    }

    pub fn adapter(&self) -> &LayoutAdapter<F> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut LayoutAdapter<F> {
        &mut self.adapter
    }

    pub fn sizing(&self) -> &SizeNegotiator {
        &self.sizing
    }

    /// Drain queued notifications in emission order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.outbox.drain(..).collect()
    }

    fn emit(&mut self, notes: impl IntoIterator<Item = Notification>) {
        self.outbox.extend(notes);
    }

    /// Tear down and remount the surface, then restore the selection marker.
    fn rebuild(&mut self) {
        self.adapter
            .initialize(self.document.template(), self.edit_mode, true);
        let notes = self
            .selection
            .reconcile(self.document.template(), self.adapter.surface_mut());
        self.emit(notes);
    }

    // ─── Document source ─────────────────────────────────────────────────

    /// Supply the template directly.
    ///
    /// Publishes it, remounts the surface, and keeps the selection only if
    /// its widget still exists. Lint findings are logged, not rejected.
    pub fn set_template(&mut self, template: Template) {
        for diag in lint_template(&template) {
            match diag.severity {
                LintSeverity::Error => log::error!("[{}] {}", diag.rule, diag.message),
                LintSeverity::Warning => log::warn!("[{}] {}", diag.rule, diag.message),
            }
        }
        self.document.replace(template);
        self.has_template = true;
        self.load_state = LoadState::Ready;
        self.rebuild();
    }

    /// Use the document stored under `id`; fetched by [`Self::load_document`].
    pub fn set_document_id(&mut self, id: impl Into<String>) {
        self.document_id = Some(id.into());
    }

    /// Fetch the document when only an id was supplied.
    ///
    /// A directly supplied template wins and nothing is fetched. With no
    /// source at all the error is logged and the empty grid stays. A failed
    /// fetch moves to [`LoadState::Failed`].
    pub async fn load_document<D: DocumentStore + ?Sized>(
        &mut self,
        store: &D,
    ) -> Result<(), PreviewError> {
        if self.has_template {
            return Ok(());
        }
        let Some(id) = self.document_id.clone() else {
            log::error!("{}", PreviewError::MissingSource);
            return Err(PreviewError::MissingSource);
        };

        self.load_state = LoadState::Loading;
        match store.get(&id).await {
            Ok(template) => {
                log::info!("loaded document `{id}` with {} widgets", template.widgets.len());
                self.set_template(template);
                Ok(())
            }
            Err(source) => {
                log::error!("failed to load document `{id}`: {source}");
                self.load_state = LoadState::Failed(source.to_string());
                Err(PreviewError::Load { id, source })
            }
        }
    }

    // ─── Modes & selection ───────────────────────────────────────────────

    /// Switch between edit and view mode. Remounts the surface (interactive
    /// or static) and re-attaches resize observation.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        if self.edit_mode == edit_mode {
            return;
        }
        self.edit_mode = edit_mode;
        self.sizing.reset_observer();
        self.rebuild();
    }

    /// Select a widget by id, or clear the selection with `None`.
    pub fn set_selected_widget(&mut self, id: Option<WidgetId>) -> Result<(), PreviewError> {
        let notes = match id {
            Some(id) => {
                let template = Arc::clone(self.document.template());
                let widget = template
                    .widget(id)
                    .ok_or_else(|| PreviewError::UnknownWidget(id.to_string()))?;
                self.selection.select(widget, self.adapter.surface_mut())
            }
            None => self.selection.clear(self.adapter.surface_mut()),
        };
        self.emit(notes);
        Ok(())
    }

    /// A surface item was clicked by the user.
    pub fn click_item(&mut self, grid_item: GridItemId) {
        let notes = self.selection.click(
            grid_item,
            self.document.template(),
            self.edit_mode,
            self.adapter.surface_mut(),
        );
        self.emit(notes);
    }

    // ─── Surface events & document edits ─────────────────────────────────

    /// Forward a native surface event.
    ///
    /// A drop publishes a template with the new widget, which remounts the
    /// surface. A geometry batch publishes one template and leaves the
    /// surface as is, since the surface already shows the new geometry.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let is_drop = matches!(event, SurfaceEvent::Dropped(_));
        let revision = self.document.revision();
        let notes = self.adapter.handle_event(&mut self.document, event);
        self.emit(notes);
        if self.document.revision() == revision {
            return;
        }
        if is_drop {
            self.rebuild();
        } else {
            let notes = self
                .selection
                .reconcile(self.document.template(), self.adapter.surface_mut());
            self.emit(notes);
        }
    }

    /// Delete a widget and its grid item.
    ///
    /// A selected widget is deselected first. The new template is announced
    /// with `changed` and the surface is remounted.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<Widget, PreviewError> {
        if self.document.template().widget(id).is_none() {
            return Err(PreviewError::UnknownWidget(id.to_string()));
        }
        if self.selection.is_selected(id) {
            let notes = self.selection.clear(self.adapter.surface_mut());
            self.emit(notes);
        }
        let removed = self
            .document
            .remove_widget(id)
            .ok_or_else(|| PreviewError::UnknownWidget(id.to_string()))?;
        self.emit([Notification::Changed {
            template: Arc::clone(self.document.template()),
        }]);
        self.rebuild();
        Ok(removed)
    }

    // ─── Size ────────────────────────────────────────────────────────────

    /// Switch to a named preset size.
    pub fn set_preview_size(&mut self, option: SizeOption) {
        self.sizing.set_option(option);
    }

    /// Set the preview width from a pixel string such as `"1024px"`.
    pub fn set_preview_width(&mut self, width: &str) -> Result<(), SizeError> {
        self.sizing.set_width(width)
    }

    /// Set the preview height from a pixel string such as `"768px"`.
    pub fn set_preview_height(&mut self, height: &str) -> Result<(), SizeError> {
        self.sizing.set_height(height)
    }

    /// Swap the preview width and height.
    pub fn rotate_preview(&mut self) {
        self.sizing.rotate();
    }

    pub fn preview_size(&self) -> SizeOption {
        self.sizing.option()
    }

    pub fn preview_dimensions(&self) -> (Length, Length) {
        (self.sizing.width(), self.sizing.height())
    }

    pub fn container_style(&self) -> ContainerStyle {
        self.sizing.container_style()
    }

    /// The environment resized the container. Remounts the surface when the
    /// observed size actually changed; returns whether it did.
    pub fn container_resized(&mut self, size: Viewport) -> bool {
        if !self.sizing.observe(size) {
            return false;
        }
        log::debug!("container resized to {} x {}; rebuilding grid", size.width, size.height);
        self.rebuild();
        true
    }

    // ─── Render pass ─────────────────────────────────────────────────────

    /// One render pass: mount the surface if an earlier attempt was
    /// deferred, then describe every widget box.
    pub fn render_pass(&mut self) -> Vec<WidgetFrame> {
        if !self.has_template && self.document_id.is_none() {
            log::error!("{}", PreviewError::MissingSource);
        }
        if self.adapter.surface().is_none()
            && self
                .adapter
                .initialize(self.document.template(), self.edit_mode, false)
        {
            let notes = self
                .selection
                .reconcile(self.document.template(), self.adapter.surface_mut());
            self.emit(notes);
        }
        self.frames()
    }

    /// Widget boxes in template order.
    pub fn frames(&self) -> Vec<WidgetFrame> {
        let metrics = self.adapter.background_cells();
        let margin = self.adapter.config().map_or(0.0, |c| c.margin);
        self.document
            .template()
            .widgets
            .iter()
            .map(|w| WidgetFrame {
                widget_id: w.id,
                display_name: w.display_name.clone(),
                widget_type: w.widget_type.clone(),
                grid_item: w.grid_item.clone(),
                bounds: metrics.map(|m| resolve_bounds(&w.grid_item, m, margin)),
                selected: self.selection.is_selected(w.id),
            })
            .collect()
    }

    /// Resolve the data payload of one widget for the current mode.
    pub async fn resolve_content<A: AssetService + ?Sized>(
        &self,
        id: WidgetId,
        assets: &A,
    ) -> Result<WidgetContent, ContentError> {
        let template = Arc::clone(self.document.template());
        match template.widget(id) {
            Some(widget) => self.resolver.resolve(widget, self.edit_mode, assets).await,
            None => Ok(WidgetContent::Error(format!("Unknown widget `{id}`"))),
        }
    }

    /// Resolve every widget's payload. A failure stays with its widget and
    /// does not stop the others.
    pub async fn resolve_all_content<A: AssetService + ?Sized>(
        &self,
        assets: &A,
    ) -> Vec<(WidgetId, Result<WidgetContent, ContentError>)> {
        let template = Arc::clone(self.document.template());
        let mut out = Vec::with_capacity(template.widgets.len());
        for widget in &template.widgets {
            let content = self.resolver.resolve(widget, self.edit_mode, assets).await;
            if let Err(err) = &content {
                log::warn!("content of {} failed: {err}", widget.display_name);
            }
            out.push((widget.id, content));
        }
        out
    }
}
