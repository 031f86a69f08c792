//! Integration tests: layout adapter (grid surface ↔ layout document).
//!
//! Drives the headless surface through drops and move/resize gestures and
//! checks that the published template mirrors the surface exactly.

use dash_core::document::LayoutDocument;
use dash_core::id::GridItemId;
use dash_core::model::{Template, WidgetType};
use dash_editor::events::Notification;
use dash_editor::headless::HeadlessFactory;
use dash_editor::surface::{GridSurface, SurfaceEvent, SurfaceNode};
use dash_editor::sync::LayoutAdapter;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_chart_template() -> Template {
    serde_json::from_value(serde_json::json!({
        "columns": 12,
        "widgets": [
            {
                "id": "sync_w1",
                "displayName": "Chart #1",
                "widgetType": "CHART",
                "gridItem": { "id": "sync_g1", "x": 0, "y": 0, "w": 2, "h": 2, "minW": 2, "minH": 2 }
            },
            {
                "id": "sync_w2",
                "displayName": "Chart #2",
                "widgetType": "CHART",
                "gridItem": { "id": "sync_g2", "x": 4, "y": 0, "w": 3, "h": 2, "locked": true }
            }
        ]
    }))
    .unwrap()
}

fn mounted(template: Template, edit_mode: bool) -> (LayoutDocument, LayoutAdapter<HeadlessFactory>) {
    let doc = LayoutDocument::new(template);
    let mut adapter = LayoutAdapter::new(HeadlessFactory::default());
    assert!(adapter.initialize(doc.template(), edit_mode, true));
    (doc, adapter)
}

// ─── Drops ──────────────────────────────────────────────────────────────

#[test]
fn drop_chart_creates_named_widget() {
    init_logs();
    let (mut doc, mut adapter) = mounted(Template::default(), true);

    let event = adapter
        .surface_mut()
        .unwrap()
        .drop_external(WidgetType::Chart, 1, 2)
        .unwrap();
    let notes = adapter.handle_event(&mut doc, event.clone());

    let SurfaceEvent::Dropped(mut node) = event else {
        panic!("expected a drop event");
    };
    let template = doc.template();
    assert_eq!(template.widgets.len(), 1);
    let widget = &template.widgets[0];
    node.id = Some(widget.grid_item.id);
    assert_eq!(
        notes.as_slice(),
        &[Notification::Dropped {
            node,
            widget: widget.clone()
        }]
    );

    assert_eq!(widget.display_name, "Chart #1");
    assert_eq!(widget.widget_type, WidgetType::Chart);
    let g = &widget.grid_item;
    assert_eq!((g.x, g.y, g.w, g.h), (1, 2, 2, 2));
    assert!(!g.locked && !g.no_move && !g.no_resize);

    // the placeholder is gone until the surface is rebuilt from the template
    assert!(adapter.surface().unwrap().items().is_empty());
}

#[test]
fn second_drop_of_same_type_counts_up() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    for x in [0, 4] {
        let event = adapter
            .surface_mut()
            .unwrap()
            .drop_external(WidgetType::Chart, x, 0)
            .unwrap();
        adapter.handle_event(&mut doc, event);
    }
    let names: Vec<_> = doc
        .template()
        .widgets
        .iter()
        .map(|w| w.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Chart #1", "Chart #2"]);
}

#[test]
fn dropped_map_respects_its_minimum_size() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    let event = adapter
        .surface_mut()
        .unwrap()
        .drop_external(WidgetType::Map, 0, 0)
        .unwrap();
    adapter.handle_event(&mut doc, event);

    let widget = &doc.template().widgets[0];
    assert_eq!(widget.display_name, "Map #1");
    let g = &widget.grid_item;
    assert!(g.w >= g.min_w && g.h >= g.min_h);
}

#[test]
fn unlabelled_type_is_named_after_its_id() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    let event = adapter
        .surface_mut()
        .unwrap()
        .drop_external(WidgetType::Other("GAUGE".into()), 0, 0)
        .unwrap();
    adapter.handle_event(&mut doc, event);

    let widget = &doc.template().widgets[0];
    assert_eq!(widget.display_name, format!("Widget #{}", widget.id));
}

#[test]
fn dropped_map_is_pulled_inside_the_columns() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    let event = adapter
        .surface_mut()
        .unwrap()
        .drop_external(WidgetType::Map, 11, 0)
        .unwrap();
    adapter.handle_event(&mut doc, event);

    let g = &doc.template().widgets[0].grid_item;
    assert_eq!((g.x, g.w), (8, 4));
    assert!(g.right() <= doc.template().columns);
}

#[test]
fn map_on_narrow_grid_takes_full_width() {
    let (mut doc, mut adapter) = mounted(Template::new(3), true);
    let event = adapter
        .surface_mut()
        .unwrap()
        .drop_external(WidgetType::Map, 2, 0)
        .unwrap();
    adapter.handle_event(&mut doc, event);

    let g = &doc.template().widgets[0].grid_item;
    assert_eq!((g.x, g.w, g.min_w), (0, 3, 3));
    assert!(dash_core::lint::lint_template(doc.template()).is_empty());
}

#[test]
fn drop_without_type_is_ignored() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    let node = SurfaceNode {
        handle: None,
        id: None,
        x: 0,
        y: 0,
        w: 2,
        h: 2,
        widget_type: None,
    };
    let notes = adapter.handle_event(&mut doc, SurfaceEvent::Dropped(node));
    assert!(notes.is_empty());
    assert!(doc.template().widgets.is_empty());
    assert_eq!(doc.revision(), 0);
}

#[test]
fn many_drops_yield_unique_ids() {
    let (mut doc, mut adapter) = mounted(Template::default(), true);
    for i in 0..50 {
        let event = adapter
            .surface_mut()
            .unwrap()
            .drop_external(WidgetType::Chart, i % 10, i / 10)
            .unwrap();
        adapter.handle_event(&mut doc, event);
    }
    let template = doc.template();
    let widget_ids: HashSet<_> = template.widgets.iter().map(|w| w.id).collect();
    let item_ids: HashSet<_> = template.grid_item_ids().into_iter().collect();
    assert_eq!(widget_ids.len(), 50);
    assert_eq!(item_ids.len(), 50);
}

#[test]
fn static_surface_accepts_no_drops() {
    let (_, mut adapter) = mounted(Template::default(), false);
    let surface = adapter.surface_mut().unwrap();
    assert!(surface.config().static_grid);
    assert!(surface.drop_external(WidgetType::Chart, 0, 0).is_none());
}

// ─── Geometry changes ───────────────────────────────────────────────────

#[test]
fn change_batch_overwrites_geometry_only() {
    let (mut doc, mut adapter) = mounted(two_chart_template(), true);
    let before = Arc::clone(doc.template());

    let event = adapter
        .surface_mut()
        .unwrap()
        .move_item(GridItemId::intern("sync_g1"), 3, 1, 4, 3)
        .unwrap();
    let notes = adapter.handle_event(&mut doc, event);

    let after = Arc::clone(doc.template());
    assert_eq!(notes.as_slice(), &[Notification::Changed { template: Arc::clone(&after) }]);
    assert!(!Arc::ptr_eq(&before, &after));

    let g1 = &after.widgets[0].grid_item;
    assert_eq!((g1.x, g1.y, g1.w, g1.h), (3, 1, 4, 3));
    assert_eq!((g1.min_w, g1.min_h), (2, 2));
    assert_eq!(after.widgets[1], before.widgets[1]);
    // the published snapshot held by observers is untouched
    assert_eq!(before.widgets[0].grid_item.x, 0);
}

#[test]
fn multi_item_gesture_publishes_one_template() {
    let mut template = two_chart_template();
    template.widgets[1].grid_item.locked = false;
    let (mut doc, mut adapter) = mounted(template, true);

    let event = adapter
        .surface_mut()
        .unwrap()
        .move_items(&[
            (GridItemId::intern("sync_g1"), 0, 2, 2, 2),
            (GridItemId::intern("sync_g2"), 0, 0, 3, 2),
        ])
        .unwrap();
    let notes = adapter.handle_event(&mut doc, event);

    assert_eq!(notes.len(), 1);
    assert_eq!(doc.revision(), 1);
    let t = doc.template();
    assert_eq!((t.widgets[0].grid_item.x, t.widgets[0].grid_item.y), (0, 2));
    assert_eq!((t.widgets[1].grid_item.x, t.widgets[1].grid_item.y), (0, 0));
}

#[test]
fn locked_item_does_not_move() {
    let (_, mut adapter) = mounted(two_chart_template(), true);
    let event = adapter
        .surface_mut()
        .unwrap()
        .move_item(GridItemId::intern("sync_g2"), 8, 3, 4, 4);
    assert!(event.is_none());
}

#[test]
fn unknown_nodes_still_publish() {
    let (mut doc, mut adapter) = mounted(two_chart_template(), true);
    let stray = SurfaceNode {
        handle: None,
        id: Some(GridItemId::intern("sync_stray")),
        x: 9,
        y: 9,
        w: 1,
        h: 1,
        widget_type: None,
    };
    let before = Template::clone(doc.template());
    let notes = adapter.handle_event(&mut doc, SurfaceEvent::Changed(vec![stray]));
    assert_eq!(notes.len(), 1);
    assert_eq!(doc.revision(), 1);
    assert_eq!(**doc.template(), before);
}

// ─── Lifecycle ──────────────────────────────────────────────────────────

#[test]
fn mounted_surface_mirrors_template() {
    let (doc, adapter) = mounted(two_chart_template(), true);
    let surface = adapter.surface().unwrap();
    let surface_ids: HashSet<_> = surface.items().iter().filter_map(|i| i.node.id).collect();
    let template_ids: HashSet<_> = doc.template().grid_item_ids().into_iter().collect();
    assert_eq!(surface.items().len(), 2);
    assert_eq!(surface_ids, template_ids);
    assert!(surface.is_filled());
    assert!(adapter.background_cells().is_some());
}

#[test]
fn deferred_until_root_is_present() {
    let mut factory = HeadlessFactory::default();
    factory.root_present = false;
    let mut adapter = LayoutAdapter::new(factory);
    let template = two_chart_template();

    assert!(!adapter.initialize(&template, true, true));
    assert!(adapter.surface().is_none());

    adapter.factory_mut().root_present = true;
    assert!(adapter.initialize(&template, true, false));
    assert_eq!(adapter.factory().mounts(), 1);
}

#[test]
fn unforced_initialize_keeps_surface() {
    let (doc, mut adapter) = mounted(two_chart_template(), true);
    assert!(!adapter.initialize(doc.template(), true, false));
    assert_eq!(adapter.factory().mounts(), 1);

    assert!(adapter.initialize(doc.template(), false, true));
    assert_eq!(adapter.factory().mounts(), 2);
    assert!(adapter.config().unwrap().static_grid);
}

#[test]
fn teardown_releases_surface() {
    let (_, mut adapter) = mounted(two_chart_template(), true);
    adapter.teardown();
    assert!(adapter.surface().is_none());
    assert!(adapter.background_cells().is_none());
}
