//! Layout document data model.
//!
//! A [`Template`] is the persistable description of a dashboard: a column
//! count plus an ordered list of [`Widget`]s. Every widget owns exactly one
//! [`GridItem`] describing where it sits on the grid. Widget order carries
//! no meaning but is preserved so rendering stays stable.
//!
//! The serialized form uses the camelCase keys of the dashboard wire format
//! (`displayName`, `widgetType`, `gridItem`, `minW`, ...).

use crate::id::{GridItemId, WidgetId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Default number of grid columns when a document does not specify one.
pub const DEFAULT_COLUMNS: u32 = 12;

/// Width and height given to freshly dropped widgets, before min-size clamping.
pub const DEFAULT_ITEM_SIZE: u32 = 2;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let channel = |i: usize| -> Option<f32> {
            let v = hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?;
            Some(v as f32 / 255.0)
        };

        match bytes.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let to_byte = |v: f32| (v * 255.0).round() as u8;
        let (r, g, b, a) = (to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Widget types ────────────────────────────────────────────────────────

/// The kind of content a widget shows.
///
/// Serialized as the upper-case wire names (`"MAP"`, `"CHART"`). Any other
/// name is kept verbatim as [`WidgetType::Other`] so unknown documents
/// survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetType {
    Map,
    Chart,
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Map => "MAP",
            WidgetType::Chart => "CHART",
            WidgetType::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "MAP" => WidgetType::Map,
            "CHART" => WidgetType::Chart,
            other => WidgetType::Other(other.to_string()),
        }
    }

    /// Human label used in generated display names, if the type has one.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            WidgetType::Map => Some("Map"),
            WidgetType::Chart => Some("Chart"),
            WidgetType::Other(_) => None,
        }
    }

    /// Minimum `(w, h)` in grid cells.
    pub fn min_size(&self) -> (u32, u32) {
        match self {
            WidgetType::Chart => (2, 2),
            WidgetType::Map => (4, 4),
            WidgetType::Other(_) => (1, 1),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WidgetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WidgetType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(WidgetType::parse(&s))
    }
}

// ─── Grid items ──────────────────────────────────────────────────────────

fn one() -> u32 {
    1
}

/// Geometric placement of a widget on the grid, in cell units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub id: GridItemId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default = "one")]
    pub min_w: u32,
    #[serde(default = "one")]
    pub min_h: u32,
    #[serde(default)]
    pub no_resize: bool,
    #[serde(default)]
    pub no_move: bool,
    #[serde(default)]
    pub locked: bool,
}

impl GridItem {
    /// A fresh, unlocked grid item for a widget of `widget_type` placed at
    /// `(x, y)`. Its size is the default size raised to the type minimum.
    pub fn for_type(id: GridItemId, widget_type: &WidgetType, x: u32, y: u32) -> Self {
        let (min_w, min_h) = widget_type.min_size();
        Self {
            id,
            x,
            y,
            w: DEFAULT_ITEM_SIZE.max(min_w),
            h: DEFAULT_ITEM_SIZE.max(min_h),
            min_w,
            min_h,
            no_resize: false,
            no_move: false,
            locked: false,
        }
    }

    /// Right edge in cells (`x + w`), saturating on absurd coordinates.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge in cells (`y + h`), saturating on absurd coordinates.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Pull the item inside a grid of `columns` columns.
    ///
    /// The column bound wins over the minimum width: a type wider than the
    /// grid is narrowed to the full grid width and its `min_w` lowered to
    /// match, so both `right() <= columns` and `w >= min_w` hold.
    pub fn fit_columns(&mut self, columns: u32) {
        let columns = columns.max(1);
        self.w = self.w.clamp(1, columns);
        self.min_w = self.min_w.min(self.w);
        self.x = self.x.min(columns - self.w);
    }
}

// ─── Widget configuration ────────────────────────────────────────────────

/// Reference to one attribute of an external asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRef {
    /// Asset id.
    pub id: String,
    /// Attribute name on that asset.
    pub name: String,
}

/// Time window a chart covers, ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPeriod {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl ChartPeriod {
    /// Length of the period in milliseconds. Months are 30 days, years 365.
    pub fn duration_ms(self) -> i64 {
        const HOUR: i64 = 60 * 60 * 1000;
        match self {
            ChartPeriod::Hour => HOUR,
            ChartPeriod::Day => 24 * HOUR,
            ChartPeriod::Week => 7 * 24 * HOUR,
            ChartPeriod::Month => 30 * 24 * HOUR,
            ChartPeriod::Year => 365 * 24 * HOUR,
        }
    }
}

/// Per-type widget settings. Opaque to the layout engine; content
/// resolution reads the few keys it understands through typed accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(pub Map<String, Value>);

impl WidgetConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// The `attributeRefs` list. Malformed entries are skipped.
    pub fn attribute_refs(&self) -> Vec<AttributeRef> {
        let Some(Value::Array(refs)) = self.get("attributeRefs") else {
            return Vec::new();
        };
        refs.iter()
            .filter_map(|v| match serde_json::from_value::<AttributeRef>(v.clone()) {
                Ok(r) => Some(r),
                Err(err) => {
                    log::warn!("skipping malformed attribute reference {v}: {err}");
                    None
                }
            })
            .collect()
    }

    /// The chart `period`, defaulting to one day.
    pub fn period(&self) -> ChartPeriod {
        self.get("period")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// A boolean flag, `false` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

// ─── Widgets & template ──────────────────────────────────────────────────

/// A placed, configured unit of dashboard content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    pub display_name: String,
    pub widget_type: WidgetType,
    pub grid_item: GridItem,
    #[serde(default)]
    pub widget_config: WidgetConfig,
}

/// The layout document: column count plus widgets in rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl Template {
    /// An empty template with the given column count.
    #[must_use]
    pub fn new(columns: u32) -> Self {
        Self {
            columns,
            widgets: Vec::new(),
        }
    }

    /// Parse a template from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// The widget owning the grid item `id`.
    pub fn widget_by_grid_item(&self, id: GridItemId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.grid_item.id == id)
    }

    pub fn widget_by_grid_item_mut(&mut self, id: GridItemId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.grid_item.id == id)
    }

    /// Number of widgets of the given type.
    pub fn count_of_type(&self, widget_type: &WidgetType) -> usize {
        self.widgets
            .iter()
            .filter(|w| &w.widget_type == widget_type)
            .count()
    }

    /// Grid item ids of all widgets, in widget order.
    pub fn grid_item_ids(&self) -> Vec<GridItemId> {
        self.widgets.iter().map(|w| w.grid_item.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#3869B1").unwrap();
        assert_eq!(c.to_hex(), "#3869B1");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn widget_type_wire_names() {
        assert_eq!(WidgetType::parse("CHART"), WidgetType::Chart);
        assert_eq!(WidgetType::parse("MAP"), WidgetType::Map);
        assert_eq!(
            WidgetType::parse("GAUGE"),
            WidgetType::Other("GAUGE".into())
        );
        assert_eq!(WidgetType::Other("GAUGE".into()).label(), None);
    }

    #[test]
    fn new_grid_item_respects_type_minimum() {
        let chart = GridItem::for_type(GridItemId::intern("c"), &WidgetType::Chart, 1, 2);
        assert_eq!((chart.w, chart.h, chart.min_w, chart.min_h), (2, 2, 2, 2));

        let map = GridItem::for_type(GridItemId::intern("m"), &WidgetType::Map, 0, 0);
        assert_eq!((map.w, map.h, map.min_w, map.min_h), (4, 4, 4, 4));
    }

    #[test]
    fn template_parses_wire_form() {
        let json = json!({
            "columns": 8,
            "widgets": [{
                "id": "w1",
                "displayName": "Chart #1",
                "widgetType": "CHART",
                "gridItem": { "id": "g1", "x": 0, "y": 0, "w": 2, "h": 2, "minW": 2, "minH": 2 },
                "widgetConfig": {
                    "attributeRefs": [{ "id": "asset1", "name": "temperature" }],
                    "period": "week",
                    "showLegend": true
                }
            }]
        });
        let template: Template = serde_json::from_value(json).unwrap();
        assert_eq!(template.columns, 8);

        let widget = &template.widgets[0];
        assert_eq!(widget.widget_type, WidgetType::Chart);
        assert!(!widget.grid_item.locked);
        assert_eq!(widget.widget_config.period(), ChartPeriod::Week);
        assert!(widget.widget_config.flag("showLegend"));
        assert_eq!(
            widget.widget_config.attribute_refs(),
            vec![AttributeRef {
                id: "asset1".into(),
                name: "temperature".into()
            }]
        );

        let out = serde_json::to_value(&template).unwrap();
        assert_eq!(out["widgets"][0]["gridItem"]["minW"], json!(2));
        assert_eq!(out["widgets"][0]["widgetType"], json!("CHART"));
    }

    #[test]
    fn malformed_attribute_refs_are_skipped() {
        let mut config = WidgetConfig::default();
        config.set(
            "attributeRefs",
            json!([{ "id": "a", "name": "x" }, { "id": 3 }, "nope"]),
        );
        assert_eq!(config.attribute_refs().len(), 1);
    }

    #[test]
    fn lookup_by_grid_item() {
        let mut template = Template::new(12);
        template.widgets.push(Widget {
            id: WidgetId::intern("w_lookup"),
            display_name: "Map #1".into(),
            widget_type: WidgetType::Map,
            grid_item: GridItem::for_type(GridItemId::intern("g_lookup"), &WidgetType::Map, 0, 0),
            widget_config: WidgetConfig::default(),
        });
        let found = template
            .widget_by_grid_item(GridItemId::intern("g_lookup"))
            .unwrap();
        assert_eq!(found.id, WidgetId::intern("w_lookup"));
        assert_eq!(template.count_of_type(&WidgetType::Map), 1);
        assert_eq!(template.count_of_type(&WidgetType::Chart), 0);
    }

    #[test]
    fn edges_saturate_instead_of_overflowing() {
        let mut item = GridItem::for_type(GridItemId::intern("g_edge"), &WidgetType::Chart, 0, 0);
        item.x = u32::MAX;
        item.y = u32::MAX - 1;
        assert_eq!(item.right(), u32::MAX);
        assert_eq!(item.bottom(), u32::MAX);
    }

    #[test]
    fn fit_columns_keeps_item_inside_grid() {
        let mut map = GridItem::for_type(GridItemId::intern("g_fit"), &WidgetType::Map, 11, 0);
        map.fit_columns(12);
        assert_eq!((map.x, map.w, map.min_w), (8, 4, 4));
        assert_eq!(map.right(), 12);

        let mut narrow = GridItem::for_type(GridItemId::intern("g_narrow"), &WidgetType::Map, 2, 0);
        narrow.fit_columns(3);
        assert_eq!((narrow.x, narrow.w, narrow.min_w), (0, 3, 3));
        assert_eq!(narrow.h, 4);
    }
}
