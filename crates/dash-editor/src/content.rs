//! Widget content resolution.
//!
//! Decides, per widget, where its data comes from. In edit mode nothing
//! touches the network: charts get stand-in assets and a synthetic random
//! walk per attribute. In view mode chart attributes are resolved through
//! the [`AssetService`] in one batched query. The resolver produces data
//! payloads only; drawing them is the host's business.

use crate::error::ContentError;
use crate::services::{AssetRecord, AssetService, AttributeValue};
use dash_core::model::{AttributeRef, ChartPeriod, Color, Widget, WidgetType};
use rand::Rng;

/// Series colors, assigned by series index and reused from the start when
/// a chart has more series than colors.
pub const PALETTE: [&str; 8] = [
    "#3869B1", "#DA7E30", "#3F9852", "#CC2428", "#6B4C9A", "#922427", "#958C3D", "#535055",
];

/// Points per synthetic series.
pub const MOCK_POINTS: usize = 20;

/// First value of every random walk.
pub const MOCK_SEED: f64 = 100.0;

/// Random-walk values stay within this range.
pub const MOCK_RANGE: (f64, f64) = (0.0, 200.0);

/// Default map viewport: (longitude, latitude) and zoom.
pub const MAP_CENTER: (f64, f64) = (5.454250, 51.445990);
pub const MAP_ZOOM: u8 = 5;

/// Name and type given to stand-in assets in edit mode.
const MOCK_ASSET_NAME: &str = "Asset X";
const MOCK_ASSET_TYPE: &str = "ThingAsset";

/// Color of series `index`.
pub fn palette_color(index: usize) -> Color {
    Color::from_hex(PALETTE[index % PALETTE.len()]).unwrap_or(Color::rgba(0.0, 0.0, 0.0, 1.0))
}

// ─── Payload types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Epoch milliseconds.
    pub x: f64,
    pub y: f64,
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Attribute name.
    pub label: String,
    pub color: Color,
    pub points: Vec<Point>,
    pub fill: bool,
    pub point_radius: f32,
}

/// Where a chart gets its values from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSource {
    /// Synthetic series, already generated.
    Mock(Vec<Series>),
    /// The chart loads history for its attributes itself.
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartContent {
    pub assets: Vec<AssetRecord>,
    /// `(index into assets, attribute)` per resolved attribute reference.
    pub attributes: Vec<(usize, AttributeValue)>,
    pub period: ChartPeriod,
    pub show_legend: bool,
    pub show_controls: bool,
    pub source: ChartSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapContent {
    pub center: (f64, f64),
    pub zoom: u8,
}

/// Data payload of one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetContent {
    Chart(ChartContent),
    Map(MapContent),
    /// Inline placeholder for a widget that cannot be resolved.
    Error(String),
}

// ─── Mock data ───────────────────────────────────────────────────────────

/// One synthetic series per attribute reference.
///
/// `amount` points are spaced evenly from `start` towards `end`
/// (`step = (end - start) / amount`). Values follow a random walk seeded at
/// [`MOCK_SEED`]; each value differs from the previous by at most 2 and is
/// clamped to [`MOCK_RANGE`].
pub fn generate_mock_series<R: Rng + ?Sized>(
    refs: &[AttributeRef],
    start: f64,
    end: f64,
    amount: usize,
    rng: &mut R,
) -> Vec<Series> {
    let step = if amount == 0 {
        0.0
    } else {
        (end - start) / amount as f64
    };
    refs.iter()
        .enumerate()
        .map(|(index, attr)| {
            let mut prev = MOCK_SEED;
            let points = (0..amount)
                .map(|i| {
                    let delta = rng.gen_range(-2..=2) as f64;
                    let y = (prev + delta).clamp(MOCK_RANGE.0, MOCK_RANGE.1);
                    prev = y;
                    Point {
                        x: start + i as f64 * step,
                        y,
                    }
                })
                .collect();
            Series {
                label: attr.name.clone(),
                color: palette_color(index),
                points,
                fill: false,
                point_radius: 2.0,
            }
        })
        .collect()
}

/// Synthetic series for `widget`. Only charts have series.
pub fn generate_mock_data<R: Rng + ?Sized>(
    widget: &Widget,
    start: f64,
    end: f64,
    amount: usize,
    rng: &mut R,
) -> Vec<Series> {
    match widget.widget_type {
        WidgetType::Chart => {
            generate_mock_series(&widget.widget_config.attribute_refs(), start, end, amount, rng)
        }
        _ => Vec::new(),
    }
}

// ─── Resolver ────────────────────────────────────────────────────────────

/// Produces [`WidgetContent`] for widgets.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    mock_points: usize,
}

impl Default for ContentResolver {
    fn default() -> Self {
        Self::new(MOCK_POINTS)
    }
}

impl ContentResolver {
    pub fn new(mock_points: usize) -> Self {
        Self { mock_points }
    }

    /// Resolve the payload of `widget`.
    ///
    /// Only a failing asset query is an error. Unknown widget types yield
    /// [`WidgetContent::Error`], and attribute references that do not
    /// resolve are left out.
    pub async fn resolve<A: AssetService + ?Sized>(
        &self,
        widget: &Widget,
        edit_mode: bool,
        assets: &A,
    ) -> Result<WidgetContent, ContentError> {
        match &widget.widget_type {
            WidgetType::Chart if edit_mode => Ok(self.resolve_offline(widget, now_ms())),
            WidgetType::Chart => Ok(WidgetContent::Chart(live_chart(widget, assets).await?)),
            WidgetType::Map => Ok(map_content()),
            WidgetType::Other(name) => Ok(unsupported(name)),
        }
    }

    /// Edit-mode payload: stand-in assets and synthetic series ending at
    /// `now` (epoch milliseconds). Never does I/O.
    pub fn resolve_offline(&self, widget: &Widget, now: f64) -> WidgetContent {
        match &widget.widget_type {
            WidgetType::Chart => {
                let config = &widget.widget_config;
                let refs = config.attribute_refs();
                let period = config.period();

                let mut assets: Vec<AssetRecord> = Vec::new();
                let mut attributes = Vec::with_capacity(refs.len());
                for attr in &refs {
                    let index = match assets.iter().position(|a| a.id == attr.id) {
                        Some(index) => index,
                        None => {
                            assets.push(AssetRecord {
                                id: attr.id.clone(),
                                name: MOCK_ASSET_NAME.to_string(),
                                asset_type: MOCK_ASSET_TYPE.to_string(),
                                ..AssetRecord::default()
                            });
                            assets.len() - 1
                        }
                    };
                    attributes.push((index, AttributeValue::named(&attr.name)));
                }

                let start = now - period.duration_ms() as f64;
                let series =
                    generate_mock_series(&refs, start, now, self.mock_points, &mut rand::thread_rng());
                WidgetContent::Chart(ChartContent {
                    assets,
                    attributes,
                    period,
                    show_legend: config.flag("showLegend"),
                    show_controls: config.flag("showTimestampControls"),
                    source: ChartSource::Mock(series),
                })
            }
            WidgetType::Map => map_content(),
            WidgetType::Other(name) => unsupported(name),
        }
    }
}

fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

fn map_content() -> WidgetContent {
    WidgetContent::Map(MapContent {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
    })
}

fn unsupported(name: &str) -> WidgetContent {
    log::warn!("no content available for widget type `{name}`");
    WidgetContent::Error(format!("Unsupported widget type `{name}`"))
}

/// View-mode chart: resolve every attribute reference in one query.
async fn live_chart<A: AssetService + ?Sized>(
    widget: &Widget,
    service: &A,
) -> Result<ChartContent, ContentError> {
    let config = &widget.widget_config;
    let refs = config.attribute_refs();

    let mut ids: Vec<String> = Vec::with_capacity(refs.len());
    for attr in &refs {
        if !ids.contains(&attr.id) {
            ids.push(attr.id.clone());
        }
    }
    let assets = if ids.is_empty() {
        Vec::new()
    } else {
        log::debug!("querying {} assets for {}", ids.len(), widget.display_name);
        service.query_assets(&ids).await?
    };

    let attributes = refs
        .iter()
        .filter_map(|attr| {
            let index = assets.iter().position(|a| a.id == attr.id);
            let value = index.and_then(|i| assets[i].attributes.get(&attr.name));
            match (index, value) {
                (Some(i), Some(value)) => Some((i, value.clone())),
                _ => {
                    log::warn!(
                        "attribute `{}` of asset `{}` not found; leaving it out of {}",
                        attr.name,
                        attr.id,
                        widget.display_name
                    );
                    None
                }
            }
        })
        .collect();

    Ok(ChartContent {
        assets,
        attributes,
        period: config.period(),
        show_legend: config.flag("showLegend"),
        show_controls: config.flag("showTimestampControls"),
        source: ChartSource::Live,
    })
}
