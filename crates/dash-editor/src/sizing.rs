//! Preview size negotiation.
//!
//! The preview container's size comes either from a named preset or from
//! explicit width/height values. Presets map to fixed dimensions through a
//! [`PresetTable`]; explicit dimensions map back to the preset with exactly
//! those values, or to [`SizeOption::Custom`].

use crate::error::SizeError;
use dash_core::layout::Viewport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest pixel dimension accepted for the preview.
pub const MIN_PREVIEW_PX: u32 = 100;

/// Named preview size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeOption {
    Large,
    Medium,
    Small,
    Custom,
    Fullscreen,
}

impl SizeOption {
    /// Label shown in preset pickers.
    pub fn label(self) -> &'static str {
        match self {
            SizeOption::Large => "Large",
            SizeOption::Medium => "Medium",
            SizeOption::Small => "Small",
            SizeOption::Custom => "Custom",
            SizeOption::Fullscreen => "Fullscreen",
        }
    }

    /// Inverse of [`SizeOption::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        [
            SizeOption::Large,
            SizeOption::Medium,
            SizeOption::Small,
            SizeOption::Custom,
            SizeOption::Fullscreen,
        ]
        .into_iter()
        .find(|o| o.label() == label)
    }
}

/// A CSS-like length: pixels or percent of the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Px(u32),
    Percent(u32),
}

impl Length {
    /// Pixel lengths below [`MIN_PREVIEW_PX`] are raised to it.
    fn clamped(self) -> Self {
        match self {
            Length::Px(px) => Length::Px(px.max(MIN_PREVIEW_PX)),
            other => other,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl FromStr for Length {
    type Err = SizeError;

    /// Accepts `"960px"`, `"100%"`, or a bare number of pixels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SizeError::Empty);
        }
        let invalid = || SizeError::Invalid(s.to_string());
        if let Some(pct) = s.strip_suffix('%') {
            return pct.trim().parse().map(Length::Percent).map_err(|_| invalid());
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        px.trim().parse().map(Length::Px).map_err(|_| invalid())
    }
}

/// Preset → dimensions lookup, in preset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    entries: Vec<(SizeOption, Length, Length)>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new(vec![
            (SizeOption::Large, Length::Px(1920), Length::Px(1080)),
            (SizeOption::Medium, Length::Px(1280), Length::Px(720)),
            (SizeOption::Small, Length::Px(480), Length::Px(853)),
            (SizeOption::Fullscreen, Length::Percent(100), Length::Percent(100)),
        ])
    }
}

impl PresetTable {
    /// Build a table. `Custom` entries are ignored: custom has no fixed size.
    pub fn new(entries: Vec<(SizeOption, Length, Length)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|(option, _, _)| *option != SizeOption::Custom)
                .collect(),
        }
    }

    pub fn dimensions(&self, option: SizeOption) -> Option<(Length, Length)> {
        self.entries
            .iter()
            .find(|(o, _, _)| *o == option)
            .map(|&(_, w, h)| (w, h))
    }

    /// The first preset with exactly these dimensions, or `Custom`.
    pub fn option_for(&self, width: Length, height: Length) -> SizeOption {
        self.entries
            .iter()
            .find(|&&(_, w, h)| w == width && h == height)
            .map_or(SizeOption::Custom, |&(o, _, _)| o)
    }
}

/// How the container is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Fixed-size, bordered, scrollable box.
    Contained,
    /// Borderless, full-width, grows with its content.
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Hidden,
    Scroll,
    Auto,
}

/// Effective style of the preview container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStyle {
    pub display: DisplayMode,
    pub width: Length,
    /// `None` means the height follows the content.
    pub height: Option<Length>,
    pub bordered: bool,
    pub rounded: bool,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    /// Draw cell lines behind the grid.
    pub grid_lines: bool,
}

/// Resolves the preview container's size and display mode.
#[derive(Debug, Clone)]
pub struct SizeNegotiator {
    table: PresetTable,
    option: SizeOption,
    width: Length,
    height: Length,
    last_observed: Option<Viewport>,
}

impl Default for SizeNegotiator {
    fn default() -> Self {
        Self::new(PresetTable::default())
    }
}

impl SizeNegotiator {
    /// Starts at the `Medium` preset, or 960x540 custom if the table lacks it.
    pub fn new(table: PresetTable) -> Self {
        let (option, (width, height)) = match table.dimensions(SizeOption::Medium) {
            Some(dims) => (SizeOption::Medium, dims),
            None => (SizeOption::Custom, (Length::Px(960), Length::Px(540))),
        };
        Self {
            table,
            option,
            width,
            height,
            last_observed: None,
        }
    }

    pub fn option(&self) -> SizeOption {
        self.option
    }

    pub fn width(&self) -> Length {
        self.width
    }

    pub fn height(&self) -> Length {
        self.height
    }

    pub fn table(&self) -> &PresetTable {
        &self.table
    }

    /// Switch to a named preset. Non-custom presets take their dimensions
    /// from the table; `Custom` keeps the current dimensions.
    pub fn set_option(&mut self, option: SizeOption) {
        self.option = option;
        if let Some((width, height)) = self.table.dimensions(option) {
            self.width = width;
            self.height = height;
        }
        log::debug!("preview size {:?}: {} x {}", self.option, self.width, self.height);
    }

    /// Set explicit dimensions and recompute the matching preset.
    pub fn set_dimensions(&mut self, width: Length, height: Length) {
        self.width = width.clamped();
        self.height = height.clamped();
        self.option = self.table.option_for(self.width, self.height);
        log::debug!("preview size {} x {} -> {:?}", self.width, self.height, self.option);
    }

    /// Parse and set the width, e.g. `"1024px"`.
    pub fn set_width(&mut self, width: &str) -> Result<(), SizeError> {
        let width = width.parse()?;
        self.set_dimensions(width, self.height);
        Ok(())
    }

    /// Parse and set the height, e.g. `"768px"`.
    pub fn set_height(&mut self, height: &str) -> Result<(), SizeError> {
        let height = height.parse()?;
        self.set_dimensions(self.width, height);
        Ok(())
    }

    /// Swap width and height.
    pub fn rotate(&mut self) {
        self.set_dimensions(self.height, self.width);
    }

    pub fn display_mode(&self) -> DisplayMode {
        if self.option == SizeOption::Fullscreen {
            DisplayMode::Fullscreen
        } else {
            DisplayMode::Contained
        }
    }

    pub fn container_style(&self) -> ContainerStyle {
        match self.display_mode() {
            DisplayMode::Fullscreen => ContainerStyle {
                display: DisplayMode::Fullscreen,
                width: Length::Percent(100),
                height: None,
                bordered: false,
                rounded: false,
                overflow_x: Overflow::Hidden,
                overflow_y: Overflow::Auto,
                grid_lines: false,
            },
            DisplayMode::Contained => ContainerStyle {
                display: DisplayMode::Contained,
                width: self.width,
                height: Some(self.height),
                bordered: true,
                rounded: true,
                overflow_x: Overflow::Hidden,
                overflow_y: Overflow::Scroll,
                grid_lines: true,
            },
        }
    }

    /// Record the container's observed rendered size. Returns `true` when it
    /// differs from the previous observation (or is the first one), meaning
    /// the surface must be rebuilt: cell metrics depend on the rendered size.
    pub fn observe(&mut self, size: Viewport) -> bool {
        if self.last_observed == Some(size) {
            return false;
        }
        self.last_observed = Some(size);
        true
    }

    /// Forget the last observation, as when the resize observer is re-attached.
    pub fn reset_observer(&mut self) {
        self.last_observed = None;
    }
}
