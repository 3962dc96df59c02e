//! Data model carried by the adapter's input slots.
//!
//! These are the values the owning component hands to the flame chart:
//! the call tree, marks, waterfall rows, timeseries, engine settings and
//! the selection payload the engine emits back. The adapter never looks
//! inside them. They are typed so slots stay strongly typed, and they are
//! serde-serializable (camelCase) so a host can move them across a JS
//! boundary as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-supplied properties outside the typed fields.
pub type Extra = serde_json::Map<String, serde_json::Value>;

// ─── Flame chart nodes ───────────────────────────────────────────────────

/// One node of the flame chart call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlameChartNode {
    pub name: String,
    pub start: f64,
    pub duration: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FlameChartNode>>,
    /// Fields the model does not name, kept so the engine and the select
    /// callback see the caller's object as it was given.
    #[serde(flatten)]
    pub extra: Extra,
}

impl FlameChartNode {
    /// End timestamp (`start + duration`).
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Root level of the call tree (the `data` slot).
pub type FlameChartNodes = Vec<FlameChartNode>;

/// A flattened tree node as the engine reports it on selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTreeNode {
    pub source: FlameChartNode,
    pub end: f64,
    #[serde(default)]
    pub parent: Option<Box<FlatTreeNode>>,
    pub level: u32,
    pub index: u32,
}

// ─── Marks ───────────────────────────────────────────────────────────────

/// A vertical timeline marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub short_name: String,
    pub full_name: String,
    pub timestamp: f64,
    pub color: String,
    #[serde(flatten)]
    pub extra: Extra,
}

pub type Marks = Vec<Mark>;

// ─── Waterfall ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    Block,
    Line,
}

/// One drawn span of a waterfall row, bounded by two timing names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallInterval {
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: IntervalKind,
    pub start: String,
    pub end: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Intervals of a row: either the name of a preset in
/// [`Waterfall::intervals`] or an inline list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemIntervals {
    Preset(String),
    Inline(Vec<WaterfallInterval>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallItem {
    pub name: String,
    pub intervals: ItemIntervals,
    /// Timing name → timestamp in ms.
    pub timing: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    pub items: Vec<WaterfallItem>,
    #[serde(default)]
    pub intervals: BTreeMap<String, Vec<WaterfallInterval>>,
}

// ─── Timeseries ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesChart {
    /// `(timestamp, value)` pairs.
    pub points: Vec<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form chart style, passed to the engine untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

pub type Timeseries = Vec<TimeseriesChart>;

// ─── Settings & view state ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_units: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsHeaders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfall: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flame_chart: Option<String>,
}

/// Engine settings. Applying them may invalidate the engine's cached layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SettingsOptions>,
    /// Per-plugin style overrides, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<SettingsHeaders>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Scroll position of the flame chart viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Visible time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub start: f64,
    pub end: f64,
}

/// Node type → CSS color.
pub type Colors = BTreeMap<String, String>;

// ─── Selection ───────────────────────────────────────────────────────────

/// What the engine reports on its `select` channel.
///
/// The listener receives `Option<&Selection>`: `None` means the selection
/// was cleared. Each variant may itself carry no entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Selection {
    FlameChartNode { node: Option<FlatTreeNode> },
    WaterfallNode { node: Option<WaterfallItem> },
    Mark { node: Option<Mark> },
}
