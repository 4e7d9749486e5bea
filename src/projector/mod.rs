//! Result projector: raw API JSON → display-ready shapes.
//!
//! Everything here is a pure function of its input. Missing or mistyped
//! fields are defaulted rather than reported, so a partially malformed
//! payload still renders whatever it does contain.

pub mod charts;
pub mod fields;

use serde::Serialize;
use serde_json::Value;

pub use charts::{
    ChartData, ChartKind, ConfidenceBand, ConfidencePoint, ConfidenceTier, PieSlice, RadarPoint,
    average_confidence, chart_data, confidence_percent, to_confidence_histogram,
    to_confidence_series, to_radar_series,
};
pub use fields::{CONFIDENCE_FIELDS, FieldResolver, LABEL_FIELDS};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One prediction, normalized across task-specific field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub index: u64,
    pub input_text: Option<String>,
    pub label: String,
    /// Always within `[0, 1]`.
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub label: String,
    pub count: u64,
}

/// Label → count mapping, in the order the API returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryAggregate {
    entries: Vec<SummaryEntry>,
}

impl SummaryAggregate {
    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, u64)> for SummaryAggregate {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(label, count)| SummaryEntry { label, count })
                .collect(),
        }
    }
}

/// Output of the captioning task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionResult {
    pub caption: String,
    pub model_name: Option<String>,
    pub confidence: Option<f64>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// One row per element of `payload.predictions`.
pub fn to_rows(payload: &Value) -> Vec<PredictionRow> {
    let Some(predictions) = payload.get("predictions").and_then(Value::as_array) else {
        return Vec::new();
    };

    predictions
        .iter()
        .enumerate()
        .map(|(pos, p)| PredictionRow {
            index: p
                .get("id")
                .and_then(Value::as_u64)
                .unwrap_or(pos as u64 + 1),
            input_text: p.get("text").and_then(Value::as_str).map(str::to_string),
            label: LABEL_FIELDS.str(p).unwrap_or_default().to_string(),
            confidence_score: CONFIDENCE_FIELDS.f64(p).unwrap_or(0.0).clamp(0.0, 1.0),
        })
        .collect()
}

/// Every summary entry, zero counts included.
pub fn summary_entries(payload: &Value) -> SummaryAggregate {
    let Some(summary) = payload.get("summary").and_then(Value::as_object) else {
        return SummaryAggregate::default();
    };

    summary
        .iter()
        .map(|(label, count)| (label.clone(), count.as_u64().unwrap_or(0)))
        .collect()
}

/// The summary with zero-count entries dropped, for charts.
pub fn to_summary(payload: &Value) -> SummaryAggregate {
    summary_entries(payload)
        .entries
        .into_iter()
        .filter(|e| e.count > 0)
        .map(|e| (e.label, e.count))
        .collect()
}

/// `total_predictions` as reported by the API, 0 when absent.
pub fn total_predictions(payload: &Value) -> u64 {
    payload
        .get("total_predictions")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// The caption, if this is a captioning response.
pub fn to_caption(payload: &Value) -> Option<CaptionResult> {
    let caption = payload.get("caption").and_then(Value::as_str)?;
    Some(CaptionResult {
        caption: caption.to_string(),
        model_name: payload
            .get("model_name")
            .and_then(Value::as_str)
            .map(str::to_string),
        confidence: payload.get("confidence").and_then(Value::as_f64),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
