//! Chart series derived from rows and summaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PredictionRow, SummaryAggregate, summary_entries, to_rows, to_summary, total_predictions};

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Pie,
    Bar,
    Line,
    Radar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [Self::Pie, Self::Bar, Self::Line, Self::Radar];

    /// Heading shown above the chart.
    pub fn title(self) -> &'static str {
        match self {
            Self::Pie => "Label Distribution",
            Self::Bar => "Count by Label",
            Self::Line => "Confidence per Prediction",
            Self::Radar => "Radar Overview",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pie => write!(f, "pie"),
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
            Self::Radar => write!(f, "radar"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pie" => Ok(Self::Pie),
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "radar" => Ok(Self::Radar),
            other => Err(format!("unknown chart type: {other} (expected pie, bar, line or radar)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Series types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfidenceBand {
    pub range_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub label: String,
    pub count: u64,
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidencePoint {
    pub index: u64,
    pub confidence_pct: f64,
    pub label: String,
}

/// Data for one chart, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "series", rename_all = "lowercase")]
pub enum ChartData {
    Pie(Vec<PieSlice>),
    Bar(Vec<PieSlice>),
    Line(Vec<ConfidencePoint>),
    Radar(Vec<RadarPoint>),
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pie(s) | Self::Bar(s) => s.is_empty(),
            Self::Line(s) => s.is_empty(),
            Self::Radar(s) => s.is_empty(),
        }
    }
}

/// Colour tier of a confidence bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn of(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Confidence as a percentage rounded to one decimal.
fn percent1(score: f64) -> f64 {
    round1(score * 100.0)
}

/// Whole-number percentage used for table bars.
pub fn confidence_percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Four fixed bands, always emitted in the same order.
pub fn to_confidence_histogram(rows: &[PredictionRow]) -> [ConfidenceBand; 4] {
    let mut counts = [0usize; 4];
    for row in rows {
        let pct = percent1(row.confidence_score);
        let band = if pct >= 90.0 {
            0
        } else if pct >= 70.0 {
            1
        } else if pct >= 50.0 {
            2
        } else {
            3
        };
        counts[band] += 1;
    }

    let labels = ["90-100%", "70-90%", "50-70%", "<50%"];
    std::array::from_fn(|i| ConfidenceBand {
        range_label: labels[i],
        count: counts[i],
    })
}

/// Share of each label in the total. Empty when `total` is 0.
pub fn to_radar_series(summary: &SummaryAggregate, total: u64) -> Vec<RadarPoint> {
    if total == 0 {
        return Vec::new();
    }

    summary
        .entries()
        .iter()
        .map(|e| RadarPoint {
            label: e.label.clone(),
            count: e.count,
            percent_of_total: round1(e.count as f64 / total as f64 * 100.0),
        })
        .collect()
}

/// One point per row for the confidence line chart.
pub fn to_confidence_series(rows: &[PredictionRow]) -> Vec<ConfidencePoint> {
    rows.iter()
        .map(|r| ConfidencePoint {
            index: r.index,
            confidence_pct: percent1(r.confidence_score),
            label: r.label.clone(),
        })
        .collect()
}

/// Mean confidence in percent, `None` without rows.
pub fn average_confidence(rows: &[PredictionRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(|r| percent1(r.confidence_score)).sum();
    Some(sum / rows.len() as f64)
}

/// Build the series for the selected chart type.
pub fn chart_data(kind: ChartKind, payload: &Value) -> ChartData {
    let slices = || {
        to_summary(payload)
            .entries()
            .iter()
            .map(|e| PieSlice {
                label: e.label.clone(),
                value: e.count,
            })
            .collect::<Vec<_>>()
    };

    match kind {
        ChartKind::Pie => ChartData::Pie(slices()),
        ChartKind::Bar => ChartData::Bar(slices()),
        ChartKind::Line => ChartData::Line(to_confidence_series(&to_rows(payload))),
        ChartKind::Radar => ChartData::Radar(to_radar_series(
            &summary_entries(payload),
            total_predictions(payload),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(score: f64) -> PredictionRow {
        PredictionRow {
            index: 1,
            input_text: None,
            label: "positive".to_string(),
            confidence_score: score,
        }
    }

    #[test]
    fn histogram_band_edges() {
        let rows: Vec<_> = [0.9, 0.8999, 0.7, 0.69, 0.5, 0.0].into_iter().map(row).collect();
        let h = to_confidence_histogram(&rows);
        // 0.8999 rounds to 90.0% and lands in the top band
        assert_eq!(h[0].count, 2);
        assert_eq!(h[1].count, 1);
        assert_eq!(h[2].count, 2);
        assert_eq!(h[3].count, 1);
    }

    #[test]
    fn histogram_of_nothing_still_has_four_bands() {
        let h = to_confidence_histogram(&[]);
        assert_eq!(h.len(), 4);
        assert!(h.iter().all(|b| b.count == 0));
    }

    #[test]
    fn radar_rounds_to_one_decimal() {
        let summary: SummaryAggregate = [("positive".to_string(), 1), ("negative".to_string(), 2)]
            .into_iter()
            .collect();
        let radar = to_radar_series(&summary, 3);
        assert_eq!(radar[0].percent_of_total, 33.3);
        assert_eq!(radar[1].percent_of_total, 66.7);
    }

    #[test]
    fn radar_with_zero_total_is_empty() {
        let summary: SummaryAggregate = [("positive".to_string(), 0)].into_iter().collect();
        assert!(to_radar_series(&summary, 0).is_empty());
    }

    #[test]
    fn tiers() {
        assert_eq!(ConfidenceTier::of(0.93), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::of(0.8), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::of(0.65), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::of(0.2), ConfidenceTier::Low);
    }

    #[test]
    fn percent_rounding() {
        assert_eq!(confidence_percent(0.93), 93);
        assert_eq!(confidence_percent(0.006), 1);
        assert_eq!(confidence_percent(1.2), 100);
    }

    #[test]
    fn average_of_rows() {
        assert_eq!(average_confidence(&[]), None);
        let avg = average_confidence(&[row(0.9), row(0.7)]).unwrap();
        assert!((avg - 80.0).abs() < 1e-9);
    }

    #[test]
    fn chart_kind_parse_and_display() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.to_string().parse::<ChartKind>(), Ok(kind));
        }
        assert!("donut".parse::<ChartKind>().is_err());
        assert_eq!("RADAR".parse::<ChartKind>(), Ok(ChartKind::Radar));
    }

    #[test]
    fn radar_chart_includes_zero_entries() {
        let payload = json!({
            "summary": {"positive": 3, "negative": 0, "neutral": 1},
            "total_predictions": 4
        });
        let ChartData::Radar(points) = chart_data(ChartKind::Radar, &payload) else {
            panic!("expected radar data");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].percent_of_total, 75.0);
        assert_eq!(points[1].percent_of_total, 0.0);
    }

    #[test]
    fn bar_chart_uses_nonzero_summary() {
        let payload = json!({"summary": {"positive": 1, "negative": 0}});
        assert_eq!(
            chart_data(ChartKind::Bar, &payload),
            ChartData::Bar(vec![PieSlice {
                label: "positive".to_string(),
                value: 1
            }])
        );
    }
}
