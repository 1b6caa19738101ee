use serde::Serialize;

use crate::core::types::Coordinate;
use crate::report::statistics::MatchStatistics;

/// Min / max / mean pictures per matched control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PictureStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

/// One line of the per-control-point breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ControlPointSummary {
    pub label: String,
    pub coordinate: Coordinate,
    pub pictures: usize,
    pub images: Vec<String>,
}

/// Statistics derived from a finished filtering run
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub matched_control_points: usize,
    pub total_control_points: usize,

    /// `None` when no control point was matched
    pub pictures: Option<PictureStats>,

    pub breakdown: Vec<ControlPointSummary>,
}

impl StatisticsReport {
    #[must_use]
    pub fn from_statistics(statistics: &MatchStatistics, total_control_points: usize) -> Self {
        // Labels follow control-point file order, not the order rows hit them
        let mut entries: Vec<_> = statistics.entries().iter().collect();
        entries.sort_by_key(|entry| entry.control_point.index);

        let breakdown: Vec<ControlPointSummary> = entries
            .into_iter()
            .map(|entry| ControlPointSummary {
                label: entry.control_point.label(),
                coordinate: entry.control_point.coordinate,
                pictures: entry.pictures(),
                images: entry.images().map(str::to_string).collect(),
            })
            .collect();

        Self {
            matched_control_points: statistics.matched_control_points(),
            total_control_points,
            pictures: picture_stats(&breakdown),
            breakdown,
        }
    }

    /// Human-readable report lines
    #[must_use]
    pub fn render_text(&self) -> Vec<String> {
        let mut lines = vec!["--- STATISTICS ---".to_string()];

        let Some(pictures) = self.pictures else {
            lines.push(format!(
                "No control points were matched (0/{})",
                self.total_control_points
            ));
            return lines;
        };

        lines.push(format!(
            "Control points matched: {}/{}",
            self.matched_control_points, self.total_control_points
        ));
        lines.push("Pictures per control point:".to_string());
        lines.push(format!("  Minimum: {}", pictures.min));
        lines.push(format!("  Maximum: {}", pictures.max));
        lines.push(format!("  Average: {:.1}", pictures.mean));
        lines.push(String::new());
        lines.push("Detailed breakdown:".to_string());
        for cp in &self.breakdown {
            lines.push(format!(
                "  {} {}: {} {}",
                cp.label,
                cp.coordinate,
                cp.pictures,
                if cp.pictures == 1 { "picture" } else { "pictures" }
            ));
        }

        lines
    }
}

fn picture_stats(breakdown: &[ControlPointSummary]) -> Option<PictureStats> {
    let counts = breakdown.iter().map(|cp| cp.pictures);
    let min = counts.clone().min()?;
    let max = counts.clone().max()?;
    let total: usize = counts.sum();

    #[allow(clippy::cast_precision_loss)] // counts are row numbers
    let mean = total as f64 / breakdown.len() as f64;

    Some(PictureStats { min, max, mean })
}
