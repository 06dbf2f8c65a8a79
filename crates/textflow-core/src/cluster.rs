//! Line clusterer: groups geometric detections into horizontal text lines.
//!
//! # Algorithm
//!
//! 1. Sort detections by the vertical midpoint of corners 0 and 2
//!    (stable, so ties keep backend order).
//! 2. Sweep top to bottom. The first member of each line fixes its anchor
//!    (four-corner mean y). A detection farther than the threshold from the
//!    anchor closes the line and starts a new one.
//!
//! Every member of a line lies within the threshold of its anchor, never
//! merely within the threshold of its predecessor.

use crate::types::{Detection, Line};
use log::{debug, trace};

/// Partition detections into top-to-bottom ordered lines.
///
/// Members of each returned line are in sweep order; horizontal ordering is
/// left to the composer. An empty slice yields no lines.
#[must_use = "clustered lines are returned but not used"]
pub fn cluster_lines(detections: &[Detection], line_height_threshold: f64) -> Vec<Line<'_>> {
    let mut sorted: Vec<&Detection> = detections.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .diagonal_center_y()
            .total_cmp(&b.bbox.diagonal_center_y())
    });

    let mut lines: Vec<Line<'_>> = Vec::new();

    for detection in sorted {
        let center = detection.bbox.mean_y();
        let starts_new_line = lines
            .last()
            .map_or(true, |line| (center - line.anchor).abs() > line_height_threshold);

        if starts_new_line {
            trace!("Starting line {} at anchor {:.1}", lines.len(), center);
            lines.push(Line::start(detection));
        } else if let Some(line) = lines.last_mut() {
            line.detections.push(detection);
        }
    }

    debug!(
        "Clustered {} detection(s) into {} line(s)",
        detections.len(),
        lines.len()
    );
    lines
}
