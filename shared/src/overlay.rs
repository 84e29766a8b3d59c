//! Maps normalized detections onto the pixel space of the displayed image.
//!
//! Everything here is a plain function of its inputs. Callers re-run it on
//! every resize and image load instead of caching results.

use crate::detection::Detection;

/// Rendered size of the preview container, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RenderRect {
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px;",
            self.left, self.top, self.width, self.height
        )
    }
}

/// A rectangle plus the caption drawn on top of it.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayBox {
    pub rect: RenderRect,
    pub label: String,
    pub confidence: f32,
}

fn project(detection: &Detection, width: f64, height: f64) -> Option<RenderRect> {
    let b = &detection.bbox;
    let rect = RenderRect {
        left: f64::from(b.x1) * width,
        top: f64::from(b.y1) * height,
        width: f64::from(b.x2 - b.x1) * width,
        height: f64::from(b.y2 - b.y1) * height,
    };

    // Also rejects NaN from malformed input.
    if rect.width > 0.0 && rect.height > 0.0 {
        Some(rect)
    } else {
        None
    }
}

pub fn compute_rects(detections: &[Detection], width: f64, height: f64) -> Vec<RenderRect> {
    detections
        .iter()
        .filter_map(|d| project(d, width, height))
        .collect()
}

pub fn overlay_boxes(detections: &[Detection], size: ContainerSize) -> Vec<OverlayBox> {
    detections
        .iter()
        .filter_map(|d| {
            project(d, size.width, size.height).map(|rect| OverlayBox {
                rect,
                label: d.label.clone(),
                confidence: d.confidence,
            })
        })
        .collect()
}

pub fn filter_by_confidence(detections: &[Detection], threshold: f32) -> Vec<Detection> {
    detections
        .iter()
        .filter(|d| d.confidence >= threshold)
        .cloned()
        .collect()
}
