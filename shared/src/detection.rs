use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized image coordinates (0..1).
///
/// Fields missing from the wire default to 0, which yields a zero-area box
/// that the overlay mapper drops.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    #[serde(default)]
    pub x1: f32,
    #[serde(default)]
    pub y1: f32,
    #[serde(default)]
    pub x2: f32,
    #[serde(default)]
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Detection {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default, rename = "box")]
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    pub fn percent(&self) -> u32 {
        percent(self.confidence)
    }
}

/// Response of the species endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SpeciesPrediction {
    #[serde(default)]
    pub prediction: String,
    #[serde(default)]
    pub confidence: f32,
}

impl SpeciesPrediction {
    pub fn percent(&self) -> u32 {
        percent(self.confidence)
    }

    /// Confidence as shown next to the species name, e.g. `91%`.
    pub fn display_confidence(&self) -> String {
        format!("{}%", self.percent())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Response of the disease endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DetectionReport {
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default, deserialize_with = "lenient_image_size")]
    pub image: Option<ImageSize>,
}

impl DetectionReport {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            image: None,
        }
    }
}

// The detector reports `{"width": null, "height": null}` when it could not
// read the source dimensions.
fn lenient_image_size<'de, D>(deserializer: D) -> Result<Option<ImageSize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Raw {
        width: Option<u32>,
        height: Option<u32>,
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| match (r.width, r.height) {
        (Some(width), Some(height)) => Some(ImageSize { width, height }),
        _ => None,
    }))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Species(SpeciesPrediction),
    Detections(DetectionReport),
}

/// Confidence in 0..1 rounded to a whole percentage.
pub fn percent(confidence: f32) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_box_fields_default_to_zero() {
        let d: Detection =
            serde_json::from_str(r#"{"label":"rust","confidence":0.4,"box":{"x1":0.2}}"#).unwrap();
        assert_eq!(d.bbox, BoundingBox::new(0.2, 0.0, 0.0, 0.0));
    }

    #[test]
    fn missing_box_and_confidence_degrade() {
        let d: Detection = serde_json::from_str(r#"{"label":"blight"}"#).unwrap();
        assert_eq!(d.confidence, 0.0);
        assert_eq!(d.bbox, BoundingBox::default());
    }

    #[test]
    fn species_percent_rounds() {
        let p: SpeciesPrediction =
            serde_json::from_str(r#"{"prediction":"rose","confidence":0.91}"#).unwrap();
        assert_eq!(p.prediction, "rose");
        assert_eq!(p.percent(), 91);
        assert_eq!(percent(0.125), 13);
        assert_eq!(percent(1.7), 100);
    }

    #[test]
    fn species_confidence_is_shown_as_whole_percent() {
        let p: SpeciesPrediction =
            serde_json::from_str(r#"{"prediction":"rose","confidence":0.91}"#).unwrap();
        assert_eq!(p.display_confidence(), "91%");

        let missing: SpeciesPrediction = serde_json::from_str(r#"{"prediction":"tulip"}"#).unwrap();
        assert_eq!(missing.display_confidence(), "0%");
    }

    #[test]
    fn report_with_null_image_dimensions() {
        let r: DetectionReport = serde_json::from_str(
            r#"{"detections":[],"image":{"width":null,"height":null}}"#,
        )
        .unwrap();
        assert!(r.image.is_none());

        let r: DetectionReport = serde_json::from_str(
            r#"{"detections":[],"image":{"width":640,"height":480}}"#,
        )
        .unwrap();
        assert_eq!(r.image, Some(ImageSize { width: 640, height: 480 }));
    }

    #[test]
    fn report_without_detections_key() {
        let r: DetectionReport = serde_json::from_str("{}").unwrap();
        assert!(r.detections.is_empty());
    }
}
