pub mod api;
pub mod assistant;
pub mod demo;
pub mod detection;
pub mod error;
pub mod i18n;
pub mod overlay;

pub use demo::{DemoState, Mode, RequestResult, RequestToken, Source, ViewConfig};
pub use detection::{BoundingBox, Detection, DetectionReport, ImageSize, Payload, SpeciesPrediction};
pub use error::DemoError;
pub use i18n::{Label, Language};
pub use overlay::{ContainerSize, OverlayBox, RenderRect};
