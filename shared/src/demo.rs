//! State of the live demo widget.
//!
//! One `DemoState` per widget. It owns the view configuration, the single
//! live request result and the preview handle of the submitted image. Views
//! read derived data (filtered detections, overlay rectangles) from it and
//! never mutate it directly.

use strum_macros::{Display, EnumString};

use crate::api;
use crate::detection::{Detection, DetectionReport, Payload, SpeciesPrediction};
use crate::error::DemoError;
use crate::overlay::{self, ContainerSize, OverlayBox, RenderRect};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Species,
    #[default]
    Disease,
}

impl Mode {
    /// Gateway route classifying images in this mode.
    pub fn path(&self) -> &'static str {
        match self {
            Mode::Species => api::SPECIES_PATH,
            Mode::Disease => api::DISEASE_PATH,
        }
    }

    /// Path segment of the upstream endpoint. The gateway route is the same
    /// segment under [`api::API_PREFIX`].
    pub fn endpoint(&self) -> &'static str {
        self.path().trim_start_matches(api::API_PREFIX)
    }

    pub fn accepts(&self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (Mode::Species, Payload::Species(_)) | (Mode::Disease, Payload::Detections(_))
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Source {
    Camera,
    #[default]
    Upload,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub mode: Mode,
    pub source: Source,
    pub confidence_threshold: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            source: Source::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Identifies one submitted request. Tokens only ever increase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestResult {
    #[default]
    Idle,
    Loading,
    Success(Payload),
    Failed(String),
}

/// `P` is the preview handle. Dropping it must release whatever it holds.
#[derive(Debug)]
pub struct DemoState<P> {
    config: ViewConfig,
    result: RequestResult,
    preview: Option<P>,
    issued: u64,
    pending: Option<RequestToken>,
    source_generation: u64,
}

impl<P> Default for DemoState<P> {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl<P> DemoState<P> {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            result: RequestResult::Idle,
            preview: None,
            issued: 0,
            pending: None,
            source_generation: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn source(&self) -> Source {
        self.config.source
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.config.confidence_threshold
    }

    pub fn result(&self) -> &RequestResult {
        &self.result
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.result, RequestResult::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.result {
            RequestResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Starts a new request. Any earlier pending request becomes stale.
    pub fn submit(&mut self, preview: P) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.pending = Some(token);
        // Replacing the old handle drops it, which releases it.
        self.preview = Some(preview);
        self.result = RequestResult::Loading;
        token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.pending == Some(token) && self.is_loading()
    }

    /// Returns `false` when the response was dropped as stale.
    pub fn on_response(&mut self, token: RequestToken, payload: Payload) -> bool {
        if !self.is_current(token) || !self.config.mode.accepts(&payload) {
            return false;
        }
        self.pending = None;
        self.result = RequestResult::Success(payload);
        true
    }

    pub fn on_error(&mut self, token: RequestToken, error: DemoError) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.pending = None;
        self.result = RequestResult::Failed(error.to_string());
        true
    }

    /// Failures that happen before any request is sent, such as a camera
    /// frame not being available.
    pub fn report_input_error(&mut self, error: DemoError) {
        self.pending = None;
        self.result = RequestResult::Failed(error.to_string());
    }

    pub fn dismiss_error(&mut self) -> bool {
        if matches!(self.result, RequestResult::Failed(_)) {
            self.result = RequestResult::Idle;
            true
        } else {
            false
        }
    }

    /// Always resets to `Idle` and drops the preview. The confidence
    /// threshold is kept.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
        self.pending = None;
        self.preview = None;
        self.result = RequestResult::Idle;
    }

    pub fn set_source(&mut self, source: Source) -> bool {
        if self.config.source == source {
            return false;
        }
        self.config.source = source;
        self.source_generation += 1;
        true
    }

    /// Bumped on every effective source change. A camera opened for an
    /// earlier generation must be released instead of shown.
    pub fn source_generation(&self) -> u64 {
        self.source_generation
    }

    pub fn accepts_camera(&self, generation: u64) -> bool {
        self.config.source == Source::Camera && generation == self.source_generation
    }

    /// Clamps into 0..1. Returns whether the stored value changed.
    pub fn set_confidence_threshold(&mut self, threshold: f32) -> bool {
        if threshold.is_nan() {
            return false;
        }
        let threshold = threshold.clamp(0.0, 1.0);
        if threshold == self.config.confidence_threshold {
            return false;
        }
        self.config.confidence_threshold = threshold;
        true
    }

    pub fn species(&self) -> Option<&SpeciesPrediction> {
        match &self.result {
            RequestResult::Success(Payload::Species(p)) => Some(p),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&DetectionReport> {
        match &self.result {
            RequestResult::Success(Payload::Detections(r)) => Some(r),
            _ => None,
        }
    }

    pub fn filtered_detections(&self) -> Vec<Detection> {
        self.report()
            .map(|r| overlay::filter_by_confidence(&r.detections, self.config.confidence_threshold))
            .unwrap_or_default()
    }

    pub fn render_rects(&self, size: ContainerSize) -> Vec<RenderRect> {
        overlay::compute_rects(&self.filtered_detections(), size.width, size.height)
    }

    pub fn overlay_boxes(&self, size: ContainerSize) -> Vec<OverlayBox> {
        overlay::overlay_boxes(&self.filtered_detections(), size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Preview {
        released: Rc<Cell<usize>>,
    }

    impl Drop for Preview {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn preview(counter: &Rc<Cell<usize>>) -> Preview {
        Preview {
            released: Rc::clone(counter),
        }
    }

    fn rose() -> Payload {
        Payload::Species(SpeciesPrediction {
            prediction: "rose".into(),
            confidence: 0.91,
        })
    }

    fn two_detections() -> Payload {
        Payload::Detections(DetectionReport::new(vec![
            Detection::new("rust", 0.10, BoundingBox::new(0.0, 0.0, 0.5, 0.5)),
            Detection::new("blight", 0.80, BoundingBox::new(0.25, 0.25, 0.75, 0.75)),
        ]))
    }

    #[test]
    fn species_round_trip() {
        let mut state: DemoState<()> = DemoState::default();
        state.switch_mode(Mode::Species);
        let token = state.submit(());
        assert!(state.is_loading());
        assert!(state.on_response(token, rose()));

        let p = state.species().unwrap();
        assert_eq!(p.prediction, "rose");
        assert_eq!(p.percent(), 91);
        assert!(matches!(state.result(), RequestResult::Success(_)));
    }

    #[test]
    fn disease_threshold_filters_list_and_rects() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        assert!(state.on_response(token, two_detections()));

        let kept = state.filtered_detections();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "blight");

        let rects = state.render_rects(ContainerSize::new(200.0, 100.0));
        assert_eq!(
            rects,
            vec![RenderRect {
                left: 50.0,
                top: 25.0,
                width: 100.0,
                height: 50.0
            }]
        );
    }

    #[test]
    fn lowering_threshold_recomputes() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.on_response(token, two_detections());

        assert!(state.set_confidence_threshold(0.05));
        assert_eq!(state.filtered_detections().len(), 2);
        assert_eq!(state.render_rects(ContainerSize::new(100.0, 100.0)).len(), 2);
    }

    #[test]
    fn same_threshold_twice_is_stable() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.on_response(token, two_detections());

        state.set_confidence_threshold(0.5);
        let first = state.filtered_detections();
        assert!(!state.set_confidence_threshold(0.5));
        assert_eq!(first, state.filtered_detections());
    }

    #[test]
    fn threshold_is_clamped_and_ignores_nan() {
        let mut state: DemoState<()> = DemoState::default();
        state.set_confidence_threshold(1.4);
        assert_eq!(state.confidence_threshold(), 1.0);
        assert!(!state.set_confidence_threshold(f32::NAN));
        assert_eq!(state.confidence_threshold(), 1.0);
    }

    #[test]
    fn mode_switch_while_loading_drops_late_response() {
        let mut state: DemoState<()> = DemoState::new(ViewConfig {
            mode: Mode::Species,
            ..ViewConfig::default()
        });
        let token = state.submit(());
        state.switch_mode(Mode::Disease);

        assert!(!state.on_response(token, rose()));
        assert_eq!(state.result(), &RequestResult::Idle);
        assert!(state.species().is_none());
    }

    #[test]
    fn newer_submit_supersedes_older() {
        let mut state: DemoState<()> = DemoState::default();
        let first = state.submit(());
        let second = state.submit(());
        assert!(second > first);

        assert!(!state.on_response(first, two_detections()));
        assert!(state.is_loading());
        assert!(!state.on_error(first, DemoError::NetworkOrServer("late".into())));
        assert!(state.is_loading());

        assert!(state.on_response(second, two_detections()));
        assert!(state.report().is_some());
    }

    #[test]
    fn response_after_completion_is_ignored() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.on_response(token, two_detections());
        assert!(!state.on_error(token, DemoError::NetworkOrServer("dup".into())));
        assert!(state.report().is_some());
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        assert!(!state.on_response(token, rose()));
        assert!(state.is_loading());
    }

    #[test]
    fn failure_is_surfaced_and_dismissible() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        assert!(state.on_error(token, DemoError::from_status(500, "boom")));
        assert_eq!(state.error(), Some("Server error: 500 - boom"));

        assert!(state.dismiss_error());
        assert_eq!(state.result(), &RequestResult::Idle);
        assert!(!state.dismiss_error());
    }

    #[test]
    fn input_error_invalidates_pending_request() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.report_input_error(DemoError::camera_not_ready());
        assert_eq!(state.error(), Some("Camera not ready. Try again in a second."));
        assert!(!state.on_response(token, two_detections()));
    }

    #[test]
    fn submit_after_failure_clears_error() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.on_error(token, DemoError::NetworkOrServer("offline".into()));
        state.submit(());
        assert!(state.error().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn previews_are_released_on_replace_and_mode_switch() {
        let released = Rc::new(Cell::new(0));
        let mut state = DemoState::default();

        state.submit(preview(&released));
        assert_eq!(released.get(), 0);
        state.submit(preview(&released));
        assert_eq!(released.get(), 1);

        state.switch_mode(Mode::Species);
        assert_eq!(released.get(), 2);
        assert!(state.preview().is_none());
    }

    #[test]
    fn threshold_survives_mode_switch() {
        let mut state: DemoState<()> = DemoState::default();
        state.set_confidence_threshold(0.6);
        state.switch_mode(Mode::Species);
        state.switch_mode(Mode::Disease);
        assert_eq!(state.confidence_threshold(), 0.6);
    }

    #[test]
    fn source_toggle_keeps_result() {
        let mut state: DemoState<()> = DemoState::default();
        let token = state.submit(());
        state.on_response(token, two_detections());
        assert!(state.set_source(Source::Camera));
        assert!(!state.set_source(Source::Camera));
        assert!(state.report().is_some());
    }

    #[test]
    fn camera_opened_for_an_earlier_toggle_is_rejected() {
        let mut state: DemoState<()> = DemoState::default();
        assert!(state.set_source(Source::Camera));
        let first = state.source_generation();
        assert!(state.set_source(Source::Upload));
        assert!(state.set_source(Source::Camera));
        let second = state.source_generation();

        assert!(!state.accepts_camera(first));
        assert!(state.accepts_camera(second));
    }

    #[test]
    fn camera_is_rejected_after_leaving_camera_source() {
        let mut state: DemoState<()> = DemoState::default();
        state.set_source(Source::Camera);
        let generation = state.source_generation();
        state.set_source(Source::Upload);
        assert!(!state.accepts_camera(generation));

        // Re-selecting the current source does not invalidate an open.
        state.set_source(Source::Camera);
        let generation = state.source_generation();
        assert!(!state.set_source(Source::Camera));
        assert!(state.accepts_camera(generation));
    }

    #[test]
    fn mode_strings() {
        use std::str::FromStr;
        assert_eq!(Mode::Species.to_string(), "species");
        assert_eq!(Mode::from_str("disease").unwrap(), Mode::Disease);
        assert_eq!(Mode::Disease.endpoint(), "predict_disease");
        assert_eq!(Source::default(), Source::Upload);
    }

    #[test]
    fn gateway_routes_mirror_upstream_endpoints() {
        assert_eq!(Mode::Species.path(), "/api/predict_flower");
        assert_eq!(Mode::Species.endpoint(), "predict_flower");
        for mode in [Mode::Species, Mode::Disease] {
            assert_eq!(mode.path(), format!("{}{}", api::API_PREFIX, mode.endpoint()));
        }
    }
}
