use js_sys::{Object, Promise, Reflect};
use shared::DemoError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;
const JPEG_QUALITY: f64 = 0.9;

fn unavailable(reason: &str) -> DemoError {
    DemoError::InputNotReady(format!("Camera unavailable: {}", reason))
}

/// Live camera stream. Tracks are stopped when the handle is dropped.
pub struct CameraStream {
    stream: MediaStream,
}

impl CameraStream {
    /// Asks for the rear-facing camera.
    pub async fn open() -> Result<Self, DemoError> {
        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| unavailable("this browser has no media devices"))?;

        let video = Object::new();
        let _ = Reflect::set(&video, &JsValue::from_str("facingMode"), &JsValue::from_str("environment"));
        let _ = Reflect::set(&video, &JsValue::from_str("width"), &JsValue::from(FRAME_WIDTH));
        let _ = Reflect::set(&video, &JsValue::from_str("height"), &JsValue::from(FRAME_HEIGHT));

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::FALSE);
        constraints.set_video(&video);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|_| unavailable("permission request failed"))?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(|_| unavailable("permission denied"))?
            .dyn_into::<MediaStream>()
            .map_err(|_| unavailable("unexpected stream type"))?;

        Ok(Self { stream })
    }

    /// Binds the stream to `video` unless it is already showing it.
    pub fn attach(&self, video: &HtmlVideoElement) {
        if video.src_object().as_ref() != Some(&self.stream) {
            video.set_muted(true);
            video.set_src_object(Some(&self.stream));
            let _ = video.play();
        }
    }

    fn stop(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Grabs the current video frame as a JPEG blob.
pub async fn capture_frame(video: HtmlVideoElement) -> Result<web_sys::Blob, DemoError> {
    // HAVE_CURRENT_DATA
    if video.ready_state() < 2 || video.video_width() == 0 || video.video_height() == 0 {
        return Err(DemoError::camera_not_ready());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(DemoError::camera_not_ready)?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(DemoError::camera_not_ready)?;
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into().ok())
        .ok_or_else(DemoError::camera_not_ready)?;
    context
        .draw_image_with_html_video_element(&video, 0.0, 0.0)
        .map_err(|_| DemoError::camera_not_ready())?;

    let promise = Promise::new(&mut |resolve, reject| {
        if canvas
            .to_blob_with_type_and_encoder_options(&resolve, "image/jpeg", &JsValue::from(JPEG_QUALITY))
            .is_err()
        {
            let _ = reject.call0(&JsValue::NULL);
        }
    });

    JsFuture::from(promise)
        .await
        .ok()
        .and_then(|blob| blob.dyn_into::<web_sys::Blob>().ok())
        .ok_or_else(DemoError::camera_not_ready)
}
