use super::super::{ Model, Msg };
use super::utils::{ self, extract_image_files };
use crate::api;
use crate::camera::{ self, CameraStream };
use gloo_file::{ File as GlooFile, ObjectUrl };
use gloo_timers::callback::{ Interval, Timeout };
use shared::assistant::{ Phase, TYPEWRITER_TICK_MS, Typewriter, distinct_labels, fallback_message };
use shared::{ DemoError, Mode, Payload, RequestToken, Source };
use wasm_bindgen_futures::spawn_local;
use web_sys::{ DragEvent, HtmlVideoElement };
use yew::prelude::*;

pub fn handle_switch_mode(model: &mut Model, mode: Mode) -> bool {
    log::info!("Switching demo mode to {}", mode);
    model.demo.switch_mode(mode);
    model.assistant.hide();
    true
}

pub fn handle_set_source(model: &mut Model, ctx: &Context<Model>, source: Source) -> bool {
    if !model.demo.set_source(source) {
        return false;
    }

    match source {
        Source::Camera => {
            let generation = model.demo.source_generation();
            let link = ctx.link().clone();
            spawn_local(async move {
                match CameraStream::open().await {
                    Ok(stream) => link.send_message(Msg::CameraStarted(generation, stream)),
                    Err(e) => link.send_message(Msg::CameraFailed(generation, e)),
                }
            });
        }
        // Dropping the stream stops its tracks.
        Source::Upload => {
            model.camera = None;
        }
    }
    true
}

pub fn handle_camera_started(model: &mut Model, generation: u64, stream: CameraStream) -> bool {
    // Dropping a stale stream stops its tracks.
    if !model.demo.accepts_camera(generation) {
        log::debug!("Releasing camera opened for source generation {}", generation);
        return false;
    }
    model.camera = Some(stream);
    true
}

pub fn handle_camera_failed(model: &mut Model, generation: u64, error: DemoError) -> bool {
    if !model.demo.accepts_camera(generation) {
        log::debug!("Ignoring camera failure for source generation {}: {}", generation, error);
        return false;
    }
    handle_input_error(model, error)
}

pub fn handle_set_threshold(model: &mut Model, ctx: &Context<Model>, value: f32) -> bool {
    if !model.demo.set_confidence_threshold(value) {
        return false;
    }
    refresh_assistant(model, ctx);
    true
}

pub fn handle_toggle_language(model: &mut Model) -> bool {
    model.language = model.language.toggle();
    utils::store_language(model.language);
    utils::apply_language(model.language);
    true
}

pub fn handle_input_error(model: &mut Model, error: DemoError) -> bool {
    log::warn!("Input rejected: {}", error);
    model.demo.report_input_error(error);
    model.assistant.hide();
    true
}

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    let file_name = file.name();
    let blob: &web_sys::Blob = file.as_ref();
    let blob = blob.clone();
    let preview = ObjectUrl::from(file);
    submit_image(model, ctx, blob, file_name, preview);
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let first_image = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| extract_image_files(&file_list).into_iter().next());

    match first_image {
        Some(file) => handle_file_chosen(model, ctx, file),
        None => handle_input_error(
            model,
            DemoError::InputNotReady("Please drop an image file.".into())
        ),
    }
}

pub fn handle_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    let video = model.camera
        .as_ref()
        .and_then(|_| model.video_ref.cast::<HtmlVideoElement>());
    let Some(video) = video else {
        return handle_input_error(model, DemoError::camera_not_ready());
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match camera::capture_frame(video).await {
            Ok(blob) => link.send_message(Msg::CaptureReady(blob)),
            Err(e) => link.send_message(Msg::InputRejected(e)),
        }
    });
    false
}

pub fn handle_capture_ready(model: &mut Model, ctx: &Context<Model>, blob: web_sys::Blob) -> bool {
    let preview = ObjectUrl::from(gloo_file::Blob::from(blob.clone()));
    submit_image(model, ctx, blob, "capture.jpg".to_string(), preview);
    true
}

fn submit_image(
    model: &mut Model,
    ctx: &Context<Model>,
    blob: web_sys::Blob,
    file_name: String,
    preview: ObjectUrl
) {
    model.assistant.hide();
    let mode = model.demo.mode();
    let token = model.demo.submit(preview);
    log::info!("Submitting {} ({} bytes) as request #{} to {}", file_name, blob.size(), token.value(), mode.endpoint());

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::classify(mode, &blob, &file_name).await {
            Ok(payload) => link.send_message(Msg::Response(token, payload)),
            Err(e) => link.send_message(Msg::Failed(token, e)),
        }
    });
}

pub fn handle_response(
    model: &mut Model,
    ctx: &Context<Model>,
    token: RequestToken,
    payload: Payload
) -> bool {
    if !model.demo.on_response(token, payload) {
        log::debug!("Dropping stale response for request #{}", token.value());
        return false;
    }
    refresh_assistant(model, ctx);
    true
}

pub fn handle_failed(model: &mut Model, token: RequestToken, error: DemoError) -> bool {
    if !model.demo.on_error(token, error.clone()) {
        log::debug!("Dropping stale failure for request #{}: {}", token.value(), error);
        return false;
    }
    log::warn!("Request #{} failed: {}", token.value(), error);
    true
}

pub fn handle_measure_container(model: &mut Model) -> bool {
    match utils::measure(&model.preview_ref) {
        Some(size) if size != model.container => {
            model.container = size;
            true
        }
        _ => false,
    }
}

/// Shows the assistant for a disease result with visible detections, hides it
/// otherwise. An already running sequence for the same labels is left alone.
fn refresh_assistant(model: &mut Model, ctx: &Context<Model>) {
    let labels = if model.demo.report().is_some() {
        distinct_labels(&model.demo.filtered_detections())
    } else {
        Vec::new()
    };

    if labels.is_empty() {
        model.assistant.hide();
        return;
    }
    if model.assistant.timeline.is_visible() && model.assistant.labels == labels {
        return;
    }

    let generation = model.assistant.start(labels);
    schedule_phase(model, ctx, generation);
}

fn schedule_phase(model: &mut Model, ctx: &Context<Model>, generation: u64) {
    model.assistant.phase_timeout = model.assistant.timeline.delay().map(|ms| {
        let link = ctx.link().clone();
        Timeout::new(ms, move || link.send_message(Msg::AssistantAdvance(generation)))
    });
}

pub fn handle_assistant_advance(model: &mut Model, ctx: &Context<Model>, generation: u64) -> bool {
    match model.assistant.timeline.advance(generation) {
        None => false,
        Some(Phase::Chat) => {
            model.assistant.phase_timeout = None;
            let labels = model.assistant.labels.clone();
            let language = model.language;
            let link = ctx.link().clone();
            spawn_local(async move {
                let reply = api::recommend(labels, language).await;
                link.send_message(Msg::Recommendation(generation, reply));
            });
            true
        }
        Some(_) => {
            schedule_phase(model, ctx, generation);
            true
        }
    }
}

pub fn handle_recommendation(
    model: &mut Model,
    ctx: &Context<Model>,
    generation: u64,
    reply: Result<String, DemoError>
) -> bool {
    if generation != model.assistant.timeline.generation() {
        return false;
    }

    match reply {
        Ok(text) => {
            model.assistant.reply = Some(Typewriter::new(&text));
            let link = ctx.link().clone();
            model.assistant.typing = Some(
                Interval::new(TYPEWRITER_TICK_MS, move || link.send_message(Msg::TypeTick))
            );
        }
        Err(e) => {
            log::warn!("Recommendation unavailable, showing care guide: {}", e);
            model.assistant.reply = Some(
                Typewriter::completed(&fallback_message(&model.assistant.labels))
            );
        }
    }
    true
}

pub fn handle_type_tick(model: &mut Model) -> bool {
    match model.assistant.reply.as_mut() {
        Some(typewriter) => {
            if !typewriter.tick() {
                model.assistant.typing = None;
                return false;
            }
            true
        }
        None => {
            model.assistant.typing = None;
            false
        }
    }
}
