use super::super::{ Model, Msg };
use super::results::render_results;
use super::utils::{ debounce, extract_image_files, trigger_file_input };
use shared::{ DemoError, Label, Mode, Source };
use web_sys::{ DragEvent, HtmlInputElement };
use yew::prelude::*;

pub fn render_live_demo(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;
    let mode = model.demo.mode();

    html! {
        <section id="demo" class="live-demo">
            <h2>{ Label::DemoTitle.text(language) }</h2>
            <p class="subtitle">{ Label::DemoSubtitle.text(language) }</p>

            { render_mode_tabs(model, ctx) }
            <p class="mode-tip">
                { match mode {
                    Mode::Species => Label::SpeciesTip.text(language),
                    Mode::Disease => Label::DiseaseTip.text(language),
                } }
            </p>

            <div class="demo-grid">
                <div class="demo-input">
                    { render_source_toggle(model, ctx) }
                    { if mode == Mode::Disease { render_threshold(model, ctx) } else { html! {} } }
                    { match model.demo.source() {
                        Source::Upload => render_upload_area(model, ctx),
                        Source::Camera => render_camera_panel(model, ctx),
                    } }
                </div>
                <div class="demo-output">
                    { render_preview_stage(model, ctx) }
                    { render_results(model, ctx) }
                </div>
            </div>
        </section>
    }
}

fn render_mode_tabs(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;
    let current = model.demo.mode();
    let tab = |mode: Mode, label: Label, icon: &'static str| {
        html! {
            <button
                class={classes!("mode-tab", (current == mode).then_some("active"))}
                onclick={ctx.link().callback(move |_| Msg::SwitchMode(mode))}
            >
                <i class={classes!("fa-solid", icon)}></i>{ format!(" {}", label.text(language)) }
            </button>
        }
    };

    html! {
        <div class="mode-tabs">
            { tab(Mode::Species, Label::SpeciesTab, "fa-spa") }
            { tab(Mode::Disease, Label::DiseaseTab, "fa-leaf") }
        </div>
    }
}

fn render_source_toggle(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;
    let current = model.demo.source();
    let option = |source: Source, label: Label| {
        html! {
            <label class={classes!("source-option", (current == source).then_some("active"))}>
                <input
                    type="radio"
                    name="source"
                    checked={current == source}
                    onchange={ctx.link().callback(move |_| Msg::SetSource(source))}
                />
                <span class="radio-label-text">{ label.text(language) }</span>
            </label>
        }
    };

    html! {
        <div class="source-toggle">
            <span class="source-title">{ Label::Input.text(language) }</span>
            { option(Source::Camera, Label::Camera) }
            { option(Source::Upload, Label::Upload) }
        </div>
    }
}

fn render_threshold(model: &Model, ctx: &Context<Model>) -> Html {
    let threshold = model.demo.confidence_threshold();
    let handle_input = ctx.link().callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetThreshold(input.value_as_number() as f32)
    });

    html! {
        <div class="threshold">
            <label for="threshold-slider">
                { format!("{}: {:.2}", Label::ConfidenceThreshold.text(model.language), threshold) }
            </label>
            <input
                id="threshold-slider"
                type="range"
                min="0"
                max="1"
                step="0.05"
                value={threshold.to_string()}
                oninput={handle_input}
            />
        </div>
    }
}

fn render_upload_area(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let first_image = input
            .files()
            .as_ref()
            .and_then(|files| extract_image_files(files).into_iter().next());

        input.set_value("");

        match first_image {
            Some(file) => Msg::FileChosen(file),
            None => Msg::InputRejected(DemoError::InputNotReady("No valid image file selected.".into())),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />
            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={link.callback(Msg::HandleDrop)}
                onclick={debounce(300, trigger_file_input)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{ Label::UploadText.text(language) }</p>
                    <p class="file-types">{ Label::UploadHint.text(language) }</p>
                </div>
            </div>
        </>
    }
}

fn render_camera_panel(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();
    let ready = model.camera.is_some();

    html! {
        <div class="camera-panel">
            <video
                ref={model.video_ref.clone()}
                class="camera-feed"
                autoplay=true
                muted=true
                playsinline=true
            />
            <button
                class="analyze-btn"
                disabled={!ready || model.demo.is_loading()}
                onclick={debounce(300, move || link.send_message(Msg::Capture))}
            >
                <i class="fa-solid fa-camera"></i>{ format!(" {}", Label::Capture.text(model.language)) }
            </button>
        </div>
    }
}

fn render_preview_stage(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(url) = model.demo.preview() else {
        return html! {
            <div class="preview-stage empty">
                <p>{ Label::NoImage.text(model.language) }</p>
            </div>
        };
    };

    let boxes = model.demo.overlay_boxes(model.container);

    html! {
        <div class="preview-stage">
            <img
                ref={model.preview_ref.clone()}
                src={url.to_string()}
                alt="Preview"
                onload={ctx.link().callback(|_| Msg::MeasureContainer)}
            />
            <div class="disease-overlay">
                { for boxes.iter().map(|b| html! {
                    <div class="disease-box" style={b.rect.style()}>
                        <span class="disease-label">
                            { format!("{} ({:.1}%)", b.label, b.confidence * 100.0) }
                        </span>
                    </div>
                })}
            </div>
        </div>
    }
}
