mod api;
mod camera;
mod components;

use camera::CameraStream;
use components::assistant::AssistantPanel;
use components::metrics::Counters;
use components::{ assistant, features, footer, handlers, hero, live_demo, metrics, navbar, utils };
use gloo_events::EventListener;
use gloo_file::{ File as GlooFile, ObjectUrl };
use gloo_timers::callback::Interval;
use shared::{ ContainerSize, DemoError, DemoState, Language, Mode, Payload, RequestToken, Source };
use web_sys::{ DragEvent, HtmlVideoElement };
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Demo configuration
    SwitchMode(Mode),
    SetSource(Source),
    SetThreshold(f32),
    ToggleLanguage,

    // Input events
    FileChosen(GlooFile),
    InputRejected(DemoError),
    HandleDrop(DragEvent),
    SetDragging(bool),
    CameraStarted(u64, CameraStream),
    CameraFailed(u64, DemoError),
    Capture,
    CaptureReady(web_sys::Blob),

    // Request lifecycle
    Response(RequestToken, Payload),
    Failed(RequestToken, DemoError),
    DismissError,

    // UI states
    MeasureContainer,
    AssistantAdvance(u64),
    Recommendation(u64, Result<String, DemoError>),
    TypeTick,
    CloseAssistant,
    CounterTick,
}

// Main component
pub struct Model {
    pub demo: DemoState<ObjectUrl>,
    pub language: Language,
    pub container: ContainerSize,
    pub preview_ref: NodeRef,
    pub video_ref: NodeRef,
    pub camera: Option<CameraStream>,
    pub is_dragging: bool,
    pub assistant: AssistantPanel,
    pub counters: Counters,
    counter_interval: Option<Interval>,
    resize_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let language = utils::load_language();
        utils::apply_language(language);

        let mut model = Self {
            demo: DemoState::default(),
            language,
            container: ContainerSize::default(),
            preview_ref: NodeRef::default(),
            video_ref: NodeRef::default(),
            camera: None,
            is_dragging: false,
            assistant: AssistantPanel::default(),
            counters: Counters::default(),
            counter_interval: None,
            resize_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            model.resize_listener = Some(
                EventListener::new(&window, "resize", move |_| {
                    link.send_message(Msg::MeasureContainer);
                })
            );
        }

        let link = ctx.link().clone();
        model.counter_interval = Some(
            Interval::new(metrics::COUNTER_TICK_MS, move || {
                link.send_message(Msg::CounterTick);
            })
        );

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Demo configuration
            Msg::SwitchMode(mode) => handlers::handle_switch_mode(self, mode),
            Msg::SetSource(source) => handlers::handle_set_source(self, ctx, source),
            Msg::SetThreshold(value) => handlers::handle_set_threshold(self, ctx, value),
            Msg::ToggleLanguage => handlers::handle_toggle_language(self),

            // Input events
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::InputRejected(error) => handlers::handle_input_error(self, error),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::CameraStarted(generation, stream) => {
                handlers::handle_camera_started(self, generation, stream)
            }
            Msg::CameraFailed(generation, error) => {
                handlers::handle_camera_failed(self, generation, error)
            }
            Msg::Capture => handlers::handle_capture(self, ctx),
            Msg::CaptureReady(blob) => handlers::handle_capture_ready(self, ctx, blob),

            // Request lifecycle
            Msg::Response(token, payload) => handlers::handle_response(self, ctx, token, payload),
            Msg::Failed(token, error) => handlers::handle_failed(self, token, error),
            Msg::DismissError => self.demo.dismiss_error(),

            // UI states
            Msg::MeasureContainer => handlers::handle_measure_container(self),
            Msg::AssistantAdvance(generation) => {
                handlers::handle_assistant_advance(self, ctx, generation)
            }
            Msg::Recommendation(generation, reply) => {
                handlers::handle_recommendation(self, ctx, generation, reply)
            }
            Msg::TypeTick => handlers::handle_type_tick(self),
            Msg::CloseAssistant => {
                self.assistant.hide();
                true
            }
            Msg::CounterTick => {
                if !self.counters.tick() {
                    self.counter_interval = None;
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="app" id="top" dir={self.language.dir()} lang={self.language.code()}>
                { navbar::render_navbar(self, ctx) }

                <main class="main-content">
                    { hero::render_hero() }
                    { metrics::render_metrics(self) }
                    { live_demo::render_live_demo(self, ctx) }
                    { features::render_features() }
                    { features::render_how_it_works() }
                    { hero::render_cta() }
                </main>

                { assistant::render_assistant(self, ctx) }
                { footer::render_footer() }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if let (Some(camera), Some(video)) = (&self.camera, self.video_ref.cast::<HtmlVideoElement>()) {
            camera.attach(&video);
        }

        // The overlay is laid out against the displayed image size, which is
        // only known after layout.
        if let Some(size) = utils::measure(&self.preview_ref) {
            if size != self.container {
                ctx.link().send_message(Msg::MeasureContainer);
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("SmartBloom starting...");
    yew::Renderer::<Model>::new().render();
}
