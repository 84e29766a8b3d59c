use super::super::{ Model, Msg };
use gloo_timers::callback::{ Interval, Timeout };
use shared::Label;
use shared::assistant::{ AssistantTimeline, Phase, Segment, Typewriter };
use yew::prelude::*;

/// Browser side of the assistant: the timeline plus the timers driving it.
/// Dropping a timer cancels it.
#[derive(Default)]
pub struct AssistantPanel {
    pub timeline: AssistantTimeline,
    pub labels: Vec<String>,
    pub reply: Option<Typewriter>,
    pub phase_timeout: Option<Timeout>,
    pub typing: Option<Interval>,
}

impl AssistantPanel {
    pub fn start(&mut self, labels: Vec<String>) -> u64 {
        self.labels = labels;
        self.clear_timers();
        self.timeline.start()
    }

    pub fn hide(&mut self) {
        self.timeline.hide();
        self.clear_timers();
    }

    fn clear_timers(&mut self) {
        self.reply = None;
        self.phase_timeout = None;
        self.typing = None;
    }
}

pub fn render_assistant(model: &Model, ctx: &Context<Model>) -> Html {
    let panel = &model.assistant;
    let language = model.language;

    match panel.timeline.phase() {
        Phase::Hidden | Phase::Resetting => html! {},
        Phase::Rocket => html! {
            <div class="assistant-rocket" aria-hidden="true">
                <span class="rocket-leaf">{"🍃"}</span>
            </div>
        },
        Phase::Impact => html! {
            <div class="assistant-rocket impact" aria-hidden="true">
                <span class="rocket-leaf">{"🍃"}</span>
            </div>
        },
        Phase::Chat => {
            let body = match &panel.reply {
                Some(typewriter) => render_segments(typewriter.segments()),
                None => html! {
                    <p class="assistant-typing">
                        <i class="fa-solid fa-spinner fa-spin"></i>
                        { format!(" {}", Label::AssistantTyping.text(language)) }
                    </p>
                },
            };

            html! {
                <aside class="assistant-chat" dir={language.dir()}>
                    <div class="assistant-header">
                        <span><i class="fa-solid fa-seedling"></i>{ format!(" {}", Label::AssistantTitle.text(language)) }</span>
                        <button
                            class="assistant-close"
                            title={Label::Dismiss.text(language)}
                            onclick={ctx.link().callback(|_| Msg::CloseAssistant)}
                        >
                            <i class="fa-solid fa-times"></i>
                        </button>
                    </div>
                    <div class="assistant-body">{ body }</div>
                </aside>
            }
        }
    }
}

fn render_segments(segments: &[Segment]) -> Html {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => html! { <span>{ text.clone() }</span> },
            Segment::Bold(text) => html! { <strong>{ text.clone() }</strong> },
            Segment::Bullet => html! { <span class="assistant-bullet">{"• "}</span> },
            Segment::Heading(text) => html! { <h4>{ text.clone() }</h4> },
            Segment::LineBreak => html! { <br /> },
        })
        .collect::<Html>()
}
