use super::super::{ Model, Msg };
use shared::{ Label, Language };
use yew::prelude::*;

pub fn render_navbar(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;
    let toggle_text = match language.toggle() {
        Language::En => "English",
        Language::Ar => "العربية",
    };

    html! {
        <header class="navbar">
            <a href="#top" class="brand">
                <i class="fa-solid fa-leaf"></i>
                <span>{"SmartBloom"}</span>
            </a>
            <nav class="nav-links">
                <a href="#demo">{ Label::NavLiveDemo.text(language) }</a>
                <a href="#how">{ Label::NavHowItWorks.text(language) }</a>
                <a href="#cta">{ Label::NavGetStarted.text(language) }</a>
            </nav>
            <div class="nav-actions">
                <button
                    class="language-toggle"
                    onclick={ctx.link().callback(|_| Msg::ToggleLanguage)}
                >
                    <i class="fa-solid fa-language"></i>{ format!(" {}", toggle_text) }
                </button>
                <a href="#demo" class="nav-cta">{ Label::NavTryNow.text(language) }</a>
            </div>
        </header>
    }
}
