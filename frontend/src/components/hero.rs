use yew::prelude::*;

pub fn render_hero() -> Html {
    html! {
        <section class="hero">
            <div class="hero-text">
                <h1>{"AI for 🌸 Flowers & 🍃 Plant Health"}</h1>
                <p class="subtitle">
                    {"SmartBloom identifies flower species and detects common leaf diseases in real-time from a single photo or your camera feed."}
                </p>
                <div class="hero-actions">
                    <a href="#demo" class="analyze-btn">{"Try the Demo"}</a>
                    <a href="#how" class="secondary-btn">{"How it works"}</a>
                </div>
            </div>
            <div class="hero-visual" aria-hidden="true"></div>
        </section>
    }
}

pub fn render_cta() -> Html {
    html! {
        <section id="cta" class="cta">
            <h3>{"Bring AI to your garden, lab, or classroom."}</h3>
            <p>{"Run locally or deploy to the cloud with the same API. Start with the live demo above."}</p>
            <a href="#demo" class="analyze-btn">{"Try SmartBloom"}</a>
        </section>
    }
}
