use yew::prelude::*;

const FEATURES: [(&str, &str, &str); 6] = [
    ("fa-camera", "Camera or Upload", "Switch instantly between webcam capture or file upload."),
    ("fa-microchip", "Two-Stage AI", "A classifier for species plus a detector for leaf diseases."),
    ("fa-bolt", "Real-time", "Results and disease boxes come back in a single round trip."),
    ("fa-shield-halved", "Privacy First", "Images go only to your own classification service."),
    ("fa-plug", "Simple API", "One multipart upload per request, JSON back."),
    ("fa-seedling", "Care Assistant", "Detected diseases come with treatment and prevention tips."),
];

const STEPS: [(&str, &str); 4] = [
    ("Capture or Upload", "Provide a plant image using webcam or file upload."),
    ("Flower Species", "The classifier names the flower species with a confidence score."),
    ("Leaf Disease", "The detector scans the leaves and boxes any disease it finds."),
    ("Actionable Output", "Results are returned instantly for your next step."),
];

pub fn render_features() -> Html {
    html! {
        <section class="features">
            <h2>{"Why SmartBloom"}</h2>
            <div class="feature-grid">
                { for FEATURES.iter().map(|(icon, title, description)| html! {
                    <div class="feature-card">
                        <div class="feature-icon"><i class={classes!("fa-solid", *icon)}></i></div>
                        <div class="feature-title">{ *title }</div>
                        <p>{ *description }</p>
                    </div>
                })}
            </div>
        </section>
    }
}

pub fn render_how_it_works() -> Html {
    html! {
        <section id="how" class="how-it-works">
            <h2>{"How it works"}</h2>
            <div class="steps">
                { for STEPS.iter().enumerate().map(|(i, (title, description))| html! {
                    <div class="step-card">
                        <div class="step-number">{ format!("Step {}", i + 1) }</div>
                        <div class="step-title">{ *title }</div>
                        <p>{ *description }</p>
                    </div>
                })}
            </div>
        </section>
    }
}
