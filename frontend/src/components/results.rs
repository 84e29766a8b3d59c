use super::super::{ Model, Msg };
use shared::{ DetectionReport, Label, Language, Mode, RequestResult, SpeciesPrediction };
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let language = model.language;

    let body = match model.demo.result() {
        RequestResult::Idle => html! {
            <p class="no-results-message">
                { match model.demo.mode() {
                    Mode::Species => Label::ChooseFlower.text(language),
                    Mode::Disease => Label::ChooseDisease.text(language),
                } }
            </p>
        },
        RequestResult::Loading => html! {
            <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{ format!(" {}", Label::Analyzing.text(language)) }</p>
        },
        RequestResult::Failed(reason) => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ reason }</p>
                <button class="dismiss-btn" onclick={ctx.link().callback(|_| Msg::DismissError)}>
                    { Label::Dismiss.text(language) }
                </button>
            </div>
        },
        RequestResult::Success(_) => match (model.demo.species(), model.demo.report()) {
            (Some(prediction), _) => render_species(prediction, language),
            (_, Some(report)) => render_report(model, report),
            _ => html! {},
        },
    };

    html! {
        <div class="results-container">
            <h3>{ Label::Results.text(language) }</h3>
            { body }
        </div>
    }
}

fn render_species(prediction: &SpeciesPrediction, language: Language) -> Html {
    let confidence = prediction.display_confidence();

    html! {
        <div class="species-result">
            <div class="result-title">{ format!("🌺 {}", Label::FlowerSpecies.text(language)) }</div>
            <div class="prediction"><strong>{ prediction.prediction.clone() }</strong></div>
            <div class="confidence-meter">
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}", confidence)}></div>
                </div>
                <div class="meter-value">{ confidence }</div>
            </div>
        </div>
    }
}

fn render_report(model: &Model, report: &DetectionReport) -> Html {
    let language = model.language;

    if report.detections.is_empty() {
        return html! {
            <div class="healthy-result">
                <div class="result-title">{ format!("✅ {}", Label::NoDiseases.text(language)) }</div>
                <p>{ Label::Healthy.text(language) }</p>
            </div>
        };
    }

    let visible = model.demo.filtered_detections();
    if visible.is_empty() {
        return html! {
            <p class="no-results-message">{ Label::NoneAboveThreshold.text(language) }</p>
        };
    }

    html! {
        <div class="disease-result">
            <div class="result-title">{ format!("🍂 {}", Label::DiseasesDetected.text(language)) }</div>
            <ul class="detection-list">
                { for visible.iter().map(|d| html! {
                    <li>
                        <span class="result-label">{ d.label.clone() }</span>
                        <span class="result-value">{ format!("{}%", d.percent()) }</span>
                    </li>
                })}
            </ul>
        </div>
    }
}
