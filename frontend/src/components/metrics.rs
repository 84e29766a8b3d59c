use super::super::Model;
use yew::prelude::*;

const COUNTER_STEPS: u32 = 60;
const COUNTER_DURATION_MS: u32 = 2000;
pub const COUNTER_TICK_MS: u32 = COUNTER_DURATION_MS / COUNTER_STEPS;

struct Metric {
    target: u32,
    suffix: &'static str,
    label: &'static str,
}

const METRICS: [Metric; 3] = [
    Metric { target: 89, suffix: "%+", label: "Flower top-1 accuracy" },
    Metric { target: 102, suffix: "", label: "Flower species recognised" },
    Metric { target: 2, suffix: "", label: "Models: species and leaf disease" },
];

/// Shared progress of the count-up animation on the metric cards.
#[derive(Default)]
pub struct Counters {
    step: u32,
}

impl Counters {
    /// Returns `false` once every counter reached its target.
    pub fn tick(&mut self) -> bool {
        if self.step >= COUNTER_STEPS {
            return false;
        }
        self.step += 1;
        self.step < COUNTER_STEPS
    }

    pub fn value(&self, target: u32) -> u32 {
        target * self.step / COUNTER_STEPS
    }
}

pub fn render_metrics(model: &Model) -> Html {
    html! {
        <section class="metrics-strip">
            { for METRICS.iter().map(|metric| html! {
                <div class="metric-card">
                    <div class="counter">
                        { format!("{}{}", model.counters.value(metric.target), metric.suffix) }
                    </div>
                    <div class="metric-label">{ metric.label }</div>
                </div>
            })}
        </section>
    }
}
