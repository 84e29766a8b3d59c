//! Care-recommendation assistant: launch sequence, reply typewriter, prompt
//! construction and the chat-completion wire format.

use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::i18n::Language;

/// Delay between two revealed typewriter units.
pub const TYPEWRITER_TICK_MS: u32 = 25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Hidden,
    /// Short pause so a restarted sequence re-enters from scratch.
    Resetting,
    Rocket,
    Impact,
    Chat,
}

impl Phase {
    /// How long the phase lasts before the timeline moves on. `None` for
    /// phases that only end through an explicit call.
    pub fn duration_ms(&self) -> Option<u32> {
        match self {
            Phase::Resetting => Some(50),
            Phase::Rocket => Some(2200),
            Phase::Impact => Some(200),
            Phase::Hidden | Phase::Chat => None,
        }
    }

    fn next(&self) -> Option<Phase> {
        match self {
            Phase::Resetting => Some(Phase::Rocket),
            Phase::Rocket => Some(Phase::Impact),
            Phase::Impact => Some(Phase::Chat),
            Phase::Hidden | Phase::Chat => None,
        }
    }
}

/// Finite phase sequence driven by one external timer.
///
/// The driver schedules a single callback after [`AssistantTimeline::delay`]
/// and calls [`AssistantTimeline::advance`] with the generation it captured.
/// Restarting or hiding bumps the generation so callbacks from an earlier run
/// do nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistantTimeline {
    phase: Phase,
    generation: u64,
}

impl AssistantTimeline {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Resetting;
        self.generation
    }

    pub fn hide(&mut self) {
        if self.phase != Phase::Hidden {
            self.generation += 1;
            self.phase = Phase::Hidden;
        }
    }

    pub fn delay(&self) -> Option<u32> {
        self.phase.duration_ms()
    }

    /// Moves to the following phase if `generation` is still current.
    pub fn advance(&mut self, generation: u64) -> Option<Phase> {
        if generation != self.generation {
            return None;
        }
        let next = self.phase.next()?;
        self.phase = next;
        Some(next)
    }
}

/// A rendered piece of an assistant reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Bold(String),
    Bullet,
    Heading(String),
    LineBreak,
}

// Smallest piece revealed per tick. Bold runs and headings appear whole.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Unit {
    Char(char),
    Bold(String),
    Bullet,
    Heading(String),
    LineBreak,
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut i = at;
    for p in pattern.chars() {
        if chars.get(i) != Some(&p) {
            return false;
        }
        i += 1;
    }
    true
}

fn tokenize(text: &str) -> Vec<Unit> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::new();
    let mut i = 0;
    let mut line_start = true;

    while i < chars.len() {
        let c = chars[i];

        if line_start && c.is_whitespace() && c != '\n' {
            i += 1;
            continue;
        }

        if starts_with(&chars, i, "**") {
            i += 2;
            let mut run = String::new();
            while i < chars.len() && !starts_with(&chars, i, "**") {
                run.push(chars[i]);
                i += 1;
            }
            i = (i + 2).min(chars.len());
            units.push(Unit::Bold(run));
            line_start = false;
        } else if line_start
            && (starts_with(&chars, i, "* ")
                || starts_with(&chars, i, "- ")
                || starts_with(&chars, i, "*•"))
        {
            units.push(Unit::Bullet);
            i += 2;
            line_start = false;
        } else if line_start && starts_with(&chars, i, "###") {
            i += 3;
            while i < chars.len() && chars[i] == '#' {
                i += 1;
            }
            while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
                i += 1;
            }
            let mut heading = String::new();
            while i < chars.len() && chars[i] != '\n' {
                heading.push(chars[i]);
                i += 1;
            }
            // The heading is a block; its newline is not rendered.
            i += 1;
            units.push(Unit::Heading(heading.trim_end().to_string()));
            line_start = true;
        } else if c == '\n' {
            units.push(Unit::LineBreak);
            i += 1;
            line_start = true;
        } else {
            units.push(Unit::Char(c));
            i += 1;
            line_start = false;
        }
    }

    units
}

/// Reveals a reply one unit per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typewriter {
    units: Vec<Unit>,
    shown: usize,
    segments: Vec<Segment>,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            units: tokenize(text),
            shown: 0,
            segments: Vec::new(),
        }
    }

    /// A typewriter with everything already revealed.
    pub fn completed(text: &str) -> Self {
        let mut typewriter = Self::new(text);
        typewriter.finish();
        typewriter
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.units.len()
    }

    /// Reveals the next unit. Returns `false` once everything is shown.
    pub fn tick(&mut self) -> bool {
        let Some(unit) = self.units.get(self.shown).cloned() else {
            return false;
        };
        self.shown += 1;

        match unit {
            Unit::Char(c) => match self.segments.last_mut() {
                Some(Segment::Text(text)) => text.push(c),
                _ => self.segments.push(Segment::Text(c.to_string())),
            },
            Unit::Bold(run) => self.segments.push(Segment::Bold(run)),
            Unit::Bullet => self.segments.push(Segment::Bullet),
            Unit::Heading(h) => self.segments.push(Segment::Heading(h)),
            Unit::LineBreak => self.segments.push(Segment::LineBreak),
        }
        true
    }

    pub fn finish(&mut self) {
        while self.tick() {}
    }
}

/// Distinct labels in first-seen order.
pub fn distinct_labels(detections: &[Detection]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for d in detections {
        if !d.label.is_empty() && !labels.contains(&d.label) {
            labels.push(d.label.clone());
        }
    }
    labels
}

pub fn build_prompt(labels: &[String], language: Language) -> String {
    let diseases = labels.join(", ");
    match language {
        Language::Ar => format!(
            "أعطني توصيات واضحة حول مرض النبات المكتشف: {diseases}.\n\n\
             **مهم جداً:** يجب أن تكون جميع الإجابات باللغة العربية فقط. لا تستخدم الإنجليزية أبداً.\n\n\
             اشرح:\n\
             - ما هو المرض\n\
             - لماذا يحدث\n\
             - درجة الخطورة\n\
             - خطوات العلاج السريعة\n\
             - نصائح الوقاية\n\n\
             بأسلوب بسيط وعملي. استخدم 4-6 نقاط. اكتب بأسلوب دافئ ومفيد مثل خبير رعاية النباتات. استخدم اللغة العربية فقط في كل شيء."
        ),
        Language::En => format!(
            "Given these detected leaf diseases: {diseases}\n\n\
             **IMPORTANT:** All responses must be in English only. Do not use Arabic or any other language.\n\n\
             Write a friendly, plant-doctor-style recommendation that includes:\n\
             - What the disease is\n\
             - Why it happens\n\
             - Severity assessment\n\
             - Fast treatment steps\n\
             - Prevention advice\n\n\
             Keep it simple but professional. Use 4-6 bullet points. Write in a warm, helpful tone like a plant care expert. Use English only for everything."
        ),
    }
}

/// Static care guide shown when no generated recommendation is available.
pub fn fallback_message(labels: &[String]) -> String {
    format!(
        "**Detected Disease: {}**\n\n\
         **Quick Treatment Tips:**\n\
         - Isolate affected plants immediately\n\
         - Remove and dispose of infected leaves\n\
         - Improve air circulation around plants\n\
         - Avoid overhead watering\n\
         - Apply appropriate fungicide if needed\n\
         - Monitor plant health regularly\n\n\
         **Prevention:**\n\
         - Maintain proper spacing between plants\n\
         - Water at the base, not on leaves\n\
         - Keep garden tools clean\n\
         - Rotate crops if possible",
        labels.join(", ")
    )
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn single_prompt(model: impl Into<String>, prompt: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt,
            }],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ChatChoice {
    pub message: Option<ChatMessage>,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    #[test]
    fn timeline_runs_through_every_phase() {
        let mut t = AssistantTimeline::default();
        assert!(!t.is_visible());
        let g = t.start();
        assert_eq!(t.phase(), Phase::Resetting);
        assert_eq!(t.delay(), Some(50));

        assert_eq!(t.advance(g), Some(Phase::Rocket));
        assert_eq!(t.delay(), Some(2200));
        assert_eq!(t.advance(g), Some(Phase::Impact));
        assert_eq!(t.delay(), Some(200));
        assert_eq!(t.advance(g), Some(Phase::Chat));
        assert_eq!(t.delay(), None);
        assert_eq!(t.advance(g), None);
        assert_eq!(t.phase(), Phase::Chat);
    }

    #[test]
    fn stale_tick_after_restart_is_ignored() {
        let mut t = AssistantTimeline::default();
        let first = t.start();
        t.advance(first);
        let second = t.start();
        assert_eq!(t.advance(first), None);
        assert_eq!(t.phase(), Phase::Resetting);
        assert_eq!(t.advance(second), Some(Phase::Rocket));
    }

    #[test]
    fn hide_invalidates_pending_tick() {
        let mut t = AssistantTimeline::default();
        let g = t.start();
        t.hide();
        assert_eq!(t.advance(g), None);
        assert_eq!(t.phase(), Phase::Hidden);
    }

    #[test]
    fn typewriter_reveals_plain_text_per_char() {
        let mut tw = Typewriter::new("hi");
        assert!(tw.segments().is_empty());
        assert!(tw.tick());
        assert_eq!(tw.segments(), &[Segment::Text("h".into())]);
        assert!(tw.tick());
        assert_eq!(tw.segments(), &[Segment::Text("hi".into())]);
        assert!(!tw.tick());
        assert!(tw.is_done());
    }

    #[test]
    fn typewriter_reveals_bold_run_at_once() {
        let mut tw = Typewriter::new("**Rust** spots");
        tw.tick();
        assert_eq!(tw.segments(), &[Segment::Bold("Rust".into())]);
        tw.finish();
        assert_eq!(
            tw.segments(),
            &[Segment::Bold("Rust".into()), Segment::Text(" spots".into())]
        );
    }

    #[test]
    fn typewriter_parses_headings_and_bullets() {
        let tw = Typewriter::completed("### Care\n- water less\n* prune\nwell - known");
        assert_eq!(
            tw.segments(),
            &[
                Segment::Heading("Care".into()),
                Segment::Bullet,
                Segment::Text("water less".into()),
                Segment::LineBreak,
                Segment::Bullet,
                Segment::Text("prune".into()),
                Segment::LineBreak,
                Segment::Text("well - known".into()),
            ]
        );
    }

    #[test]
    fn unterminated_bold_takes_rest_of_text() {
        let tw = Typewriter::completed("**open");
        assert_eq!(tw.segments(), &[Segment::Bold("open".into())]);
    }

    #[test]
    fn labels_are_deduplicated_in_order() {
        let ds = vec![
            Detection::new("rust", 0.9, BoundingBox::default()),
            Detection::new("blight", 0.8, BoundingBox::default()),
            Detection::new("rust", 0.7, BoundingBox::default()),
        ];
        assert_eq!(distinct_labels(&ds), vec!["rust".to_string(), "blight".to_string()]);
    }

    #[test]
    fn prompt_mentions_labels_in_requested_language() {
        let labels = vec!["rust".to_string(), "blight".to_string()];
        let en = build_prompt(&labels, Language::En);
        assert!(en.contains("rust, blight"));
        assert!(en.contains("English only"));
        let ar = build_prompt(&labels, Language::Ar);
        assert!(ar.contains("rust, blight"));
        assert!(ar.contains("العربية"));
    }

    #[test]
    fn fallback_lists_labels() {
        let msg = fallback_message(&["mildew".to_string()]);
        assert!(msg.starts_with("**Detected Disease: mildew**"));
    }

    #[test]
    fn completion_content_is_extracted() {
        let r: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Water less. "}}]}"#,
        )
        .unwrap();
        assert_eq!(r.first_content(), Some("Water less."));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn request_serializes_single_user_message() {
        let req = ChatCompletionRequest::single_prompt("m", "p".into(), 0.7, 600);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 600);
    }
}
