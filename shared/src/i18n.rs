use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Local-storage key holding the preferred language code.
pub const STORAGE_KEY: &str = "smartbloom-language";

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Unknown or missing codes fall back to English.
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(|c| c.trim().parse().ok()).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn dir(&self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }

    pub fn is_rtl(&self) -> bool {
        *self == Language::Ar
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }
}

/// Strings rendered by the live demo and the assistant panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    NavLiveDemo,
    NavHowItWorks,
    NavGetStarted,
    NavTryNow,
    DemoTitle,
    DemoSubtitle,
    SpeciesTab,
    DiseaseTab,
    SpeciesTip,
    DiseaseTip,
    Input,
    Camera,
    Upload,
    ConfidenceThreshold,
    UploadText,
    UploadHint,
    Capture,
    Analyzing,
    Results,
    NoImage,
    FlowerSpecies,
    DiseasesDetected,
    NoDiseases,
    Healthy,
    NoneAboveThreshold,
    ChooseFlower,
    ChooseDisease,
    Dismiss,
    AssistantTitle,
    AssistantTyping,
    AssistantUnavailable,
}

impl Label {
    pub fn text(self, language: Language) -> &'static str {
        use Label::*;
        match language {
            Language::En => match self {
                NavLiveDemo => "Live Demo",
                NavHowItWorks => "How it works",
                NavGetStarted => "Get Started",
                NavTryNow => "Try now",
                DemoTitle => "Live Demo",
                DemoSubtitle => "Upload a plant photo or use your camera. We'll identify the flower and detect visible leaf diseases in one go.",
                SpeciesTab => "Flower Species",
                DiseaseTab => "Leaf Disease",
                SpeciesTip => "Tip: Aim at the bloom (petals and center) for best species classification.",
                DiseaseTip => "Tip: Fill the frame with leaves so the model can localize infected regions.",
                Input => "Input",
                Camera => "Camera",
                Upload => "Upload",
                ConfidenceThreshold => "Confidence threshold:",
                UploadText => "Click to upload or drag & drop",
                UploadHint => "Supports JPG, PNG, WebP",
                Capture => "Capture & Analyze",
                Analyzing => "Analyzing…",
                Results => "Results",
                NoImage => "No image yet",
                FlowerSpecies => "Flower Species",
                DiseasesDetected => "Diseases Detected:",
                NoDiseases => "No diseases detected!",
                Healthy => "Your plant appears healthy.",
                NoneAboveThreshold => "No diseases above threshold",
                ChooseFlower => "Choose or capture a bloom image to classify the species.",
                ChooseDisease => "Choose or capture a leaf image to detect diseases.",
                Dismiss => "Dismiss",
                AssistantTitle => "SmartBloom Assistant",
                AssistantTyping => "Analyzing...",
                AssistantUnavailable => "Unable to fetch recommendations at this time.",
            },
            Language::Ar => match self {
                NavLiveDemo => "تجربة مباشرة",
                NavHowItWorks => "كيف يعمل",
                NavGetStarted => "ابدأ الآن",
                NavTryNow => "جرب الآن",
                DemoTitle => "تجربة مباشرة",
                DemoSubtitle => "قم بتحميل صورة نبات أو استخدم الكاميرا. سنحدد الزهرة ونكتشف أمراض الأوراق المرئية دفعة واحدة.",
                SpeciesTab => "أنواع الزهور",
                DiseaseTab => "أمراض الأوراق",
                SpeciesTip => "نصيحة: ركز على الزهرة (البتلات والمركز) للحصول على أفضل تصنيف للأنواع.",
                DiseaseTip => "نصيحة: املأ الإطار بالأوراق حتى يتمكن النموذج من تحديد المناطق المصابة.",
                Input => "الإدخال",
                Camera => "الكاميرا",
                Upload => "رفع",
                ConfidenceThreshold => "عتبة الثقة:",
                UploadText => "انقر للرفع أو اسحب وأفلت",
                UploadHint => "يدعم JPG, PNG, WebP",
                Capture => "التقاط والتحليل",
                Analyzing => "جارٍ التحليل…",
                Results => "النتائج",
                NoImage => "لا توجد صورة بعد",
                FlowerSpecies => "نوع الزهرة",
                DiseasesDetected => "الأمراض المكتشفة:",
                NoDiseases => "لم يتم اكتشاف أمراض!",
                Healthy => "نباتك يبدو بصحة جيدة.",
                NoneAboveThreshold => "لا توجد أمراض فوق العتبة",
                ChooseFlower => "اختر أو التقط صورة زهرة لتصنيف النوع.",
                ChooseDisease => "اختر أو التقط صورة ورقة لاكتشاف الأمراض.",
                Dismiss => "إغلاق",
                AssistantTitle => "مساعد SmartBloom",
                AssistantTyping => "جارٍ التحليل...",
                AssistantUnavailable => "تعذر جلب التوصيات في هذا الوقت.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_english() {
        assert_eq!(Language::from_code(None), Language::En);
        assert_eq!(Language::from_code(Some("fr")), Language::En);
        assert_eq!(Language::from_code(Some("ar")), Language::Ar);
    }

    #[test]
    fn arabic_is_rtl() {
        assert_eq!(Language::Ar.dir(), "rtl");
        assert!(Language::Ar.is_rtl());
        assert_eq!(Language::En.toggle(), Language::Ar);
        assert_eq!(Language::Ar.toggle().code(), "en");
    }

    #[test]
    fn labels_differ_per_language() {
        assert_eq!(Label::Camera.text(Language::En), "Camera");
        assert_ne!(Label::Camera.text(Language::Ar), "Camera");
    }
}
