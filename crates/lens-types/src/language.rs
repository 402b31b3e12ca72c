use serde::{Deserialize, Serialize};

/// Languages the host application can ask a recognizer for.
///
/// Vision models behind Ollama detect the language from the image itself,
/// so every entry collapses to the same service code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Auto,
    ZhCn,
    ZhTw,
    En,
    Yue,
    Ja,
    Ko,
    Fr,
    Es,
    Ru,
    De,
    It,
    Tr,
    PtPt,
    PtBr,
    Vi,
    Id,
    Th,
    Ms,
    Ar,
    Hi,
    Uk,
    He,
}

impl Language {
    pub const ALL: [Language; 23] = [
        Language::Auto,
        Language::ZhCn,
        Language::ZhTw,
        Language::En,
        Language::Yue,
        Language::Ja,
        Language::Ko,
        Language::Fr,
        Language::Es,
        Language::Ru,
        Language::De,
        Language::It,
        Language::Tr,
        Language::PtPt,
        Language::PtBr,
        Language::Vi,
        Language::Id,
        Language::Th,
        Language::Ms,
        Language::Ar,
        Language::Hi,
        Language::Uk,
        Language::He,
    ];

    /// Code sent to the recognition service
    pub fn service_code(self) -> &'static str {
        "auto"
    }

    /// Host application key (e.g. "zh_cn")
    pub fn key(self) -> &'static str {
        match self {
            Language::Auto => "auto",
            Language::ZhCn => "zh_cn",
            Language::ZhTw => "zh_tw",
            Language::En => "en",
            Language::Yue => "yue",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Ru => "ru",
            Language::De => "de",
            Language::It => "it",
            Language::Tr => "tr",
            Language::PtPt => "pt_pt",
            Language::PtBr => "pt_br",
            Language::Vi => "vi",
            Language::Id => "id",
            Language::Th => "th",
            Language::Ms => "ms",
            Language::Ar => "ar",
            Language::Hi => "hi",
            Language::Uk => "uk",
            Language::He => "he",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.key() == key)
    }
}
