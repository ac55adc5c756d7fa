use serde::Serialize;

/// Scripts above this many characters may slow down scrolling
pub const LARGE_TEXT_CHARS: usize = 100_000;
/// Scripts above this many characters should be split up
pub const VERY_LARGE_TEXT_CHARS: usize = 300_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnalysis {
    pub is_large: bool,
    pub char_count: usize,
    pub word_count: usize,
    pub recommendation: Option<&'static str>,
}

impl TextAnalysis {
    pub fn is_very_large(&self) -> bool {
        self.char_count > VERY_LARGE_TEXT_CHARS
    }
}

/// Check whether a script is big enough to warn about
pub fn analyze_text(text: &str) -> TextAnalysis {
    let char_count = text.chars().count();
    let word_count = super::estimate::count_words(text);

    let is_large = char_count > LARGE_TEXT_CHARS;
    let recommendation = if char_count > VERY_LARGE_TEXT_CHARS {
        Some("Consider breaking this script into smaller sections for better performance")
    } else if is_large {
        Some("Large script detected - performance may be affected during scrolling")
    } else {
        None
    };

    TextAnalysis {
        is_large,
        char_count,
        word_count,
        recommendation,
    }
}
