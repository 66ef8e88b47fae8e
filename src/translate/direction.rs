use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which language pair a request is translated through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "en-zh", alias = "en_zh")]
    EnToZh,
    #[serde(rename = "zh-en", alias = "zh_en")]
    ZhToEn,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::EnToZh, Direction::ZhToEn];

    /// Map the client's `sourceIsEnglish` flag to a direction
    pub fn from_source_is_english(source_is_english: bool) -> Self {
        if source_is_english {
            Direction::EnToZh
        } else {
            Direction::ZhToEn
        }
    }

    pub fn source_lang(self) -> &'static str {
        match self {
            Direction::EnToZh => "en",
            Direction::ZhToEn => "zh",
        }
    }

    pub fn target_lang(self) -> &'static str {
        match self {
            Direction::EnToZh => "zh",
            Direction::ZhToEn => "en",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Direction::EnToZh => "en-zh",
            Direction::ZhToEn => "zh-en",
        }
    }

    /// Pretrained Marian checkpoint served for this direction unless configured otherwise
    pub fn default_model_id(self) -> &'static str {
        match self {
            Direction::EnToZh => "Helsinki-NLP/opus-mt-en-zh",
            Direction::ZhToEn => "Helsinki-NLP/opus-mt-zh-en",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en-zh" | "en_zh" => Ok(Direction::EnToZh),
            "zh-en" | "zh_en" => Ok(Direction::ZhToEn),
            other => Err(format!("Unsupported translation direction: {}", other)),
        }
    }
}
