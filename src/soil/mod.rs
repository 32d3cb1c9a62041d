//! Splitting of the combined soil sentence into "tolerates" and "prefers".
//!
//! Each keyword group is matched from its keyword to the end of the text, so
//! when both groups are present each match also swallows the other clause.
//! The overlap is removed by deleting the other match's literal text. That
//! subtraction is kept as-is: inputs with repeated keyword groups, or where one
//! clause contains the other's text, keep the stray text they have always
//! produced.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;


pub const TOLERATES_KEYWORDS: [&str; 3] = ["tolerates", "tolerant of", "accepts"];
pub const PREFERS_KEYWORDS: [&str; 3] = ["prefers", "does best in", "does best with"];

static TOLERATES_CLAUSE: LazyLock<Regex> = LazyLock::new(|| clause_pattern(&TOLERATES_KEYWORDS));
static PREFERS_CLAUSE: LazyLock<Regex> = LazyLock::new(|| clause_pattern(&PREFERS_KEYWORDS));

fn clause_pattern(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|keyword| format!("({}.+\\z)", regex::escape(keyword)))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .expect("soil keyword pattern is a valid regex")
}

/// The two clauses recovered from a soil description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SoilSplit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefers: Option<String>,
}

impl SoilSplit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tolerates.is_none() && self.prefers.is_none()
    }
}

#[must_use]
pub fn split_soil(raw: &str) -> SoilSplit {
    let tolerates = TOLERATES_CLAUSE.find(raw).map(|m| m.as_str());
    let prefers = PREFERS_CLAUSE.find(raw).map(|m| m.as_str());

    match (tolerates, prefers) {
        (Some(tolerates), Some(prefers)) => SoilSplit {
            tolerates: clause(&tolerates.replace(prefers, "")),
            prefers: clause(&prefers.replace(tolerates, "")),
        },
        (tolerates, prefers) => SoilSplit {
            tolerates: tolerates.and_then(clause),
            prefers: prefers.and_then(clause),
        },
    }
}

fn clause(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
