//! Per-stage rich-text content and the append merge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use super::{StageId, UnknownStageError};

/// Serialization of an empty rich-text editor.
pub const EMPTY_RICH_TEXT: &str = "<p><br></p>";

/// Separator placed between existing content and a merged proposal.
pub const MERGE_SEPARATOR: &str = "<hr>";

/// One content slot per stage.
///
/// Backed by a fixed array indexed by [`StageId`], so every stage always has
/// a slot. Serialized as a map keyed by stage key; missing keys read as `""`
/// and unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct StageContent([String; StageId::COUNT]);

impl StageContent {
    /// All slots empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds content from a partial mapping; absent stages are empty.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (StageId, S)>,
        S: Into<String>,
    {
        let mut content = Self::default();
        for (stage, text) in entries {
            content.set(stage, text);
        }
        content
    }

    pub fn get(&self, stage: StageId) -> &str {
        &self.0[stage.index()]
    }

    /// Replaces the slot wholesale.
    pub fn set(&mut self, stage: StageId, text: impl Into<String>) {
        self.0[stage.index()] = text.into();
    }

    /// True when the slot holds no meaningful text.
    pub fn is_blank(&self, stage: StageId) -> bool {
        is_blank(self.get(stage))
    }

    /// Iterates all ten slots in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (StageId, &str)> {
        StageId::ALL
            .iter()
            .map(move |stage| (*stage, self.0[stage.index()].as_str()))
    }

    /// Number of slots with non-blank text.
    pub fn filled_count(&self) -> usize {
        self.0.iter().filter(|text| !is_blank(text)).count()
    }
}

impl Index<StageId> for StageContent {
    type Output = String;

    fn index(&self, stage: StageId) -> &String {
        &self.0[stage.index()]
    }
}

impl IndexMut<StageId> for StageContent {
    fn index_mut(&mut self, stage: StageId) -> &mut String {
        &mut self.0[stage.index()]
    }
}

impl TryFrom<BTreeMap<String, String>> for StageContent {
    type Error = UnknownStageError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut content = Self::default();
        for (key, text) in map {
            let stage: StageId = key.parse()?;
            content.set(stage, text);
        }
        Ok(content)
    }
}

impl From<StageContent> for BTreeMap<String, String> {
    fn from(content: StageContent) -> Self {
        StageId::ALL
            .iter()
            .zip(content.0)
            .map(|(stage, text)| (stage.key().to_string(), text))
            .collect()
    }
}

/// True when `text` is empty, whitespace, or the empty rich-text marker.
pub fn is_blank(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == EMPTY_RICH_TEXT
}

/// Folds an accepted proposal into existing stage text.
///
/// Blank existing text is replaced by the proposal verbatim. Otherwise the
/// proposal is appended after a separator and an attribution line, so the
/// existing text is always a prefix of the result.
pub fn merge_stage_text(existing: &str, proposal: &str, author: &str) -> String {
    if is_blank(existing) {
        return proposal.to_string();
    }

    [
        existing.to_string(),
        MERGE_SEPARATOR.to_string(),
        format!("<p><em>Suggested by {}:</em></p>", escape_html(author)),
        proposal.to_string(),
    ]
    .join("\n")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
