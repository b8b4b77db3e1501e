use crate::ir::RankedEntry;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid score list: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoresDocument {
    List(Vec<RankedEntry>),
    Wrapped { scores: Vec<RankedEntry> },
}

impl From<ScoresDocument> for Vec<RankedEntry> {
    fn from(doc: ScoresDocument) -> Self {
        match doc {
            ScoresDocument::List(entries) => entries,
            ScoresDocument::Wrapped { scores } => scores,
        }
    }
}

/// Parse `[{"name": .., "score": ..}, ..]` or `{"scores": [..]}`.
///
/// Strict JSON is tried first; on failure the input is re-read as JSON5
/// so hand-edited files may carry comments and trailing commas.
pub fn parse_scores(input: &str) -> Result<Vec<RankedEntry>, ParseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<ScoresDocument>(input) {
        Ok(doc) => Ok(doc.into()),
        Err(json_err) => match json5::from_str::<ScoresDocument>(input) {
            Ok(doc) => Ok(doc.into()),
            Err(_) => Err(ParseError::Invalid(json_err.to_string())),
        },
    }
}
