// src/models/quiz.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub first: String,
    pub second: String,
}

/// A quiz document under `quizes/{quizId}`.
/// Only the word pairs and language names matter to the exam protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_language: String,
    #[serde(default)]
    pub second_language: String,
    #[serde(default)]
    pub word_pairs: Vec<WordPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// A quiz offered to a host, tagged with its store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostQuiz {
    pub quiz_id: String,
    #[serde(flatten)]
    pub quiz: Quiz,
}

/// A word pair as handed to the quiz screen; exams always select every pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPair {
    pub first: String,
    pub second: String,
    pub selected: bool,
}

impl From<WordPair> for SelectedPair {
    fn from(pair: WordPair) -> Self {
        Self {
            first: pair.first,
            second: pair.second,
            selected: true,
        }
    }
}
