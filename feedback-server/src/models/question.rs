//! Survey questions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A survey question. `id` is assigned once at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    #[serde(rename = "enable")]
    pub enabled: bool,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(id: String, title: String, enabled: bool, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            enabled,
            updated_by: String::new(),
            updated_at: now,
        }
    }

    /// Apply an edit. `updated_by` is blanked on every edit; callers that
    /// track the editor must set it after this call.
    pub fn edit(&mut self, title: String, enabled: bool, now: DateTime<Utc>) {
        self.title = title;
        self.enabled = enabled;
        self.updated_by.clear();
        self.updated_at = now;
    }
}

/// Question list in storage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Questions(Vec<Question>);

impl Questions {
    /// Keep only enabled questions, preserving order.
    pub fn enabled(self) -> Self {
        Self(self.0.into_iter().filter(|q| q.enabled).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.0
    }
}

impl From<Vec<Question>> for Questions {
    fn from(questions: Vec<Question>) -> Self {
        Self(questions)
    }
}

impl IntoIterator for Questions {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
