use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, PartialEq, Eq)]
pub enum StepError {
    DuplicateId(String),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::DuplicateId(id) => write!(f, "Duplicate step id: {}", id),
        }
    }
}

impl std::error::Error for StepError {}

/// One instructional card within a guide.
///
/// Fields are private so the code block cannot change once authored.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    id: String,
    ordinal: String,
    title: String,
    source_label: String,
    code_language: String,
    description: String,
    code: String,
}

impl Step {
    pub fn new(id: &str, ordinal: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            ordinal: ordinal.to_string(),
            title: title.to_string(),
            source_label: "terminal".to_string(),
            code_language: "bash".to_string(),
            description: String::new(),
            code: String::new(),
        }
    }

    pub fn source(mut self, label: &str, language: &str) -> Self {
        self.source_label = label.to_string();
        self.code_language = language.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ordinal(&self) -> &str {
        &self.ordinal
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn code_language(&self) -> &str {
        &self.code_language
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn code_text(&self) -> &str {
        &self.code
    }
}

/// Ordered steps with unique ids. Iteration order is authoring order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    pub fn new(steps: Vec<Step>) -> Result<Self, StepError> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(StepError::DuplicateId(step.id.clone()));
            }
        }

        Ok(Self { steps })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a StepList {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, ordinal: &str) -> Step {
        Step::new(id, ordinal, "Title").code("echo hi")
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = StepList::new(vec![step("step-1", "01"), step("step-1", "02")]).unwrap_err();
        assert_eq!(err, StepError::DuplicateId("step-1".to_string()));
    }

    #[test]
    fn test_keeps_authoring_order() {
        // Ordinals deliberately out of order: they are labels, not sort keys.
        let list = StepList::new(vec![step("b", "02"), step("a", "01"), step("c", "03")]).unwrap();
        let ids: Vec<&str> = list.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_lookup_by_id() {
        let list = StepList::new(vec![step("one", "01"), step("two", "02")]).unwrap();
        assert_eq!(list.get("two").map(|s| s.ordinal()), Some("02"));
        assert!(list.get("three").is_none());
    }

    #[test]
    fn test_defaults_to_terminal_source() {
        let s = Step::new("x", "01", "Install");
        assert_eq!(s.source_label(), "terminal");
        assert_eq!(s.code_language(), "bash");
    }
}
