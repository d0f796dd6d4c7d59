//! Task breakdown engine.
//!
//! Turns a free-text description into an ordered batch of micro-tasks by
//! keyword classification against a [`TemplateCatalog`]. Output content is
//! deterministic for a given input and catalog; only ids and timestamps vary.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::templates::{TaskTypeInfo, TemplateCatalog};
use super::Task;
use crate::error::ValidationError;

/// Leading phrases stripped from a description, applied once each in order.
const SUBJECT_PREFIXES: &[&str] = &[
    "study for",
    "study",
    "read",
    "write",
    "finish",
    "complete",
    "do",
    "work on",
    "prepare for",
    "review",
    "practice",
    "learn",
];

/// Reject empty or whitespace-only descriptions.
pub fn validate_description(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed)
}

/// Strip `prefix` plus the whitespace run after it, ASCII case-insensitively.
///
/// The prefix only matches when at least one whitespace character follows.
fn strip_prefix_word<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &text[prefix.len()..];
    let stripped = rest.trim_start();
    if stripped.len() == rest.len() {
        return None;
    }
    Some(stripped)
}

/// Extract the subject of a description, e.g. "Study for AP Calc test" -> "AP Calc test".
///
/// Returns `None` when nothing is left after stripping.
pub fn extract_subject(input: &str) -> Option<String> {
    let mut subject = input.trim();
    for prefix in SUBJECT_PREFIXES {
        if let Some(rest) = strip_prefix_word(subject, prefix) {
            subject = rest;
        }
    }

    let mut chars = subject.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Breakdown engine bound to a template catalog.
#[derive(Debug, Clone, Default)]
pub struct TaskBreakdown {
    catalog: TemplateCatalog,
}

impl TaskBreakdown {
    /// Create an engine over the built-in catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Display label and emoji of the type the input classifies as.
    pub fn task_type_info(&self, input: &str) -> TaskTypeInfo {
        self.catalog.classify(input).info()
    }

    /// Break a description into micro-tasks stamped with the current time.
    ///
    /// The caller validates the input first (see [`validate_description`]).
    pub fn breakdown(&self, input: &str) -> Vec<Task> {
        self.breakdown_at(input, Utc::now())
    }

    /// Same as [`Self::breakdown`] with an explicit creation time.
    pub fn breakdown_at(&self, input: &str, now: DateTime<Utc>) -> Vec<Task> {
        let rule = self.catalog.classify(input);
        let subject = extract_subject(input);

        tracing::debug!(
            task_type = %rule.id,
            templates = rule.templates.len(),
            "broke down task description"
        );

        rule.templates
            .iter()
            .enumerate()
            .map(|(order, template)| Task {
                id: Uuid::new_v4().to_string(),
                parent_task: input.to_string(),
                title: template.title.clone(),
                subtitle: subject.clone(),
                estimated_time: template.minutes,
                difficulty: template.difficulty,
                xp_reward: template.xp,
                completed: false,
                order,
                created_at: Some(now),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::templates::TaskTypeRule;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn study_scenario_uses_study_templates() {
        let engine = TaskBreakdown::new();
        let tasks = engine.breakdown("Study for AP Calc test");

        let expected = TaskTypeRule::study().templates;
        assert_eq!(tasks.len(), expected.len());
        for (i, (task, template)) in tasks.iter().zip(&expected).enumerate() {
            assert_eq!(task.order, i);
            assert_eq!(task.title, template.title);
            assert_eq!(task.estimated_time, template.minutes);
            assert_eq!(task.difficulty, template.difficulty);
            assert_eq!(task.xp_reward, template.xp);
            assert_eq!(task.parent_task, "Study for AP Calc test");
            assert_eq!(task.subtitle.as_deref(), Some("AP Calc test"));
            assert!(!task.completed);
        }
    }

    #[test]
    fn ids_are_unique_within_a_batch() {
        let tasks = TaskBreakdown::new().breakdown("write my history essay");
        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), tasks.len());
    }

    #[test]
    fn subject_strips_prefixes_in_order() {
        assert_eq!(extract_subject("study for the midterm").as_deref(), Some("The midterm"));
        assert_eq!(extract_subject("  Work on   slides").as_deref(), Some("Slides"));
        assert_eq!(extract_subject("read chapter 5").as_deref(), Some("Chapter 5"));
        // Each prefix applies once, so a later prefix can still strip.
        assert_eq!(extract_subject("finish review notes").as_deref(), Some("Notes"));
    }

    #[test]
    fn subject_prefix_needs_trailing_whitespace() {
        assert_eq!(extract_subject("reading log").as_deref(), Some("Reading log"));
        assert_eq!(extract_subject("study").as_deref(), Some("Study"));
    }

    #[test]
    fn subject_capitalizes_non_ascii_first_letter() {
        assert_eq!(extract_subject("learn élan vital").as_deref(), Some("Élan vital"));
    }

    #[test]
    fn unmatched_input_uses_fallback_templates() {
        let tasks = TaskBreakdown::new().breakdown("clean my room");
        assert_eq!(tasks.len(), TaskTypeRule::fallback().templates.len());
        assert_eq!(tasks[0].title, "Break down the task and plan approach");
    }

    #[test]
    fn task_type_info_reports_label() {
        let info = TaskBreakdown::new().task_type_info("debug the website");
        assert_eq!(info.id, "coding");
        assert_eq!(info.label, "Coding Session");
    }

    #[test]
    fn validate_rejects_blank_input() {
        assert_eq!(validate_description("   \n"), Err(ValidationError::EmptyDescription));
        assert_eq!(validate_description(" essay "), Ok("essay"));
    }

    proptest! {
        #[test]
        fn breakdown_output_is_well_formed(input in "[ -~]{1,60}") {
            prop_assume!(!input.trim().is_empty());
            let tasks = TaskBreakdown::new().breakdown(&input);
            prop_assert!(!tasks.is_empty());
            for (i, task) in tasks.iter().enumerate() {
                prop_assert!(task.estimated_time > 0);
                prop_assert!(task.xp_reward > 0);
                prop_assert!(!task.completed);
                prop_assert_eq!(task.order, i);
                prop_assert_eq!(&task.parent_task, &input);
            }
        }

        #[test]
        fn breakdown_content_is_deterministic(input in "[a-zA-Z ]{1,40}") {
            prop_assume!(!input.trim().is_empty());
            let engine = TaskBreakdown::new();
            let now = Utc::now();
            let strip = |tasks: Vec<Task>| -> Vec<Task> {
                tasks.into_iter().map(|t| Task { id: String::new(), ..t }).collect()
            };
            prop_assert_eq!(
                strip(engine.breakdown_at(&input, now)),
                strip(engine.breakdown_at(&input, now))
            );
        }
    }
}
