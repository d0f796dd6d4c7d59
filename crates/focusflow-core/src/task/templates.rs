//! Keyword rules and micro-task templates for task breakdown.
//!
//! Each task type carries a keyword list and an ordered list of templates.
//! The catalog order is significant: it is the scoring order, and ties keep
//! the first type seen.

use serde::{Deserialize, Serialize};

use super::Difficulty;
use crate::error::ValidationError;

/// A template for one generated micro-task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroTaskTemplate {
    pub title: String,
    /// Estimated minutes
    pub minutes: u32,
    pub difficulty: Difficulty,
    pub xp: u32,
}

fn step(title: &str, minutes: u32, difficulty: Difficulty, xp: u32) -> MicroTaskTemplate {
    MicroTaskTemplate {
        title: title.to_string(),
        minutes,
        difficulty,
        xp,
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

/// Display metadata for a detected task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTypeInfo {
    pub id: String,
    pub label: String,
    pub emoji: String,
}

/// A task type: keywords to detect it and templates to expand it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTypeRule {
    pub id: String,
    pub label: String,
    pub emoji: String,
    /// Lower-case substrings matched against the lower-cased input.
    pub keywords: Vec<String>,
    pub templates: Vec<MicroTaskTemplate>,
}

impl TaskTypeRule {
    /// Number of keywords occurring in an already lower-cased input.
    pub fn score(&self, lowered: &str) -> usize {
        self.keywords
            .iter()
            .filter(|kw| lowered.contains(kw.as_str()))
            .count()
    }

    pub fn info(&self) -> TaskTypeInfo {
        TaskTypeInfo {
            id: self.id.clone(),
            label: self.label.clone(),
            emoji: self.emoji.clone(),
        }
    }

    pub fn study() -> Self {
        use Difficulty::*;
        Self {
            id: "study".into(),
            label: "Study Session".into(),
            emoji: "📚".into(),
            keywords: words(&[
                "study", "test", "exam", "quiz", "review", "prepare", "midterm", "final",
            ]),
            templates: vec![
                step("Review class notes & highlight key concepts", 10, Easy, 15),
                step("Create a mind map of main topics", 12, Easy, 18),
                step("Practice problems — start with easier ones", 15, Medium, 25),
                step("Tackle challenging practice questions", 20, Hard, 35),
                step("Self-quiz: cover notes and test yourself", 10, Medium, 22),
            ],
        }
    }

    pub fn math() -> Self {
        use Difficulty::*;
        Self {
            id: "math".into(),
            label: "Math Practice".into(),
            emoji: "🔢".into(),
            keywords: words(&[
                "math", "calc", "calculus", "algebra", "geometry", "trig", "statistics",
                "equation",
            ]),
            templates: vec![
                step("Review formulas and key theorems", 8, Easy, 12),
                step("Work through example problems step-by-step", 12, Easy, 18),
                step("Solve practice set — medium difficulty", 18, Medium, 28),
                step("Challenge yourself with advanced problems", 22, Hard, 38),
                step("Review mistakes and understand error patterns", 10, Medium, 20),
            ],
        }
    }

    pub fn science() -> Self {
        use Difficulty::*;
        Self {
            id: "science".into(),
            label: "Science Study".into(),
            emoji: "🔬".into(),
            keywords: words(&[
                "science", "physics", "chemistry", "biology", "lab", "experiment", "hypothesis",
            ]),
            templates: vec![
                step("Read through key concepts and definitions", 10, Easy, 15),
                step("Draw diagrams and label important parts", 12, Easy, 18),
                step("Work through practice problems", 18, Medium, 28),
                step("Connect concepts — explain how topics relate", 15, Hard, 32),
                step("Create flashcards for quick review", 8, Easy, 12),
            ],
        }
    }

    pub fn read() -> Self {
        use Difficulty::*;
        Self {
            id: "read".into(),
            label: "Reading Session".into(),
            emoji: "📖".into(),
            keywords: words(&[
                "read", "chapter", "book", "article", "textbook", "passage", "literature",
            ]),
            templates: vec![
                step("Skim headings, bold text, and summaries", 6, Easy, 10),
                step("Read first section — annotate key ideas", 15, Medium, 22),
                step("Read remaining sections with active notes", 18, Medium, 25),
                step("Write a paragraph summary in your words", 10, Medium, 20),
            ],
        }
    }

    pub fn write() -> Self {
        use Difficulty::*;
        Self {
            id: "write".into(),
            label: "Writing Task".into(),
            emoji: "✍️".into(),
            keywords: words(&[
                "write", "essay", "paper", "report", "assignment", "thesis", "paragraph", "draft",
            ]),
            templates: vec![
                step("Brainstorm ideas and create an outline", 10, Easy, 15),
                step("Write a strong introduction paragraph", 12, Medium, 22),
                step("Write body paragraphs with evidence", 25, Hard, 42),
                step("Write conclusion and transition sentences", 12, Medium, 22),
                step("Proofread and edit for clarity", 10, Easy, 15),
            ],
        }
    }

    pub fn project() -> Self {
        use Difficulty::*;
        Self {
            id: "project".into(),
            label: "Project Work".into(),
            emoji: "🎯".into(),
            keywords: words(&[
                "project", "presentation", "build", "create", "design", "poster", "slideshow",
            ]),
            templates: vec![
                step("Define goals and plan deliverables", 10, Easy, 15),
                step("Research and gather key resources", 15, Medium, 22),
                step("Build the main deliverable", 25, Hard, 40),
                step("Add finishing touches and visuals", 15, Medium, 25),
                step("Review, practice, and prepare to present", 10, Easy, 18),
            ],
        }
    }

    pub fn coding() -> Self {
        use Difficulty::*;
        Self {
            id: "coding".into(),
            label: "Coding Session".into(),
            emoji: "💻".into(),
            keywords: words(&[
                "code", "coding", "program", "programming", "app", "website", "debug", "function",
                "algorithm",
            ]),
            templates: vec![
                step("Plan your approach and pseudocode", 8, Easy, 12),
                step("Set up files and write boilerplate", 10, Easy, 15),
                step("Implement core functionality", 25, Hard, 40),
                step("Test and debug your code", 15, Medium, 25),
                step("Clean up and add comments", 8, Easy, 12),
            ],
        }
    }

    pub fn language() -> Self {
        use Difficulty::*;
        Self {
            id: "language".into(),
            label: "Language Practice".into(),
            emoji: "🌍".into(),
            keywords: words(&[
                "spanish", "french", "vocab", "vocabulary", "grammar", "language", "conjugat",
                "translate",
            ]),
            templates: vec![
                step("Review new vocabulary words", 8, Easy, 12),
                step("Practice grammar rules with examples", 12, Medium, 20),
                step("Write sentences using new words", 15, Medium, 25),
                step("Quiz yourself on vocabulary", 10, Easy, 15),
            ],
        }
    }

    pub fn history() -> Self {
        use Difficulty::*;
        Self {
            id: "history".into(),
            label: "History Review".into(),
            emoji: "🏛️".into(),
            keywords: words(&[
                "history", "historical", "war", "revolution", "civilization", "era", "timeline",
                "ap history",
            ]),
            templates: vec![
                step("Read through key events and dates", 10, Easy, 15),
                step("Create a timeline of important events", 12, Easy, 18),
                step("Analyze cause and effect relationships", 18, Medium, 28),
                step("Practice with past exam questions", 15, Hard, 32),
            ],
        }
    }

    pub fn homework() -> Self {
        use Difficulty::*;
        Self {
            id: "homework".into(),
            label: "Homework".into(),
            emoji: "📝".into(),
            keywords: words(&[
                "homework", "hw", "assignment", "worksheet", "workbook", "due", "finish",
            ]),
            templates: vec![
                step("Read instructions carefully", 5, Easy, 8),
                step("Complete first half of questions", 15, Medium, 22),
                step("Complete second half of questions", 15, Medium, 22),
                step("Double-check answers and submit", 8, Easy, 12),
            ],
        }
    }

    /// Fallback used when no keyword matches.
    pub fn fallback() -> Self {
        use Difficulty::*;
        Self {
            id: "default".into(),
            label: "Task".into(),
            emoji: "✨".into(),
            keywords: Vec::new(),
            templates: vec![
                step("Break down the task and plan approach", 8, Easy, 12),
                step("Work on the first chunk", 15, Medium, 22),
                step("Tackle the main portion", 22, Hard, 35),
                step("Review and finalize your work", 10, Easy, 15),
            ],
        }
    }
}

/// Ordered rule table used for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    rules: Vec<TaskTypeRule>,
    fallback: TaskTypeRule,
}

impl TemplateCatalog {
    /// Build a catalog from custom rules.
    ///
    /// # Errors
    ///
    /// Every rule, the fallback included, must expand to at least one
    /// micro-task, and every template must have positive time and XP.
    pub fn new(rules: Vec<TaskTypeRule>, fallback: TaskTypeRule) -> Result<Self, ValidationError> {
        for rule in rules.iter().chain(std::iter::once(&fallback)) {
            if rule.templates.is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("catalog.{}", rule.id),
                    message: "task type has no templates".into(),
                });
            }
            if let Some(bad) = rule.templates.iter().find(|t| t.minutes == 0 || t.xp == 0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("catalog.{}", rule.id),
                    message: format!("template '{}' needs positive minutes and xp", bad.title),
                });
            }
        }
        Ok(Self { rules, fallback })
    }

    /// The built-in study catalog.
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                TaskTypeRule::study(),
                TaskTypeRule::math(),
                TaskTypeRule::science(),
                TaskTypeRule::read(),
                TaskTypeRule::write(),
                TaskTypeRule::project(),
                TaskTypeRule::coding(),
                TaskTypeRule::language(),
                TaskTypeRule::history(),
                TaskTypeRule::homework(),
            ],
            fallback: TaskTypeRule::fallback(),
        }
    }

    pub fn rules(&self) -> &[TaskTypeRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &TaskTypeRule {
        &self.fallback
    }

    /// Select the rule with the strictly highest keyword score.
    ///
    /// Ties keep the earlier rule; a zero score everywhere selects the fallback.
    pub fn classify(&self, input: &str) -> &TaskTypeRule {
        let lowered = input.to_lowercase();
        let mut best = &self.fallback;
        let mut best_score = 0;
        for rule in &self.rules {
            let score = rule.score(&lowered);
            if score > best_score {
                best_score = score;
                best = rule;
            }
        }
        best
    }

    /// Look a rule up by id, the fallback included.
    pub fn get(&self, id: &str) -> Option<&TaskTypeRule> {
        self.rules
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|r| r.id == id)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = TemplateCatalog::builtin();
        let rebuilt = TemplateCatalog::new(builtin.rules().to_vec(), builtin.fallback().clone());
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.rules().len(), 10);
    }

    #[test]
    fn highest_score_wins_over_first_match() {
        let catalog = TemplateCatalog::builtin();
        // study: "study", "test" ; math: "calc"
        assert_eq!(catalog.classify("Study for AP Calc test").id, "study");
        // math: "calc", "calculus", "equation" ; study: "review"
        assert_eq!(catalog.classify("review calculus equations").id, "math");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = TemplateCatalog::builtin();
        // "assignment" is a keyword of both write and homework; write comes first.
        assert_eq!(catalog.classify("the assignment").id, "write");
    }

    #[test]
    fn zero_score_selects_fallback() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.classify("clean my room").id, "default");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.classify("BIOLOGY!!").id, "science");
        assert_eq!(catalog.classify("Conjugation drills").id, "language");
    }

    #[test]
    fn empty_template_list_is_rejected() {
        let mut empty = TaskTypeRule::study();
        empty.templates.clear();
        let err = TemplateCatalog::new(vec![empty], TaskTypeRule::fallback()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn get_finds_fallback_by_id() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.get("default").map(|r| r.label.as_str()), Some("Task"));
        assert!(catalog.get("nope").is_none());
    }
}
