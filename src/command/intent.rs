//! Intent classification over an ordered trigger table
//!
//! Several trigger sets overlap ("asignar categoría a todas" contains
//! "asignar categoría", "eliminar categoría" shares a verb with "eliminar
//! tarea"), so the table is evaluated top to bottom and the first rule that
//! matches wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The classified user goal for a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateTask,
    ListPendingTasks,
    CompleteTask,
    DeleteTask,
    FilterByCategory,
    AssignCategoryToTask,
    AssignCategoryToAll,
    RemoveCategoryFromTask,
    AssignPriorityToTask,
    Unrecognized,
}

impl Intent {
    /// Stable identifier used in logs and API payloads
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ListPendingTasks => "list_pending_tasks",
            Self::CompleteTask => "complete_task",
            Self::DeleteTask => "delete_task",
            Self::FilterByCategory => "filter_by_category",
            Self::AssignCategoryToTask => "assign_category_to_task",
            Self::AssignCategoryToAll => "assign_category_to_all",
            Self::RemoveCategoryFromTask => "remove_category_from_task",
            Self::AssignPriorityToTask => "assign_priority_to_task",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the trigger table
pub struct IntentRule {
    pub intent: Intent,
    /// Phrases looked up by substring in the lowercased transcript
    pub phrases: &'static [&'static str],
    /// Extra predicate for triggers that are not a fixed phrase
    pub predicate: Option<fn(&str) -> bool>,
}

impl IntentRule {
    /// Whether this rule fires for an already-lowercased transcript
    #[must_use]
    pub fn matches(&self, lower: &str) -> bool {
        self.phrases.iter().any(|p| lower.contains(p))
            || self.predicate.is_some_and(|pred| pred(lower))
    }
}

/// "marcar tarea X como alta" shorthand for priority changes
static PRIORITY_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"marcar (?:la )?tarea .+ como (?:prioridad )?(?:alta|media|baja)")
        .expect("valid regex")
});

fn is_priority_shorthand(lower: &str) -> bool {
    PRIORITY_SHORTHAND.is_match(lower)
}

/// Ordered trigger table; position is significant
pub static INTENT_TABLE: [IntentRule; 9] = [
    IntentRule {
        intent: Intent::AssignCategoryToAll,
        phrases: &[
            "asignar categoría a todas",
            "cambiar categoría de todas",
            "categorizar todas",
        ],
        predicate: None,
    },
    IntentRule {
        intent: Intent::AssignCategoryToTask,
        phrases: &["asignar categoría", "cambiar categoría", "poner categoría"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::RemoveCategoryFromTask,
        phrases: &["quitar categoría", "eliminar categoría", "remover categoría"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::AssignPriorityToTask,
        phrases: &["asignar prioridad", "cambiar prioridad", "marcar como prioritaria"],
        predicate: Some(is_priority_shorthand),
    },
    IntentRule {
        intent: Intent::FilterByCategory,
        phrases: &["mostrar tareas de categoría", "filtrar por categoría"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::CreateTask,
        phrases: &["crear tarea", "nueva tarea"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::ListPendingTasks,
        phrases: &["mis tareas", "tareas pendientes"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::CompleteTask,
        phrases: &["completar tarea", "marcar como completada"],
        predicate: None,
    },
    IntentRule {
        intent: Intent::DeleteTask,
        phrases: &["eliminar tarea"],
        predicate: None,
    },
];

/// Classify a transcript into exactly one intent
///
/// Matching is case-insensitive. Empty or whitespace-only transcripts are
/// always [`Intent::Unrecognized`].
#[must_use]
pub fn classify(transcript: &str) -> Intent {
    if transcript.trim().is_empty() {
        return Intent::Unrecognized;
    }

    let lower = transcript.to_lowercase();
    INTENT_TABLE
        .iter()
        .find(|rule| rule.matches(&lower))
        .map_or(Intent::Unrecognized, |rule| rule.intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_is_unrecognized() {
        assert_eq!(classify(""), Intent::Unrecognized);
        assert_eq!(classify("   \t "), Intent::Unrecognized);
    }

    #[test]
    fn test_no_trigger_is_unrecognized() {
        assert_eq!(classify("hola, ¿qué tal?"), Intent::Unrecognized);
        assert_eq!(classify("tarea"), Intent::Unrecognized);
    }

    #[test]
    fn test_bulk_assignment_beats_single_assignment() {
        assert_eq!(
            classify("Asignar categoría a todas como trabajo"),
            Intent::AssignCategoryToAll
        );
        assert_eq!(
            classify("asignar categoría trabajo a tarea comprar pan"),
            Intent::AssignCategoryToTask
        );
    }

    #[test]
    fn test_remove_category_beats_delete_task() {
        assert_eq!(
            classify("eliminar categoría de tarea comprar pan"),
            Intent::RemoveCategoryFromTask
        );
        assert_eq!(classify("eliminar tarea comprar pan"), Intent::DeleteTask);
    }

    #[test]
    fn test_priority_shorthand() {
        assert_eq!(
            classify("marcar tarea informe como alta"),
            Intent::AssignPriorityToTask
        );
        assert_eq!(
            classify("marcar la tarea informe como prioridad baja"),
            Intent::AssignPriorityToTask
        );
        assert_eq!(
            classify("marcar como completada comprar pan"),
            Intent::CompleteTask
        );
    }

    #[test]
    fn test_case_insensitive_with_accents() {
        assert_eq!(
            classify("FILTRAR POR CATEGORÍA trabajo"),
            Intent::FilterByCategory
        );
        assert_eq!(classify("Crear Tarea comprar pan"), Intent::CreateTask);
    }

    #[test]
    fn test_each_rule_has_a_distinct_intent() {
        let mut seen = std::collections::HashSet::new();
        for rule in &INTENT_TABLE {
            assert!(seen.insert(rule.intent), "duplicate rule for {}", rule.intent);
            assert_ne!(rule.intent, Intent::Unrecognized);
        }
    }

    #[test]
    fn test_list_and_create_overlap_resolves_to_create() {
        // "nueva tarea" is checked before "tareas pendientes"
        assert_eq!(
            classify("nueva tarea revisar tareas pendientes"),
            Intent::CreateTask
        );
    }
}
