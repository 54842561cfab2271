//! Argument extraction from transcripts
//!
//! Patterns run case-insensitively against the original-case transcript so
//! titles and names keep the user's casing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::Priority;

/// Spanish month names, index 0 is January
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

static CREATE_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)crear tarea|nueva tarea").expect("valid regex"));

static COMPLETE_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)completar tarea|marcar como completada").expect("valid regex")
});

static DELETE_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)eliminar tarea").expect("valid regex"));

static FILTER_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mostrar tareas de categoría|filtrar por categoría").expect("valid regex")
});

static DUE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)para el (\d{1,2})(?: de)? ([a-zA-Z]+)").expect("valid regex")
});

static INLINE_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)en (?:la )?categoría ([\p{L}\p{N} ]+)").expect("valid regex")
});

static CATEGORY_FOR_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:asignar|cambiar|poner) categoría (.+?) (?:a|para) (?:la )?tarea (.+)")
        .expect("valid regex")
});

static CATEGORY_FOR_ALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:asignar categoría|cambiar categoría|categorizar) (?:a |de )?todas (?:las tareas )?(?:a |como |en )?(.+)",
    )
    .expect("valid regex")
});

static CATEGORY_REMOVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:quitar|eliminar|remover) categoría (?:de |a )?(?:la )?tarea (.+)")
        .expect("valid regex")
});

static PRIORITY_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:asignar|cambiar) prioridad (?:a|de) (?:la )?tarea (.+?) (?:como|a) (?:prioridad )?(alta|media|baja)",
    )
    .expect("valid regex")
});

static PRIORITY_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)marcar (?:la )?tarea (.+?) como (?:prioridad )?(alta|media|baja)")
        .expect("valid regex")
});

/// Remove the first trigger occurrence and trim
fn strip_first(transcript: &str, trigger: &Regex) -> String {
    trigger.replace(transcript, "").trim().to_string()
}

/// Title for a new task: the transcript minus its trigger phrase
#[must_use]
pub fn create_title(transcript: &str) -> String {
    strip_first(transcript, &CREATE_TRIGGER)
}

/// Task fragment for a completion command
#[must_use]
pub fn completion_fragment(transcript: &str) -> String {
    strip_first(transcript, &COMPLETE_TRIGGER)
}

/// Task fragment for a deletion command
#[must_use]
pub fn deletion_fragment(transcript: &str) -> String {
    strip_first(transcript, &DELETE_TRIGGER)
}

/// Lowercased category name for a filter command
#[must_use]
pub fn filter_name(transcript: &str) -> String {
    strip_first(transcript, &FILTER_TRIGGER).to_lowercase()
}

/// Month number (1-12) of the first table entry contained in `word`
///
/// Containment rather than equality: "mayoría" resolves to May.
#[must_use]
pub fn month_number(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    MONTHS
        .iter()
        .position(|m| lower.contains(m))
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Due date from a "para el {day} de {month}" phrase, in `year`
///
/// Any parse failure (bad day, unknown month, impossible date) yields `None`.
#[must_use]
pub fn due_date(text: &str, year: i32) -> Option<NaiveDate> {
    let caps = DUE_DATE.captures(text)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month = month_number(caps.get(2)?.as_str())?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Lowercased category name from an "en (la) categoría {name}" phrase
#[must_use]
pub fn inline_category(text: &str) -> Option<String> {
    let caps = INLINE_CATEGORY.captures(text)?;
    let name = caps.get(1)?.as_str().trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Category name plus task fragment for a single-task assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTaskRef {
    /// Lowercased category name
    pub category: String,
    /// Task title fragment, original case
    pub task: String,
}

/// Parse "(asignar|cambiar|poner) categoría {cat} (a|para) (la) tarea {task}"
#[must_use]
pub fn category_for_task(transcript: &str) -> Option<CategoryTaskRef> {
    let caps = CATEGORY_FOR_TASK.captures(transcript)?;
    Some(CategoryTaskRef {
        category: caps.get(1)?.as_str().trim().to_lowercase(),
        task: caps.get(2)?.as_str().trim().to_string(),
    })
}

/// Lowercased category name for a bulk assignment
#[must_use]
pub fn category_for_all(transcript: &str) -> Option<String> {
    let caps = CATEGORY_FOR_ALL.captures(transcript)?;
    Some(caps.get(1)?.as_str().trim().to_lowercase())
}

/// Task fragment for a category removal
#[must_use]
pub fn category_removal_task(transcript: &str) -> Option<String> {
    let caps = CATEGORY_REMOVAL.captures(transcript)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}

/// Task fragment and priority level, from either accepted phrase shape
#[must_use]
pub fn priority_for_task(transcript: &str) -> Option<(String, Priority)> {
    let caps = PRIORITY_LONG
        .captures(transcript)
        .or_else(|| PRIORITY_SHORT.captures(transcript))?;
    let task = caps.get(1)?.as_str().trim().to_string();
    let priority = caps.get(2)?.as_str().parse().ok()?;
    Some((task, priority))
}
