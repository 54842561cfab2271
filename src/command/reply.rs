//! Spoken replies (es-ES)
//!
//! The format hints echo the phrase shapes the extractor accepts and are part
//! of the voice vocabulary users learn, so keep them in sync with `extract`.

use crate::model::Priority;

/// Phrases the user can say, read out on request
pub const HELP_SPEECH: &str = "Puedes decir: \"Crear tarea\", \"Mis tareas pendientes\", \"Completar tarea\", \"Eliminar tarea\", \"Filtrar por categoría\", \"Asignar categoría [nombre] a tarea [título]\", \"Asignar categoría a todas como [nombre]\", \"Quitar categoría de tarea [título]\" o \"Asignar prioridad a tarea [título] como [alta/media/baja]\"";

pub const COMPLETE_FORMAT: &str = "No entendí qué tarea quieres completar. Por favor, intenta de nuevo con el formato: Completar tarea [nombre de tarea]";

pub const DELETE_FORMAT: &str = "No entendí qué tarea quieres eliminar. Por favor, intenta de nuevo con el formato: Eliminar tarea [nombre de tarea]";

pub const FILTER_FORMAT: &str = "No entendí por qué categoría quieres filtrar. Por favor, intenta de nuevo con el formato: Filtrar por categoría [nombre de categoría]";

pub const CATEGORY_FOR_TASK_FORMAT: &str = "No entendí qué categoría quieres asignar a qué tarea. Por favor, intenta de nuevo con el formato: Asignar categoría [nombre de categoría] a tarea [nombre de tarea]";

pub const CATEGORY_FOR_ALL_FORMAT: &str = "No entendí qué categoría quieres asignar a todas las tareas. Por favor, intenta de nuevo con el formato: Asignar categoría a todas las tareas como [nombre de categoría]";

pub const CATEGORY_REMOVAL_FORMAT: &str = "No entendí de qué tarea quieres quitar la categoría. Por favor, intenta de nuevo con el formato: Quitar categoría de tarea [nombre de tarea]";

pub const PRIORITY_FORMAT: &str = "No entendí qué prioridad quieres asignar a qué tarea. Por favor, intenta de nuevo con el formato: Asignar prioridad a tarea [nombre de tarea] como [alta/media/baja]";

pub const NO_PENDING_TASKS: &str = "No tienes tareas pendientes.";

pub const NO_PENDING_TO_CATEGORIZE: &str = "No tienes tareas pendientes para categorizar.";

pub const TASK_NOT_PENDING: &str = "No encontré esa tarea en tu lista de pendientes.";

pub const SHOWING_ALL: &str = "Mostrando todas las tareas";

pub const SHOWING_UNCATEGORIZED: &str = "Mostrando tareas sin categoría";

#[must_use]
pub fn pending_tasks(titles: &[&str]) -> String {
    format!(
        "Tienes {} tareas pendientes: {}",
        titles.len(),
        titles.join(", ")
    )
}

#[must_use]
pub fn task_created(title: &str) -> String {
    format!("Tarea creada: {title}")
}

#[must_use]
pub fn task_completed(title: &str) -> String {
    format!("Tarea completada: {title}")
}

#[must_use]
pub fn task_deleted(title: &str) -> String {
    format!("Tarea eliminada: {title}")
}

#[must_use]
pub fn showing_category(name: &str) -> String {
    format!("Mostrando tareas de la categoría {name}")
}

#[must_use]
pub fn category_not_found(name: &str) -> String {
    format!("No encontré la categoría {name}")
}

#[must_use]
pub fn category_must_exist(name: &str) -> String {
    format!("No encontré la categoría {name}. Por favor, crea esta categoría primero.")
}

#[must_use]
pub fn pending_task_not_found(fragment: &str) -> String {
    format!("No encontré la tarea \"{fragment}\" en tu lista de pendientes.")
}

#[must_use]
pub fn task_not_found(fragment: &str) -> String {
    format!("No encontré la tarea \"{fragment}\" en tu lista.")
}

#[must_use]
pub fn category_assigned(category: &str, title: &str) -> String {
    format!("He asignado la categoría {category} a la tarea \"{title}\"")
}

#[must_use]
pub fn category_removed(title: &str) -> String {
    format!("He quitado la categoría de la tarea \"{title}\"")
}

#[must_use]
pub fn no_category_assigned(title: &str) -> String {
    format!("La tarea \"{title}\" no tiene una categoría asignada.")
}

#[must_use]
pub fn priority_changed(title: &str, priority: Priority) -> String {
    format!("He cambiado la prioridad de la tarea \"{title}\" a {priority}")
}
