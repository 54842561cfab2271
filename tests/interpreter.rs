//! Interpreter behaviour through the public API

use chrono::NaiveDate;
use voice_tasks::command::{classify, reply};
use voice_tasks::{ActionParams, Context, Intent, InterpretationResult, interpret};

mod common;
use common::{category, task, today};

fn ctx_with(tasks: Vec<voice_tasks::Task>) -> Context {
    Context::new(
        tasks,
        vec![category(3, "trabajo"), category(4, "Casa")],
        today(),
    )
}

fn params(result: &InterpretationResult) -> &ActionParams {
    &result.action().expect("expected an action").params
}

#[test]
fn test_unrecognized_transcripts() {
    let ctx = ctx_with(vec![task(1, "comprar pan")]);

    for transcript in ["", "   ", "hola qué tal", "pon música", "tarea"] {
        let result = interpret(transcript, &ctx);
        assert_eq!(result, InterpretationResult::Unrecognized, "{transcript:?}");
        assert!(result.action().is_none());
        assert!(result.speech().is_none());
    }
}

#[test]
fn test_create_plain_task() {
    let result = interpret("crear tarea comprar pan", &ctx_with(vec![]));
    let action = result.action().unwrap();

    assert_eq!(action.intent, Intent::CreateTask);
    assert!(!action.requires_confirmation);
    assert_eq!(
        action.params,
        ActionParams::CreateTask {
            title: "comprar pan".to_string(),
            due_date: None,
            category_id: None,
        }
    );
    assert_eq!(action.speech, "Tarea creada: comprar pan");
}

#[test]
fn test_create_with_date_and_inline_category() {
    let result = interpret(
        "crear tarea entregar informe para el 15 de mayo en categoría trabajo",
        &ctx_with(vec![]),
    );

    let ActionParams::CreateTask {
        title,
        due_date,
        category_id,
    } = params(&result)
    else {
        panic!("expected CreateTask, got {result:?}");
    };

    assert!(title.starts_with("entregar informe"));
    assert_eq!(*due_date, NaiveDate::from_ymd_opt(2025, 5, 15));
    assert_eq!(*category_id, Some(3));
}

#[test]
fn test_create_keeps_original_case() {
    let result = interpret("Nueva tarea Llamar a María", &ctx_with(vec![]));
    let ActionParams::CreateTask { title, .. } = params(&result) else {
        panic!("expected CreateTask");
    };
    assert_eq!(title, "Llamar a María");
}

#[test]
fn test_complete_single_match() {
    let ctx = ctx_with(vec![task(1, "lavar coche"), task(2, "comprar pan")]);
    let result = interpret("completar tarea comprar pan", &ctx);

    assert_eq!(params(&result), &ActionParams::CompleteTask { task_id: 2 });
    assert_eq!(result.speech(), Some("Tarea completada: comprar pan"));
}

#[test]
fn test_complete_not_found() {
    let ctx = ctx_with(vec![task(1, "comprar pan")]);
    let result = interpret("completar tarea xyz", &ctx);

    assert_eq!(
        result,
        InterpretationResult::Failure {
            speech: reply::pending_task_not_found("xyz"),
        }
    );
}

#[test]
fn test_first_match_in_list_order_wins() {
    let ctx = ctx_with(vec![task(10, "comprar pan"), task(11, "comprar pan integral")]);
    let result = interpret("completar tarea comprar pan", &ctx);
    assert_eq!(params(&result), &ActionParams::CompleteTask { task_id: 10 });

    let reversed = ctx_with(vec![task(11, "comprar pan integral"), task(10, "comprar pan")]);
    let result = interpret("completar tarea comprar pan", &reversed);
    assert_eq!(params(&result), &ActionParams::CompleteTask { task_id: 11 });
}

#[test]
fn test_assign_category_to_task() {
    let ctx = ctx_with(vec![task(1, "comprar pan")]);
    let result = interpret("asignar categoría trabajo a tarea comprar pan", &ctx);
    let action = result.action().unwrap();

    assert_eq!(action.intent, Intent::AssignCategoryToTask);
    assert!(!action.requires_confirmation);
    assert_eq!(
        action.params,
        ActionParams::AssignCategory {
            task_id: 1,
            category_id: 3,
        }
    );
}

#[test]
fn test_category_lookup_is_case_insensitive() {
    let ctx = ctx_with(vec![task(1, "barrer")]);
    let result = interpret("poner categoría casa a tarea barrer", &ctx);
    assert_eq!(
        params(&result),
        &ActionParams::AssignCategory {
            task_id: 1,
            category_id: 4,
        }
    );
}

#[test]
fn test_bulk_assignment_requires_confirmation() {
    let mut done = task(3, "ya hecha");
    done.completed = true;
    let ctx = ctx_with(vec![task(1, "comprar pan"), done, task(2, "lavar coche")]);

    let result = interpret("asignar categoría a todas como trabajo", &ctx);
    let action = result.action().unwrap();

    assert_eq!(action.intent, Intent::AssignCategoryToAll);
    assert!(action.requires_confirmation);
    let pending = action.pending.as_ref().unwrap();
    assert_eq!(pending.category_id, 3);
    assert_eq!(pending.affected_task_ids, vec![1, 2]);
    assert_eq!(
        action.speech,
        "¿Quieres asignar la categoría trabajo a tus 2 tareas pendientes?"
    );
}

#[test]
fn test_interpret_is_idempotent() {
    let ctx = ctx_with(vec![task(1, "comprar pan"), task(2, "lavar coche")]);
    let transcripts = [
        "crear tarea informe para el 3 de junio",
        "completar tarea pan",
        "asignar categoría a todas como trabajo",
        "mis tareas",
        "algo sin sentido",
    ];

    for transcript in transcripts {
        assert_eq!(interpret(transcript, &ctx), interpret(transcript, &ctx));
    }
}

#[test]
fn test_intent_order_prefers_bulk_over_single() {
    assert_eq!(
        classify("asignar categoría a todas como trabajo"),
        Intent::AssignCategoryToAll
    );
    assert_eq!(
        classify("asignar categoría trabajo a tarea pan"),
        Intent::AssignCategoryToTask
    );
    assert_eq!(classify("eliminar categoría de tarea pan"), Intent::RemoveCategoryFromTask);
    assert_eq!(classify("eliminar tarea pan"), Intent::DeleteTask);
}

#[tokio::test]
async fn test_concurrent_interpretation() {
    let ctx = std::sync::Arc::new(ctx_with(vec![task(1, "comprar pan")]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            tokio::spawn(async move { interpret("completar tarea pan", &ctx) })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert_eq!(params(&result), &ActionParams::CompleteTask { task_id: 1 });
    }
}
