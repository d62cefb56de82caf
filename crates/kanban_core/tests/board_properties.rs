use kanban_core::{
    decode_snapshot, encode_snapshot, reduce, BoardCommand, BoardState, ColumnType, NewTask,
    SystemEnv,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Command shape with ids expressed as indexes into whatever exists.
#[derive(Debug, Clone)]
enum Op {
    AddProject(String),
    RenameProject(usize, String),
    DeleteProject(usize),
    SelectProject(usize),
    AddTask(String, ColumnType),
    UpdateTask(usize, String),
    DeleteTask(usize),
    MoveTask(usize, ColumnType),
}

fn column() -> impl Strategy<Value = ColumnType> {
    prop_oneof![
        Just(ColumnType::Todo),
        Just(ColumnType::InProgress),
        Just(ColumnType::Done),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(Op::AddProject),
        (0..6usize, "[a-z]{0,8}").prop_map(|(i, n)| Op::RenameProject(i, n)),
        (0..6usize).prop_map(Op::DeleteProject),
        (0..6usize).prop_map(Op::SelectProject),
        ("[a-z]{0,8}", column()).prop_map(|(t, c)| Op::AddTask(t, c)),
        (0..10usize, "[a-z]{0,8}").prop_map(|(i, t)| Op::UpdateTask(i, t)),
        (0..10usize).prop_map(Op::DeleteTask),
        (0..10usize, column()).prop_map(|(i, c)| Op::MoveTask(i, c)),
    ]
}

fn project_id(state: &BoardState, index: usize) -> String {
    state
        .projects
        .get(index)
        .map(|project| project.id.clone())
        .unwrap_or_else(|| "unknown-project".to_string())
}

fn current_task(state: &BoardState, index: usize) -> Option<kanban_core::Task> {
    state
        .current_project()
        .and_then(|project| project.tasks.get(index))
        .cloned()
}

fn to_command(state: &BoardState, op: Op) -> BoardCommand {
    match op {
        Op::AddProject(name) => BoardCommand::AddProject { name },
        Op::RenameProject(i, name) => BoardCommand::RenameProject {
            id: project_id(state, i),
            name,
        },
        Op::DeleteProject(i) => BoardCommand::DeleteProject {
            id: project_id(state, i),
        },
        Op::SelectProject(i) => BoardCommand::SetCurrentProject {
            id: project_id(state, i),
        },
        Op::AddTask(title, column) => BoardCommand::AddTask(NewTask::new(title, column)),
        Op::UpdateTask(i, title) => match current_task(state, i) {
            Some(mut task) => {
                task.title = title;
                BoardCommand::UpdateTask(task)
            }
            None => BoardCommand::UpdateTask(kanban_core::Task {
                id: "unknown-task".to_string(),
                title,
                description: None,
                created_at: chrono::Utc::now(),
                column: ColumnType::Todo,
            }),
        },
        Op::DeleteTask(i) => BoardCommand::DeleteTask {
            id: current_task(state, i)
                .map(|task| task.id)
                .unwrap_or_else(|| "unknown-task".to_string()),
        },
        Op::MoveTask(i, column) => BoardCommand::MoveTask {
            id: current_task(state, i)
                .map(|task| task.id)
                .unwrap_or_else(|| "unknown-task".to_string()),
            column,
        },
    }
}

fn run(ops: Vec<Op>) -> Vec<BoardState> {
    let mut env = SystemEnv;
    let mut state = BoardState::default();
    let mut history = vec![state.clone()];
    for op in ops {
        let command = to_command(&state, op);
        if let Some(next) = reduce(&state, command, &mut env) {
            state = next;
        }
        history.push(state.clone());
    }
    history
}

proptest! {
    #[test]
    fn ids_stay_unique_for_any_command_sequence(ops in proptest::collection::vec(op(), 0..60)) {
        for state in run(ops) {
            prop_assert!(state.validate().is_ok());

            let project_ids: HashSet<&str> =
                state.projects.iter().map(|p| p.id.as_str()).collect();
            prop_assert_eq!(project_ids.len(), state.projects.len());
            for project in &state.projects {
                let task_ids: HashSet<&str> =
                    project.tasks.iter().map(|t| t.id.as_str()).collect();
                prop_assert_eq!(task_ids.len(), project.tasks.len());
            }
        }
    }

    #[test]
    fn current_project_never_dangles(ops in proptest::collection::vec(op(), 0..60)) {
        for state in run(ops) {
            if let Some(id) = state.current_project_id.as_deref() {
                prop_assert!(state.project(id).is_some());
            }
        }
    }

    #[test]
    fn every_reachable_snapshot_roundtrips(ops in proptest::collection::vec(op(), 0..30)) {
        for state in run(ops) {
            let decoded = decode_snapshot(&encode_snapshot(&state).unwrap()).unwrap();
            prop_assert_eq!(decoded, state);
        }
    }

    #[test]
    fn move_task_twice_equals_once(
        ops in proptest::collection::vec(op(), 0..30),
        index in 0..10usize,
        target in column(),
    ) {
        let mut env = SystemEnv;
        let state = run(ops).pop().unwrap();
        let command = to_command(&state, Op::MoveTask(index, target));

        let once = reduce(&state, command.clone(), &mut env).unwrap_or_else(|| state.clone());
        let twice = reduce(&once, command, &mut env);

        prop_assert!(twice.is_none());
    }

    #[test]
    fn update_of_unknown_task_changes_nothing(ops in proptest::collection::vec(op(), 0..30)) {
        let mut env = SystemEnv;
        let state = run(ops).pop().unwrap();
        let command = to_command(&state, Op::UpdateTask(usize::MAX, "ghost".to_string()));

        prop_assert!(matches!(command, BoardCommand::UpdateTask(_)));
        prop_assert!(reduce(&state, command, &mut env).is_none());
    }

    #[test]
    fn add_task_without_current_project_changes_nothing(
        title in "[a-z]{0,8}",
        target in column(),
    ) {
        let mut env = SystemEnv;
        let state = BoardState::default();
        let next = reduce(&state, BoardCommand::AddTask(NewTask::new(title, target)), &mut env);
        prop_assert!(next.is_none());
    }
}
