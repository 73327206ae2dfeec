//! Property-based tests for the command history.
//!
//! Random sessions of creates, deletes, booleans, undos and redos run against
//! a headless editor. After every step the registry and renderer must agree,
//! the stacks must match a model of them, and undo/redo must move between
//! the name sets recorded around each command.
//!
//! Run with: cargo test -p mesh-editor -- proptest

use mesh_editor_lib::error::EditorError;
use mesh_editor_lib::harness::TestHarness;
use proptest::prelude::*;
use shared::BooleanOp;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    Cube(f64),
    Sphere(f64),
    /// Index into the sorted live names, wrapped
    Delete(usize),
    Boolean(usize, usize, BooleanOp),
    Undo,
    Redo,
}

fn arb_op() -> impl Strategy<Value = BooleanOp> {
    prop_oneof![
        Just(BooleanOp::Union),
        Just(BooleanOp::Difference),
        Just(BooleanOp::Intersection),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0.5..2.0f64).prop_map(Step::Cube),
        2 => (0.3..1.5f64).prop_map(Step::Sphere),
        2 => any::<usize>().prop_map(Step::Delete),
        1 => (any::<usize>(), any::<usize>(), arb_op()).prop_map(|(a, b, op)| Step::Boolean(a, b, op)),
        2 => Just(Step::Undo),
        2 => Just(Step::Redo),
    ]
}

// =============================================================================
// Model
// =============================================================================

/// Live names before and after one executed command
#[derive(Debug, Clone)]
struct Recorded {
    before: Vec<String>,
    after: Vec<String>,
}

#[derive(Debug, Default)]
struct Model {
    done: Vec<Recorded>,
    undone: Vec<Recorded>,
}

fn pick(names: &[String], i: usize) -> Option<String> {
    (!names.is_empty()).then(|| names[i % names.len()].clone())
}

fn apply(h: &mut TestHarness, model: &mut Model, step: &Step) -> Result<(), TestCaseError> {
    let before = h.names();
    match step {
        Step::Undo => {
            let result = h.editor.undo();
            match model.done.pop() {
                Some(recorded) => {
                    prop_assert!(result.is_ok(), "undo failed: {:?}", result);
                    prop_assert_eq!(&h.names(), &recorded.before);
                    model.undone.push(recorded);
                }
                None => {
                    prop_assert!(matches!(result, Err(EditorError::EmptyHistory)));
                    prop_assert_eq!(&h.names(), &before);
                }
            }
        }
        Step::Redo => {
            let result = h.editor.redo();
            match model.undone.pop() {
                Some(recorded) => {
                    prop_assert!(result.is_ok(), "redo failed: {:?}", result);
                    prop_assert_eq!(&h.names(), &recorded.after);
                    model.done.push(recorded);
                }
                None => {
                    prop_assert!(matches!(result, Err(EditorError::EmptyHistory)));
                    prop_assert_eq!(&h.names(), &before);
                }
            }
        }
        Step::Cube(_) | Step::Sphere(_) | Step::Delete(_) | Step::Boolean(..) => {
            let result = match step {
                Step::Cube(size) => h.create_cube("Cube", *size).map(drop),
                Step::Sphere(radius) => h.create_sphere("Sphere", *radius).map(drop),
                Step::Delete(i) => match pick(&before, *i) {
                    Some(name) => h.delete(&name),
                    None => return Ok(()),
                },
                Step::Boolean(i, j, op) => match (pick(&before, *i), pick(&before, *j)) {
                    (Some(a), Some(b)) => h.editor.boolean(&a, &b, *op).map(drop),
                    _ => return Ok(()),
                },
                Step::Undo | Step::Redo => return Ok(()),
            };
            match result {
                Ok(()) => {
                    model.done.push(Recorded {
                        before,
                        after: h.names(),
                    });
                    model.undone.clear();
                }
                Err(_) => prop_assert_eq!(&h.names(), &before),
            }
        }
    }

    prop_assert!(h.in_lockstep());
    prop_assert_eq!(h.editor.scene.can_undo(), !model.done.is_empty());
    prop_assert_eq!(h.editor.scene.can_redo(), !model.undone.is_empty());
    prop_assert_eq!(h.editor.scene.history().undo_depth(), model.done.len());
    prop_assert_eq!(h.editor.scene.history().redo_depth(), model.undone.len());
    Ok(())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Undo and redo walk between recorded name sets without drifting apart
    /// from the renderer.
    #[test]
    fn random_sessions_stay_consistent(steps in prop::collection::vec(arb_step(), 1..24)) {
        let mut h = TestHarness::new();
        let mut model = Model::default();
        for step in &steps {
            apply(&mut h, &mut model, step)?;
        }

        // N undos reach the empty scene, N redos come back
        h.redo_all();
        let end = h.names();
        let depth = h.editor.scene.history().undo_depth();
        prop_assert_eq!(h.undo_all(), depth);
        prop_assert!(h.names().is_empty());
        prop_assert!(h.in_lockstep());
        prop_assert_eq!(h.redo_all(), depth);
        prop_assert_eq!(h.names(), end);
        prop_assert!(h.in_lockstep());
    }

    /// A new command after undos leaves nothing to redo
    #[test]
    fn execute_after_undo_clears_redo(creates in 1usize..6, undos in 1usize..6) {
        let mut h = TestHarness::new();
        for _ in 0..creates {
            h.create_cube("Cube", 1.0).unwrap();
        }
        let undos = undos.min(creates);
        for _ in 0..undos {
            h.editor.undo().unwrap();
        }
        prop_assert_eq!(h.editor.scene.history().redo_depth(), undos);

        h.create_sphere("Sphere", 1.0).unwrap();
        prop_assert!(matches!(h.editor.redo(), Err(EditorError::EmptyHistory)));
        prop_assert_eq!(h.entity_count(), creates - undos + 1);
        prop_assert!(h.in_lockstep());
    }
}
