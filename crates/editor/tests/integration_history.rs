//! Integration tests for the command history: undo/redo properties,
//! failure policies and registry/render lockstep.

use glam::Vec3;
use mesh_editor_lib::error::EditorError;
use mesh_editor_lib::harness::TestHarness;
use mesh_editor_lib::state::EditorSettings;
use shared::BooleanOp;

/// A closed box that does not overlap a unit cube at the origin
fn far_box(h: &mut TestHarness, name: &str) -> String {
    h.editor
        .set_plane(Vec3::new(10.0, 0.0, 0.0), Vec3::Z)
        .unwrap();
    h.create_rectangle(name, 1.0, 1.0).unwrap();
    h.editor.reset_plane();
    h.editor.extrude(name, 1.0, None).unwrap()
}

#[test]
fn test_undo_restores_prior_membership() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_sphere("B", 1.0).unwrap();
    let before = h.names();

    h.delete("A").unwrap();
    assert_eq!(h.names(), vec!["B"]);
    assert!(h.undo());
    assert_eq!(h.names(), before);
    assert!(h.in_lockstep());
}

#[test]
fn test_redo_reapplies_command() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.delete("A").unwrap();
    let after = h.names();

    assert!(h.undo());
    assert!(h.redo());
    assert_eq!(h.names(), after);
    assert!(h.in_lockstep());
}

#[test]
fn test_full_undo_then_full_redo() {
    let mut h = TestHarness::new();
    h.create_cube("Cube", 1.0).unwrap();
    far_box(&mut h, "Base");
    h.create_circle("Ring", 0.5).unwrap();
    h.editor.boolean("Cube", "Base_ext", BooleanOp::Union).unwrap();
    h.delete("Ring").unwrap();
    let end = h.names();
    assert_eq!(end, vec!["union_result"]);

    assert_eq!(h.undo_all(), 6);
    assert!(h.names().is_empty());
    assert!(h.in_lockstep());

    assert_eq!(h.redo_all(), 6);
    assert_eq!(h.names(), end);
    assert!(h.in_lockstep());
}

#[test]
fn test_revolve_replaces_profile() {
    let mut h = TestHarness::new();
    h.create_line("Edge", (0.5, 0.0), (0.5, 1.0)).unwrap();
    assert_eq!(h.editor.revolve("Edge", 360.0).unwrap(), "Edge_rev");
    assert!(h.validate_mesh("Edge_rev").is_some());
    assert!(!h.is_drawn("Edge"));

    assert!(h.undo());
    assert!(h.is_drawn("Edge"));
    assert!(h.validate_mesh("Edge").is_none());
}

#[test]
fn test_undo_on_empty_history() {
    let mut h = TestHarness::new();
    assert!(matches!(h.editor.undo(), Err(EditorError::EmptyHistory)));
    assert!(matches!(h.editor.redo(), Err(EditorError::EmptyHistory)));
}

#[test]
fn test_new_command_clears_redo() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("B", 1.0).unwrap();
    assert!(h.undo());
    assert!(h.editor.scene.can_redo());

    h.create_cube("C", 1.0).unwrap();
    assert!(!h.editor.scene.can_redo());
    // "B" is gone for good
    assert_eq!(h.editor.scene.arena().len(), 2);
    assert!(matches!(h.editor.redo(), Err(EditorError::EmptyHistory)));
}

#[test]
fn test_undo_twice_empties_then_redo_twice_restores() {
    let mut h = TestHarness::new();
    assert_eq!(h.create_cube("Cube", 1.0).unwrap(), "Cube");
    assert_eq!(h.create_cube("Cube", 1.0).unwrap(), "Cube_1");

    h.editor.undo().unwrap();
    h.editor.undo().unwrap();
    assert_eq!(h.entity_count(), 0);
    assert!(matches!(h.editor.undo(), Err(EditorError::EmptyHistory)));

    h.editor.redo().unwrap();
    h.editor.redo().unwrap();
    assert_eq!(h.names(), vec!["Cube", "Cube_1"]);
    assert!(matches!(h.editor.redo(), Err(EditorError::EmptyHistory)));
    assert!(h.in_lockstep());
}

#[test]
fn test_execute_after_undo_discards_redo() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.editor.undo().unwrap();
    assert!(h.editor.scene.can_redo());

    h.create_sphere("B", 1.0).unwrap();
    assert!(matches!(h.editor.redo(), Err(EditorError::EmptyHistory)));
    assert_eq!(h.names(), vec!["B"]);
    assert!(h.editor.log.contains("Nothing to redo."));
}

#[test]
fn test_compose_undo_restores_same_operands() {
    let mut h = TestHarness::new();
    h.create_cube("Cube", 1.0).unwrap();
    far_box(&mut h, "Base");
    let a = h.id_of("Cube").unwrap();
    let b = h.id_of("Base_ext").unwrap();

    let result = h.editor.boolean("Cube", "Base_ext", BooleanOp::Union).unwrap();
    assert_eq!(result, "union_result");
    assert!(h.id_of("Cube").is_none());

    assert!(h.undo());
    assert_eq!(h.id_of("Cube"), Some(a));
    assert_eq!(h.id_of("Base_ext"), Some(b));
    assert!(h.id_of("union_result").is_none());
    assert!(h.in_lockstep());
}

#[test]
fn test_overlapping_boolean_is_computed() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_sphere("B", 0.7).unwrap();

    let result = h.editor.boolean("A", "B", BooleanOp::Difference).unwrap();
    assert_eq!(result, "difference_result");
    assert_eq!(h.names(), vec!["difference_result"]);
    let v = h.validate_mesh("difference_result").unwrap();
    assert!(v.is_watertight());
    assert!(v.assert_dimensions_approx([1.0, 1.0, 1.0], 1e-3));

    assert!(h.undo());
    assert_eq!(h.names(), vec!["A", "B"]);
    assert!(h.in_lockstep());

    let union = h.editor.boolean("A", "B", BooleanOp::Union).unwrap();
    assert!(h.validate_mesh(&union).unwrap().is_watertight());
}

#[test]
fn test_empty_boolean_is_rejected_without_side_effects() {
    let mut h = TestHarness::new();
    h.create_cube("Cube", 1.0).unwrap();
    far_box(&mut h, "Base");
    let depth = h.editor.scene.history().undo_depth();

    let err = h
        .editor
        .boolean("Cube", "Base_ext", BooleanOp::Intersection)
        .unwrap_err();
    assert!(matches!(err, EditorError::CollaboratorRejected(ref r) if r.starts_with("Result was empty")));
    assert_eq!(h.names(), vec!["Base_ext", "Cube"]);
    assert_eq!(h.editor.scene.history().undo_depth(), depth);
    assert!(h.editor.log.contains("Command failed"));
}

// ── Failure policies ──────────────────────────────────────────

#[test]
fn test_failed_execute_leaves_history_untouched() {
    let (mut h, faults) = TestHarness::with_faults();
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("C", 1.0).unwrap();
    assert!(h.undo());

    faults.reject_add("B");
    let err = h.create_cube("B", 1.0).unwrap_err();
    assert!(matches!(err, EditorError::CollaboratorRejected(_)));

    assert_eq!(h.names(), vec!["A"]);
    assert_eq!(h.editor.scene.history().undo_depth(), 1);
    assert_eq!(h.editor.scene.history().redo_depth(), 1);
    // "A" live, "C" held by the undone command, nothing staged left behind
    assert_eq!(h.editor.scene.arena().len(), 2);
    assert!(h.in_lockstep());
}

#[test]
fn test_failed_replace_rolls_back_render() {
    let (mut h, faults) = TestHarness::with_faults();
    h.create_rectangle("Profile", 1.0, 2.0).unwrap();

    faults.reject_add("Profile_ext");
    assert!(h.editor.extrude("Profile", 1.0, None).is_err());

    assert_eq!(h.names(), vec!["Profile"]);
    assert!(h.is_drawn("Profile"));
    assert!(h.in_lockstep());
    assert_eq!(h.editor.scene.arena().len(), 1);
}

#[test]
fn test_failed_undo_moves_command_and_reports() {
    let (mut h, faults) = TestHarness::with_faults();
    h.create_cube("A", 1.0).unwrap();
    let id = h.id_of("A").unwrap();

    faults.reject_remove("A");
    let err = h.editor.undo().unwrap_err();
    assert!(matches!(err, EditorError::CollaboratorRejected(_)));
    assert!(h.editor.log.contains("Undo failed"));

    // registry reversed, renderer kept drawing it
    assert!(!h.editor.scene.can_undo());
    assert!(h.editor.scene.can_redo());
    assert!(h.names().is_empty());
    assert!(h.editor.scene.render().contains(id));
    assert!(!h.in_lockstep());
}

#[test]
fn test_failed_redo_keeps_command_undone() {
    let (mut h, faults) = TestHarness::with_faults();
    h.create_cube("A", 1.0).unwrap();
    assert!(h.undo());

    faults.reject_add("A");
    assert!(!h.redo());
    assert!(h.editor.scene.can_redo());
    assert!(!h.editor.scene.can_undo());
    assert!(h.names().is_empty());
    assert!(h.in_lockstep());

    faults.allow_all();
    assert!(h.redo());
    assert_eq!(h.names(), vec!["A"]);
}

// ── Naming ────────────────────────────────────────────────────

#[test]
fn test_reinserted_entity_is_renamed_on_collision() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("B", 1.0).unwrap();
    h.delete("A").unwrap();
    h.editor.rename("B", "A").unwrap();

    assert!(h.undo());
    assert_eq!(h.names(), vec!["A", "A_1"]);
    assert!(h.in_lockstep());
}

#[test]
fn test_rename_rules() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("B", 1.0).unwrap();

    assert!(matches!(h.editor.rename("A", "  "), Err(EditorError::InvalidName)));
    assert_eq!(h.editor.rename("A", "A").unwrap(), "A");
    assert_eq!(h.editor.rename("A", "B").unwrap(), "B_1");
    assert!(matches!(h.editor.rename("Z", "Q"), Err(EditorError::NotFound(_))));
}

// ── Resources ─────────────────────────────────────────────────

#[test]
fn test_history_limit_discards_oldest() {
    let settings = EditorSettings {
        history_limit: Some(2),
        ..EditorSettings::default()
    };
    let (mut h, _faults) = TestHarness::with_faults_and_settings(settings);
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("B", 1.0).unwrap();
    h.create_cube("C", 1.0).unwrap();

    assert_eq!(h.editor.scene.history().undo_depth(), 2);
    assert!(h.undo());
    assert!(h.undo());
    assert!(!h.undo());
    assert_eq!(h.names(), vec!["A"]);
}

#[test]
fn test_new_project_releases_everything() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    h.create_cube("B", 1.0).unwrap();
    h.delete("A").unwrap();
    assert!(h.undo());
    assert!(h.undo());

    h.editor.new_project();
    assert_eq!(h.entity_count(), 0);
    assert!(h.editor.scene.arena().is_empty());
    assert!(h.editor.scene.render().entity_ids().is_empty());
    assert!(!h.editor.scene.can_undo());
    assert!(!h.editor.scene.can_redo());
}

#[test]
fn test_deleted_entities_stay_until_history_forgets_them() {
    let mut h = TestHarness::new();
    h.create_cube("A", 1.0).unwrap();
    let id = h.id_of("A").unwrap();
    h.delete("A").unwrap();

    // not live, but the delete command can still bring it back
    assert!(h.editor.scene.entity(id).is_some());
    assert_eq!(h.editor.scene.arena().ref_count(id), 2);

    h.editor.new_project();
    assert!(h.editor.scene.entity(id).is_none());
}
