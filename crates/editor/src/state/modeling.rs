//! Editor operations: each one validates its inputs, asks the geometry
//! kernel for the result and executes the matching scene command.

use std::path::Path;

use glam::Vec3;
use shared::{BooleanOp, Parameter, Primitive, Shape2D};

use super::scene::{Geometry, Profile, SceneSummary};
use super::EditorState;
use crate::error::{EditorError, EditorResult};
use crate::state::log::NotificationSink;

pub const DEFAULT_EXTRUDE_LENGTH: f64 = 1.0;
pub const FULL_TURN: f64 = 360.0;

fn check(parameters: &[Parameter]) -> EditorResult<()> {
    match parameters.iter().find(|p| !p.in_range()) {
        Some(p) => Err(EditorError::InvalidParameter {
            name: p.name.clone(),
            value: p.value,
            min: p.min,
            max: p.max,
        }),
        None => Ok(()),
    }
}

impl EditorState {
    // ── Creation ──────────────────────────────────────────────

    pub fn create_primitive(&mut self, primitive: &Primitive, name: Option<&str>) -> EditorResult<String> {
        let result = self.build_primitive(primitive, name);
        self.created(result)
    }

    fn build_primitive(&mut self, primitive: &Primitive, name: Option<&str>) -> EditorResult<String> {
        check(&primitive.parameters())?;
        let geometry = self
            .kernel
            .primitive(primitive)
            .map_err(EditorError::CollaboratorRejected)?;
        let name = name.unwrap_or(primitive.display_name());
        self.scene.create_entity(geometry, Some(name))
    }

    /// Draw a 2D shape on the working plane
    pub fn create_shape(&mut self, shape: &Shape2D, name: Option<&str>) -> EditorResult<String> {
        let result = self.build_shape(shape, name);
        self.created(result)
    }

    fn build_shape(&mut self, shape: &Shape2D, name: Option<&str>) -> EditorResult<String> {
        check(&shape.parameters())?;
        let outline = self.kernel.shape(shape).map_err(EditorError::CollaboratorRejected)?;
        if outline.points.iter().any(|p| !p.is_finite()) {
            return Err(EditorError::rejected("shape coordinates must be finite"));
        }
        let points = outline.points.iter().map(|p| self.plane.map_point(*p)).collect();
        let geometry = Geometry::Profile(Profile::new(points, outline.closed));
        let name = name.unwrap_or(shape.display_name());
        self.scene.create_entity(geometry, Some(name))
    }

    // ── Mesh operations ───────────────────────────────────────

    /// Extrude a profile. The direction defaults to the working plane normal.
    pub fn extrude(&mut self, name: &str, length: f64, direction: Option<Vec3>) -> EditorResult<String> {
        let result = self.build_extrude(name, length, direction);
        self.finish(result, "Extrude successful.")
    }

    fn build_extrude(&mut self, name: &str, length: f64, direction: Option<Vec3>) -> EditorResult<String> {
        check(&[Parameter::new("Length", length, 0.1, 100.0)])?;
        let direction = direction.unwrap_or_else(|| self.plane.normal());
        let geometry = self
            .kernel
            .extrude(self.geometry(name)?, length as f32, direction)
            .map_err(EditorError::CollaboratorRejected)?;
        self.scene.replace(name, geometry, &format!("{name}_ext"))
    }

    /// Revolve a profile about the Y axis
    pub fn revolve(&mut self, name: &str, angle_deg: f64) -> EditorResult<String> {
        let result = self.build_revolve(name, angle_deg);
        self.finish(result, "Revolve successful.")
    }

    fn build_revolve(&mut self, name: &str, angle_deg: f64) -> EditorResult<String> {
        check(&[Parameter::new("Angle", angle_deg, 1.0, FULL_TURN)])?;
        let geometry = self
            .kernel
            .revolve(self.geometry(name)?, angle_deg as f32)
            .map_err(EditorError::CollaboratorRejected)?;
        self.scene.replace(name, geometry, &format!("{name}_rev"))
    }

    pub fn sweep(&mut self, profile: &str, path: &str) -> EditorResult<String> {
        let result = self.build_sweep(profile, path);
        self.finish(result, "Sweep successful.")
    }

    fn build_sweep(&mut self, profile: &str, path: &str) -> EditorResult<String> {
        let geometry = self
            .kernel
            .sweep(self.geometry(profile)?, self.geometry(path)?)
            .map_err(EditorError::CollaboratorRejected)?;
        self.scene.create_entity(geometry, Some(&format!("sweep_{profile}")))
    }

    pub fn loft(&mut self, profiles: &[&str]) -> EditorResult<String> {
        let result = self.build_loft(profiles);
        self.finish(result, "Loft successful.")
    }

    fn build_loft(&mut self, profiles: &[&str]) -> EditorResult<String> {
        let inputs = profiles
            .iter()
            .map(|name| self.geometry(name))
            .collect::<EditorResult<Vec<_>>>()?;
        let geometry = self
            .kernel
            .loft(&inputs)
            .map_err(EditorError::CollaboratorRejected)?;
        self.scene.create_entity(geometry, Some("loft_result"))
    }

    /// Boolean of two meshes; both operands are consumed into the result
    pub fn boolean(&mut self, a: &str, b: &str, op: BooleanOp) -> EditorResult<String> {
        let result = self.build_boolean(a, b, op);
        self.finish(result, "Boolean successful.")
    }

    fn build_boolean(&mut self, a: &str, b: &str, op: BooleanOp) -> EditorResult<String> {
        if a == b {
            return Err(EditorError::rejected("Need at least two meshes."));
        }
        let geometry = self
            .kernel
            .boolean(self.geometry(a)?, self.geometry(b)?, op)
            .map_err(EditorError::CollaboratorRejected)?;
        self.scene
            .compose([a, b], geometry, &format!("{}_result", op.as_str()))
    }

    // ── Scene edits ───────────────────────────────────────────

    pub fn delete(&mut self, name: &str) -> EditorResult<()> {
        let result = self.scene.delete_by_name(name);
        match &result {
            Ok(()) => self.log.info(&format!("Deleted '{name}'.")),
            Err(e) => self.log.error(&format!("Command failed: {e}")),
        }
        result
    }

    pub fn rename(&mut self, old: &str, new: &str) -> EditorResult<String> {
        let result = self.scene.rename(old, new);
        if let Ok(assigned) = &result {
            if assigned != old {
                self.log.info(&format!("Renamed '{old}' to '{assigned}'."));
            }
        }
        self.report(result)
    }

    pub fn undo(&mut self) -> EditorResult<()> {
        let result = self.scene.undo();
        match &result {
            Ok(()) => self.log.info("Undo performed."),
            Err(EditorError::EmptyHistory) => self.log.warning("Nothing to undo."),
            Err(e) => self.log.error(&format!("Undo failed: {e}")),
        }
        result
    }

    pub fn redo(&mut self) -> EditorResult<()> {
        let result = self.scene.redo();
        match &result {
            Ok(()) => self.log.info("Redo performed."),
            Err(EditorError::EmptyHistory) => self.log.warning("Nothing to redo."),
            Err(e) => self.log.error(&format!("Redo failed: {e}")),
        }
        result
    }

    /// Drop the scene, both history stacks and the working plane
    pub fn new_project(&mut self) {
        self.scene.new_project();
        self.plane.reset();
        self.log.info("New project started.");
    }

    // ── Working plane ─────────────────────────────────────────

    pub fn set_plane(&mut self, origin: Vec3, normal: Vec3) -> EditorResult<()> {
        let result = self.plane.set_from_origin_normal(origin, normal);
        if result.is_ok() {
            self.log.info("Working plane set.");
        }
        self.report(result)
    }

    pub fn reset_plane(&mut self) {
        self.plane.reset();
        self.log.info("Working plane reset to default.");
    }

    // ── Files ─────────────────────────────────────────────────

    pub fn import(&mut self, path: &Path) -> EditorResult<String> {
        let result = self.scene.import_file(path, self.codec.as_ref());
        match &result {
            Ok(_) => self.log.info(&format!("Imported: {}", path.display())),
            Err(e) => self.log.error(&format!("Import failed: {e}")),
        }
        result
    }

    pub fn save(&mut self, path: &Path) -> EditorResult<()> {
        let result = self.scene.save_project(path, self.codec.as_ref());
        match &result {
            Ok(()) => self.log.info(&format!("Saved to {}.", path.display())),
            Err(e) => self.log.error(&format!("Save failed: {e}")),
        }
        result
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn summary(&self) -> SceneSummary {
        self.scene.summary()
    }

    fn geometry(&self, name: &str) -> EditorResult<&Geometry> {
        self.scene
            .get(name)
            .map(|e| &e.geometry)
            .ok_or_else(|| EditorError::NotFound(name.to_string()))
    }

    fn created(&mut self, result: EditorResult<String>) -> EditorResult<String> {
        let done = match &result {
            Ok(name) => format!("Created '{name}'."),
            Err(_) => String::new(),
        };
        self.finish(result, &done)
    }

    fn finish(&mut self, result: EditorResult<String>, done: &str) -> EditorResult<String> {
        match &result {
            Ok(_) => self.log.info(done),
            Err(e) => self.log.error(&format!("Command failed: {e}")),
        }
        result
    }
}
