//! JSON command protocol for scripted (headless) editing.

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{BooleanOp, Primitive, Shape2D};

use crate::state::{EditorState, DEFAULT_EXTRUDE_LENGTH, FULL_TURN};

/// A command a script can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScriptCommand {
    CreatePrimitive {
        primitive: Primitive,
        #[serde(default)]
        name: Option<String>,
    },
    CreateShape {
        shape: Shape2D,
        #[serde(default)]
        name: Option<String>,
    },
    Delete {
        name: String,
    },
    Rename {
        old: String,
        new: String,
    },
    Extrude {
        name: String,
        #[serde(default = "default_length")]
        length: f64,
        /// Defaults to the working plane normal
        #[serde(default)]
        direction: Option<[f32; 3]>,
    },
    Revolve {
        name: String,
        #[serde(default = "default_angle")]
        angle: f64,
    },
    Sweep {
        profile: String,
        path: String,
    },
    Loft {
        profiles: Vec<String>,
    },
    Boolean {
        op: BooleanOp,
        a: String,
        b: String,
    },
    Undo,
    Redo,
    NewProject,
    Import {
        path: PathBuf,
    },
    Save {
        path: PathBuf,
    },
    SetPlane {
        origin: [f32; 3],
        normal: [f32; 3],
    },
    ResetPlane,
    /// List the scene and history state
    Inspect,
    PluginAction {
        plugin: String,
        action: String,
    },
}

fn default_length() -> f64 {
    DEFAULT_EXTRUDE_LENGTH
}

fn default_angle() -> f64 {
    FULL_TURN
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ScriptResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<String, E>> for ScriptResponse {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(name) => ScriptResponse::ok_with_data(serde_json::json!({ "name": name })),
            Err(e) => ScriptResponse::err(e.to_string()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for ScriptResponse {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ScriptResponse::ok(),
            Err(e) => ScriptResponse::err(e.to_string()),
        }
    }
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut EditorState, cmd: ScriptCommand) -> ScriptResponse {
    match cmd {
        ScriptCommand::CreatePrimitive { primitive, name } => {
            editor.create_primitive(&primitive, name.as_deref()).into()
        }

        ScriptCommand::CreateShape { shape, name } => {
            editor.create_shape(&shape, name.as_deref()).into()
        }

        ScriptCommand::Delete { name } => editor.delete(&name).into(),

        ScriptCommand::Rename { old, new } => editor.rename(&old, &new).into(),

        ScriptCommand::Extrude {
            name,
            length,
            direction,
        } => editor
            .extrude(&name, length, direction.map(Vec3::from_array))
            .into(),

        ScriptCommand::Revolve { name, angle } => editor.revolve(&name, angle).into(),

        ScriptCommand::Sweep { profile, path } => editor.sweep(&profile, &path).into(),

        ScriptCommand::Loft { profiles } => {
            let names: Vec<&str> = profiles.iter().map(String::as_str).collect();
            editor.loft(&names).into()
        }

        ScriptCommand::Boolean { op, a, b } => editor.boolean(&a, &b, op).into(),

        ScriptCommand::Undo => editor.undo().into(),

        ScriptCommand::Redo => editor.redo().into(),

        ScriptCommand::NewProject => {
            editor.new_project();
            ScriptResponse::ok()
        }

        ScriptCommand::Import { path } => editor.import(&path).into(),

        ScriptCommand::Save { path } => editor.save(&path).into(),

        ScriptCommand::SetPlane { origin, normal } => editor
            .set_plane(Vec3::from_array(origin), Vec3::from_array(normal))
            .into(),

        ScriptCommand::ResetPlane => {
            editor.reset_plane();
            ScriptResponse::ok()
        }

        ScriptCommand::Inspect => {
            let summary = match serde_json::to_value(editor.summary()) {
                Ok(v) => v,
                Err(e) => return ScriptResponse::err(e.to_string()),
            };
            ScriptResponse::ok_with_data(serde_json::json!({
                "scene": summary,
                "plane_active": editor.plane.is_active(),
                "plugins": editor.plugins.names(),
            }))
        }

        ScriptCommand::PluginAction { plugin, action } => {
            editor.invoke_plugin(&plugin, &action).into()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut EditorState, json: &str) -> Result<ScriptResponse, String> {
    let cmd: ScriptCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    editor: &mut EditorState,
    json: &str,
) -> Result<Vec<ScriptResponse>, String> {
    let cmds: Vec<ScriptCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
