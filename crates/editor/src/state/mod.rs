pub mod log;
mod modeling;
pub mod scene;
pub mod settings;
pub mod working_plane;

use std::path::Path;

pub use modeling::{DEFAULT_EXTRUDE_LENGTH, FULL_TURN};
pub use log::{LogEntry, MessageLog, NotificationSink, TracingSink};
pub use scene::{entity_display_name, geometry_icon, short_id, SceneState, SceneSummary};
pub use settings::{EditorSettings, GeometrySettings};
pub use working_plane::WorkingPlane;

use crate::build::{GeometryKernel, MeshKernel};
use crate::codec::{MeshCodec, StlCodec};
use crate::error::EditorResult;
use crate::plugins::{PluginContext, PluginManager, PluginRegistry};
use crate::viewport::scene::{RenderCollaborator, RenderScene};

/// Combined editor state
pub struct EditorState {
    pub scene: SceneState,
    pub settings: EditorSettings,
    pub plane: WorkingPlane,
    /// Console and error-log messages
    pub log: MessageLog,
    pub plugins: PluginManager,
    kernel: Box<dyn GeometryKernel>,
    codec: Box<dyn MeshCodec>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorState {
    /// Headless editor with the built-in kernel, STL codec and plugins
    pub fn new(settings: EditorSettings) -> Self {
        let kernel = MeshKernel {
            revolve_resolution: settings.geometry.revolve_resolution,
            loft_resolution: settings.geometry.loft_resolution,
        };
        Self::with_collaborators(
            settings,
            Box::new(RenderScene::new()),
            Box::new(kernel),
            Box::new(StlCodec),
        )
    }

    pub fn with_collaborators(
        settings: EditorSettings,
        render: Box<dyn RenderCollaborator>,
        kernel: Box<dyn GeometryKernel>,
        codec: Box<dyn MeshCodec>,
    ) -> Self {
        let scene = SceneState::new(render).with_history_limit(settings.history_limit);
        Self {
            scene,
            settings,
            plane: WorkingPlane::default(),
            log: MessageLog::new(),
            plugins: PluginManager::new(PluginRegistry::with_builtins()),
            kernel,
            codec,
        }
    }

    // ── Plugins ───────────────────────────────────────────────

    /// Load plugins from `dir`, or from the configured plugin directory
    pub fn load_plugins(&mut self, dir: Option<&Path>) -> usize {
        let dir = dir.unwrap_or(self.settings.plugin_dir.as_path()).to_path_buf();
        let mut ctx = PluginContext {
            scene: &mut self.scene,
            log: &mut self.log,
        };
        self.plugins.load_plugins(&dir, &mut ctx)
    }

    pub fn invoke_plugin(&mut self, plugin: &str, action: &str) -> EditorResult<()> {
        let mut ctx = PluginContext {
            scene: &mut self.scene,
            log: &mut self.log,
        };
        let result = self.plugins.invoke(plugin, action, &mut ctx);
        self.report(result)
    }

    /// Record a failed operation in the error log
    fn report<T>(&mut self, result: EditorResult<T>) -> EditorResult<T> {
        if let Err(e) = &result {
            self.log.error(&e.to_string());
        }
        result
    }
}
