//! Plugin discovery and dispatch.
//!
//! Plugins are compiled in and registered by factory name. A plugin is
//! enabled by a JSON manifest in the plugin directory:
//!
//! ```json
//! { "plugin": "sample" }
//! ```
//!
//! Files whose name starts with `__` are skipped.

mod sample;

pub use sample::SamplePlugin;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::state::log::NotificationSink;
use crate::state::scene::SceneState;

/// What a plugin may touch while it runs
pub struct PluginContext<'a> {
    pub scene: &'a mut SceneState,
    pub log: &'a mut dyn NotificationSink,
}

/// Menu entry contributed by a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginAction {
    /// Stable id passed to `invoke`
    pub id: String,
    /// Menu label
    pub label: String,
}

impl PluginAction {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

pub trait EditorPlugin {
    fn name(&self) -> &str;

    fn initialize(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), String>;

    /// Menu entries
    fn actions(&self) -> Vec<PluginAction>;

    fn invoke(&mut self, action: &str, ctx: &mut PluginContext<'_>) -> Result<(), String>;
}

pub type PluginFactory = fn() -> Box<dyn EditorPlugin>;

/// Explicitly registered plugin factories
#[derive(Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, PluginFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the plugins shipped with the editor
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("sample", || Box::new(SamplePlugin::default()));
        registry
    }

    pub fn register(&mut self, key: &str, factory: PluginFactory) {
        self.factories.insert(key.to_string(), factory);
    }

    pub fn create(&self, key: &str) -> Option<Box<dyn EditorPlugin>> {
        self.factories.get(key).map(|factory| factory())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct PluginManifest {
    plugin: String,
}

/// Loaded plugins
#[derive(Default)]
pub struct PluginManager {
    registry: PluginRegistry,
    plugins: Vec<Box<dyn EditorPlugin>>,
}

impl PluginManager {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            plugins: Vec::new(),
        }
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Scan `dir` for manifests and initialize every plugin they name.
    /// Failures are reported through the context and loading continues.
    /// Returns the number of plugins loaded.
    pub fn load_plugins(&mut self, dir: &Path, ctx: &mut PluginContext<'_>) -> usize {
        if !dir.is_dir() {
            ctx.log
                .warning(&format!("Plugin directory '{}' not found.", dir.display()));
            return 0;
        }
        let mut files: Vec<_> = match std::fs::read_dir(dir) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(e) => {
                ctx.log
                    .error(&format!("Failed to read plugin directory '{}': {e}", dir.display()));
                return 0;
            }
        };
        files.sort();

        let mut loaded = 0;
        for path in files {
            let Some(fname) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !fname.ends_with(".json") || fname.starts_with("__") {
                continue;
            }
            match self.instantiate(&path) {
                Ok(plugin) => {
                    if self.initialize(plugin, ctx) {
                        loaded += 1;
                    }
                }
                Err(e) => ctx.log.error(&format!("Failed to load plugin '{fname}': {e}")),
            }
        }
        loaded
    }

    fn instantiate(&self, manifest: &Path) -> Result<Box<dyn EditorPlugin>, String> {
        let json = std::fs::read_to_string(manifest).map_err(|e| e.to_string())?;
        let manifest: PluginManifest = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        self.registry
            .create(&manifest.plugin)
            .ok_or_else(|| format!("no plugin registered as '{}'", manifest.plugin))
    }

    fn initialize(&mut self, mut plugin: Box<dyn EditorPlugin>, ctx: &mut PluginContext<'_>) -> bool {
        match plugin.initialize(ctx) {
            Ok(()) => {
                ctx.log.info(&format!("Loaded plugin: '{}'.", plugin.name()));
                self.plugins.push(plugin);
                true
            }
            Err(e) => {
                ctx.log.error(&format!(
                    "Failed to initialize plugin '{}': {e}",
                    plugin.name()
                ));
                false
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    /// Menu entries of every loaded plugin, keyed by plugin name
    pub fn menus(&self) -> Vec<(String, Vec<PluginAction>)> {
        self.plugins
            .iter()
            .map(|p| (p.name().to_string(), p.actions()))
            .collect()
    }

    pub fn invoke(&mut self, plugin: &str, action: &str, ctx: &mut PluginContext<'_>) -> EditorResult<()> {
        let target = self
            .plugins
            .iter_mut()
            .find(|p| p.name() == plugin)
            .ok_or_else(|| EditorError::NotFound(plugin.to_string()))?;
        if !target.actions().iter().any(|a| a.id == action) {
            return Err(EditorError::Plugin {
                name: plugin.to_string(),
                reason: format!("no action '{action}'"),
            });
        }
        target.invoke(action, ctx).map_err(|reason| EditorError::Plugin {
            name: plugin.to_string(),
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
