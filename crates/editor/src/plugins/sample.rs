use super::{EditorPlugin, PluginAction, PluginContext};
use crate::state::log::NotificationSink;

/// Example plugin with a single menu action
#[derive(Debug, Default)]
pub struct SamplePlugin {
    initialized: bool,
    greetings: usize,
}

impl SamplePlugin {
    pub fn greetings(&self) -> usize {
        self.greetings
    }
}

impl EditorPlugin for SamplePlugin {
    fn name(&self) -> &str {
        "Sample Plugin"
    }

    fn initialize(&mut self, _ctx: &mut PluginContext<'_>) -> Result<(), String> {
        self.initialized = true;
        Ok(())
    }

    fn actions(&self) -> Vec<PluginAction> {
        vec![PluginAction::new("say_hello", "Say Hello")]
    }

    fn invoke(&mut self, action: &str, ctx: &mut PluginContext<'_>) -> Result<(), String> {
        if !self.initialized {
            return Err("not initialized".into());
        }
        match action {
            "say_hello" => {
                self.greetings += 1;
                ctx.log.info("Sample plugin said hello.");
                Ok(())
            }
            other => Err(format!("unknown action '{other}'")),
        }
    }
}
