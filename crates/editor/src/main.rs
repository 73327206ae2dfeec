use std::path::{Path, PathBuf};

use mesh_editor_lib::script::execute_json_batch;
use mesh_editor_lib::state::{EditorSettings, EditorState};

struct Args {
    script: Option<PathBuf>,
    plugins: Option<PathBuf>,
    settings: Option<PathBuf>,
}

fn main() {
    let args = parse_args();
    let settings = load_settings(args.settings.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.clone().into()),
        )
        .init();

    let mut editor = EditorState::new(settings);
    editor.load_plugins(args.plugins.as_deref());
    tracing::info!("Application initialized successfully.");

    let Some(script) = args.script else {
        tracing::info!("No --script given; nothing to do.");
        return;
    };
    let json = match std::fs::read_to_string(&script) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read script {}: {e}", script.display());
            std::process::exit(1);
        }
    };
    match execute_json_batch(&mut editor, &json) {
        Ok(responses) => match serde_json::to_string_pretty(&responses) {
            Ok(out) => println!("{out}"),
            Err(e) => tracing::error!("Failed to encode responses: {e}"),
        },
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn load_settings(path: Option<&Path>) -> EditorSettings {
    match path {
        Some(path) => EditorSettings::load_from(path).unwrap_or_else(|e| {
            eprintln!("Failed to load settings from {}: {e}", path.display());
            EditorSettings::default()
        }),
        None => EditorSettings::load(),
    }
}

fn parse_args() -> Args {
    let mut args = Args {
        script: None,
        plugins: None,
        settings: None,
    };
    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        let value = argv.get(i + 1).map(PathBuf::from);
        match argv[i].as_str() {
            "--script" => args.script = value,
            "--plugins" => args.plugins = value,
            "--settings" => args.settings = value,
            other => {
                eprintln!("Unknown argument: {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    args
}
