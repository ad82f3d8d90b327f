#![warn(clippy::pedantic)]

pub mod gesture;
pub mod global;
pub mod session;
pub mod surface;

use anyhow::Result as AnyResult;
use sketchpad_core::SketchFactory;
use std::sync::Arc;

fn main() -> AnyResult<()> {
    let loaded = global::settings();
    let settings = &loaded.settings;

    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(settings.log_level())
            .parse_default_env()
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", settings.log_level());
    }

    if let Some(e) = loaded.load_error() {
        log::info!("using default settings: {e:#}");
        // Leave a documented file for the user to edit next time.
        if let Err(e) = loaded.save() {
            log::warn!("failed to save settings: {e:#}");
        }
    }

    let gestures: Vec<(String, gesture::Gesture)> = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        // Args are a simple list of gesture files to replay.
        let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
        if paths.is_empty() {
            log::info!("no gestures given, replaying the demo");
            vec![("demo".to_owned(), gesture::Gesture::demo())]
        } else {
            let num_paths = paths.len();
            let opened: Vec<_> = paths
                .into_par_iter()
                .filter_map(|path| match gesture::Gesture::load(&path) {
                    Ok(gesture) => Some((path.display().to_string(), gesture)),
                    Err(e) => {
                        log::error!("failed to open gesture {path:?}: {e:#}");
                        None
                    }
                })
                .collect();
            if opened.is_empty() {
                log::warn!("failed to load any of {num_paths} provided gestures");
            }
            opened
        }
    };

    // One factory for the whole run, so every sketch gets a distinct ID.
    let factory = Arc::new(SketchFactory::new());
    for (name, gesture) in &gestures {
        match gesture::replay(gesture, factory.clone(), settings) {
            Ok(sketch) => log::info!(
                "{name}: {}",
                gesture::summarize(&sketch, settings.stroke_width)
            ),
            Err(e) => log::error!("failed to replay {name}: {e:#}"),
        }
    }
    Ok(())
}
