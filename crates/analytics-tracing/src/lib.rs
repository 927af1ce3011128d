use dotenvy::dotenv;
use std::{path::PathBuf, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "app.log";

const DEFAULT_FILTER: &str = "info,caption_cli=debug,caption_styler=debug";

fn init_env_layer() -> tracing_subscriber::EnvFilter {
    match dotenv() {
        Ok(path) => eprintln!(".env read successfully from {}", path.display()),
        Err(e) => eprintln!("Could not load .env file: {e}"),
    };

    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

pub fn init_tracing_to_stderr() {
    let env_layer = init_env_layer();

    // stdout is reserved for the captions themselves
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_layer)
        .with(stderr_layer)
        .init();
}

/// Write logs to `log_dir/app.log`, falling back to stderr when the file
/// cannot be created.
pub fn init_tracing_to_file(log_dir: PathBuf) {
    let file_log_layer = {
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create log dir: {}", e);
            init_tracing_to_stderr();
            return;
        }
        let file = match std::fs::File::create(log_dir.join(LOG_FILE_NAME)) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to create log file: {}", e);
                init_tracing_to_stderr();
                return;
            }
        };
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    };

    let env_layer = init_env_layer();

    tracing_subscriber::registry()
        .with(env_layer)
        .with(file_log_layer)
        .init();
}
