use anyhow::Result;
use directories::ProjectDirs;
use std::any::Any;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const DB_FILE: &str = "lectio.db";

/// Default log filter for a given number of `-v` flags.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug,lectio_api=debug",
        _ => "trace",
    }
}

pub fn init_tracing(verbosity: u8) {
    // RUST_LOG=lectio_api=debug,lectio_core=info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Text carried by a panic, if it was a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "panic without a message"
    }
}

/// Log panics through tracing, tagged with the reader version and the thread,
/// then hand over to the previous hook.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(
            version = env!("CARGO_PKG_VERSION"),
            thread = thread.name().unwrap_or("unnamed"),
            %location,
            message = panic_message(info.payload()),
            "lectio crashed"
        );
        default_hook(info);
    }));
}

/// Where the Vault lives: the explicit path, else the platform data dir,
/// else the working directory.
pub fn vault_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    match ProjectDirs::from("org", "lectio", "lectio") {
        Some(dirs) => Ok(dirs.data_dir().join(DB_FILE)),
        None => {
            tracing::warn!("no home directory; keeping the vault in the working directory");
            Ok(std::env::current_dir()?.join(DB_FILE))
        }
    }
}
