use std::collections::HashMap;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Areas that get their own log file. Everything else lands in `system.log`.
pub const LOG_AREAS: [&str; 2] = ["todo", "shortcuts"];

/// Guards that must be kept alive to ensure logs are flushed
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

/// Routes each event to the file of the area named by its target.
struct AreaWriter {
    writers: HashMap<String, NonBlocking>,
    system_writer: NonBlocking,
}

impl AreaWriter {
    fn writer_for_target(&self, target: &str) -> &NonBlocking {
        area_for_target(target)
            .and_then(|area| self.writers.get(area))
            .unwrap_or(&self.system_writer)
    }
}

/// `todo` and `todo::storage` both belong to the `todo` area.
fn area_for_target(target: &str) -> Option<&'static str> {
    LOG_AREAS.into_iter().find(|area| {
        target == *area
            || target
                .strip_prefix(*area)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

impl<'a> MakeWriter<'a> for AreaWriter {
    type Writer = NonBlocking;

    fn make_writer(&'a self) -> Self::Writer {
        self.system_writer.clone()
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        self.writer_for_target(meta.target()).clone()
    }
}

/// Install the global subscriber writing daily-rolled files into `log_dir`.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging(log_dir: &Path) -> std::io::Result<LoggingGuards> {
    std::fs::create_dir_all(log_dir)?;

    let mut guards = Vec::new();
    let mut area_writers = HashMap::new();

    for area in LOG_AREAS {
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, log_dir, format!("{}.log", area));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        area_writers.insert(area.to_string(), non_blocking);
        guards.push(guard);
    }

    let system_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "system.log");
    let (system_writer, system_guard) = tracing_appender::non_blocking(system_appender);
    guards.push(system_guard);

    let writer = AreaWriter {
        writers: area_writers,
        system_writer,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Logging already initialized: {}", e);
    }

    tracing::info!(target: "system", "Logging initialized at {:?}", log_dir);

    Ok(LoggingGuards { _guards: guards })
}
