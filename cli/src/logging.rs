use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a log file; unset means stderr
pub const LOG_PATH_ENV: &str = "SPELLFLOAT_LOG_PATH";

const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var(LOG_PATH_ENV) {
        let condition = RollingConditionBasic::new().max_size(MAX_LOG_BYTES);
        match BasicRollingFileAppender::new(&path, condition, MAX_LOG_FILES) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .init();
                return Some(guard);
            }
            Err(e) => eprintln!("cannot open log file {path}: {e}; logging to stderr"),
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    None
}
