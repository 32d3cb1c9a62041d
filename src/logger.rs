use std::fs::File;
use std::io::{Result as IoResult, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::{cell::RefCell, fmt::Display};

static LOG_FILE: OnceLock<Arc<Mutex<File>>> = OnceLock::new();
thread_local! {
    static RECORD_PREFIX: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn with_prefix<F, R>(f: F) -> R
where
    F: FnOnce(Option<String>) -> R,
{
    RECORD_PREFIX.with(|prefix| f(prefix.borrow().clone()))
}

fn format_with_prefix(message: impl Display) -> String {
    with_prefix(|prefix| prefix.map_or_else(|| message.to_string(), |p| format!("{p}: {message}")))
}

/// Mirrors warnings and errors emitted during normalization into `path`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn set_log_file(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    // First writer wins.
    let _ = LOG_FILE.set(Arc::new(Mutex::new(file)));
    Ok(())
}

/// Sets a thread-local prefix (usually the record's display name) that is
/// prepended to subsequent log messages. The previous prefix is restored when
/// the returned guard is dropped.
pub fn set_log_prefix(prefix: impl Into<String>) -> LogPrefixGuard {
    let prefix = prefix.into();
    let previous = with_prefix(|p| p);
    RECORD_PREFIX.with(|slot| {
        *slot.borrow_mut() = Some(prefix);
    });
    LogPrefixGuard { previous }
}

pub struct LogPrefixGuard {
    previous: Option<String>,
}

impl Drop for LogPrefixGuard {
    fn drop(&mut self) {
        let prev = self.previous.take();
        RECORD_PREFIX.with(|slot| {
            *slot.borrow_mut() = prev;
        });
    }
}

fn emit(level: &str, message: &str) {
    let message = format_with_prefix(message);
    eprintln!("{message}");
    if let Some(writer) = LOG_FILE.get()
        && let Ok(mut file) = writer.lock()
    {
        let _ = writeln!(file, "{level}: {message}");
    }
}

pub fn log_info(message: &str) {
    emit("info", message);
}

pub fn log_warn(message: &str) {
    emit("warning", message);
}

pub fn log_error(message: &str) {
    emit("error", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_prefix() -> Option<String> {
        with_prefix(|p| p)
    }

    #[test]
    fn prefix_guard_restores_previous_prefix() {
        assert_eq!(current_prefix(), None);
        {
            let _outer = set_log_prefix("Salvia apiana");
            assert_eq!(current_prefix().as_deref(), Some("Salvia apiana"));
            {
                let _inner = set_log_prefix("Ceanothus");
                assert_eq!(format_with_prefix("x"), "Ceanothus: x");
            }
            assert_eq!(current_prefix().as_deref(), Some("Salvia apiana"));
        }
        assert_eq!(current_prefix(), None);
        assert_eq!(format_with_prefix("bare"), "bare");
    }
}
