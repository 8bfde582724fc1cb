//! Log and alert callback system.
//!
//! The engine never prints or beeps on its own. Hosts that want diagnostics
//! register a log callback; hosts that want an audible cue when an edit is
//! rejected (length limit, allocation failure) register an alert callback.

use std::sync::{Mutex, OnceLock};

use crate::error::Error;

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;
type AlertCallback = Box<dyn Fn(&Error) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

fn alert_callback() -> &'static Mutex<Option<AlertCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<AlertCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let mut guard = log_callback().lock().expect("log callback lock");
    *guard = Some(Box::new(callback));
}

/// Emit a log event.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

/// Set the global alert callback, invoked when a non-fatal edit rejection
/// occurs. A typical host responds with a system beep.
pub fn set_alert_callback<F>(callback: F)
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    let mut guard = alert_callback().lock().expect("alert callback lock");
    *guard = Some(Box::new(callback));
}

/// Emit an alert to the registered callback.
pub fn emit_alert(error: &Error) {
    if let Ok(guard) = alert_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    // Callbacks are process-wide and other tests emit logs too, so these
    // only check that the expected message arrives, not that it is alone.

    #[test]
    fn test_log_callback() {
        let seen = Arc::new(AtomicBool::new(false));
        let seen_clone = Arc::clone(&seen);
        set_log_callback(move |level, msg| {
            if level == LogLevel::Info && msg == "hello" {
                seen_clone.store(true, Ordering::SeqCst);
            }
        });
        emit_log(LogLevel::Info, "hello");
        assert!(seen.load(Ordering::SeqCst));
    }

    #[test]
    fn test_alert_callback() {
        let seen = Arc::new(AtomicBool::new(false));
        let seen_clone = Arc::clone(&seen);
        set_alert_callback(move |err| {
            if matches!(err, Error::TextOverflow { .. }) {
                seen_clone.store(true, Ordering::SeqCst);
            }
        });
        emit_alert(&Error::TextOverflow {
            requested: 1,
            max: 0,
        });
        assert!(seen.load(Ordering::SeqCst));
    }
}
