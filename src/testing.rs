//! Shared fixtures for unit tests.
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::{cell::RefCell, fmt, sync::Once, thread, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestError {
    Failed,
    Failed1,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Failed => write!(f, "test failed"),
            TestError::Failed1 => write!(f, "test failed (1)"),
        }
    }
}

impl std::error::Error for TestError {}

/// Run `task` on a fresh thread after `ms` milliseconds.
pub fn delay<F>(ms: u64, task: F)
where
    F: FnOnce() + Send + 'static,
{
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(ms));
        task();
    });
}

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Records warnings on the thread that logged them, so tests running in
/// parallel don't see each other's output.
struct WarningCapture;

impl Log for WarningCapture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: WarningCapture = WarningCapture;
static INIT: Once = Once::new();

/// Run `f` and return the warnings it logged on the current thread.
pub fn capture_warnings<F: FnOnce()>(f: F) -> Vec<String> {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Warn);
    });

    WARNINGS.with(|w| w.borrow_mut().clear());
    f();
    WARNINGS.with(|w| w.take())
}
