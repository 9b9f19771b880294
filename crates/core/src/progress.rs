//! Process-wide progress sink for host-visible status lines.
//!
//! Hosts that render progress (a web UI, a job runner) install their own
//! writer once at startup; everything else in the process reports through
//! it. Without an installed sink, lines go to stderr.

use std::io::{self, Write};
use std::sync::Mutex;

/// Fixed tag prefixing every status line.
pub const PROGRESS_TAG: &str = "upscale";

static PROGRESS_SINK: Mutex<Option<Box<dyn Write + Send>>> = Mutex::new(None);

/// Replace the process-wide sink. The previous sink, if any, is dropped.
pub fn set_progress_sink(sink: Box<dyn Write + Send>) {
    let mut guard = PROGRESS_SINK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(sink);
}

/// Write one tag-prefixed status line to the sink.
///
/// Write failures are swallowed: progress is observational and must never
/// affect the operation being reported on.
pub fn report_progress(message: &str) {
    let mut guard = PROGRESS_SINK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.as_mut() {
        Some(sink) => {
            let _ = writeln!(sink, "{PROGRESS_TAG}: {message}");
            let _ = sink.flush();
        }
        None => {
            let _ = writeln!(io::stderr(), "{PROGRESS_TAG}: {message}");
        }
    }
}
