//! `tracing` output to the browser console.
//!
//! Events are formatted by `tracing-subscriber`'s fmt layer (without
//! timestamps, which need a wall clock the wasm target lacks) and written
//! to `console.error`, `console.warn` or `console.log` by level.

use std::io;
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Sink {
    Error,
    Warn,
    Log,
}

/// Buffers one formatted event and emits it on flush or drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    sink: Sink,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(text.trim_end());
        match self.sink {
            Sink::Error => web_sys::console::error_1(&line),
            Sink::Warn => web_sys::console::warn_1(&line),
            Sink::Log => web_sys::console::log_1(&line),
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// [`MakeWriter`] picking the console method from the event level.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            sink: Sink::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let sink = match *meta.level() {
            Level::ERROR => Sink::Error,
            Level::WARN => Sink::Warn,
            _ => Sink::Log,
        };
        ConsoleWriter {
            sink,
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber. `level` is a `tracing` level name
/// (`"debug"`, `"trace"`, ...); unknown or missing means `info`.
///
/// Only the first call installs anything.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .as_deref()
        .and_then(|raw| Level::from_str(raw).ok())
        .unwrap_or(Level::INFO);
    let installed = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(level)
        .without_time()
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%level, "console logging enabled");
    }
}
