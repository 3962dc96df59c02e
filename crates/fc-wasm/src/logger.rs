//! Browser logging: a `log` backend writing to the devtools console, and a
//! panic hook reporting through `console.error`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger (warnings and up) and route panics to
/// `console.error`. Safe to call more than once.
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        static PANIC_HOOK: std::sync::Once = std::sync::Once::new();
        PANIC_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let payload = info.payload();
                let message = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str));
                let text = panic_text(message, info.location());
                web_sys::console::error_1(&JsValue::from(text));
            }));
        });
    }
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn panic_text(message: Option<&str>, location: Option<&std::panic::Location<'_>>) -> String {
    let message = message.unwrap_or("non-string panic payload");
    match location {
        Some(at) => format!("fc-wasm panicked at {}:{}: {message}", at.file(), at.line()),
        None => format!("fc-wasm panicked: {message}"),
    }
}

/// `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`, any case.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}
