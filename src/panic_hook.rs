//! src/panic_hook.rs
//! Records panics in the log before the previous panic hook runs.

use std::any::Any;
use std::panic::{self, PanicHookInfo};
use std::thread;

use logging::{LogCall, PositionalCall, Severity};
use serde_json::json;

use crate::global::global;
use crate::logger::Logger;

/// Installs a panic hook that logs every panic at `crit` through
/// [`global`], then hands over to the hook that was installed before.
///
/// The process-wide logger is resolved when the first panic happens, not
/// when the hook is installed.
pub fn install_panic_hook() {
    chain_hook(global);
}

/// Like [`install_panic_hook`], logging to `logger` instead of the
/// process-wide instance.
pub fn install_panic_hook_for(logger: &'static Logger) {
    chain_hook(move || logger);
}

fn chain_hook<F>(logger: F)
where
    F: Fn() -> &'static Logger + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let logger = logger();
        logger.log(panic_call(info));
        logger.flush();
        previous(info);
    }));
}

fn panic_call(info: &PanicHookInfo<'_>) -> PositionalCall {
    let location = info
        .location()
        .map(|location| location.to_string())
        .unwrap_or_default();
    let thread = thread::current();
    LogCall::positional(
        Severity::Crit,
        format!("panic: {}", payload_text(info.payload())),
    )
    .operation("panic")
    .data(json!({
        "location": location,
        "thread": thread.name().unwrap_or("<unnamed>"),
    }))
}

fn payload_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("Box<dyn Any>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_text_reads_str_and_string() {
        let literal: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(payload_text(literal.as_ref()), "static message");

        let owned: Box<dyn Any + Send> = Box::new(String::from("formatted 7"));
        assert_eq!(payload_text(owned.as_ref()), "formatted 7");

        let opaque: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(payload_text(opaque.as_ref()), "Box<dyn Any>");
    }
}
