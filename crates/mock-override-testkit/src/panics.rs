use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("expected the call to panic, but it returned")]
pub struct NoPanic;

/// Run `f` and return its panic payload untouched.
pub fn panic_payload<R>(f: impl FnOnce() -> R) -> Result<Box<dyn Any + Send>, NoPanic> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => Err(NoPanic),
        Err(payload) => Ok(payload),
    }
}

/// Run `f` and return its panic message, for string payloads.
pub fn panic_message<R>(f: impl FnOnce() -> R) -> Result<Option<String>, NoPanic> {
    let payload = panic_payload(f)?;
    Ok(payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string())))
}
