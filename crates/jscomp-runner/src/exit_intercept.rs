//! Process-wide exit interception.
//!
//! Compiler backends end a run with [`request_exit`]. Normally that terminates
//! the process. While an [`ExitInterceptor`] is alive the request unwinds the
//! calling thread instead, carrying the status as an [`ExitRequest`] payload
//! that [`ExitInterceptor::call`] turns back into a value.
//!
//! Only one interceptor may be installed at a time. Unwinding requires the
//! `unwind` panic strategy, which every profile of this workspace keeps.

use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

static INTERCEPTING: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterceptError {
    #[error("an exit interceptor is already installed")]
    AlreadyInstalled,
}

/// Status code a backend asked to exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequest {
    pub status: i32,
}

/// Terminates the process with `status`, or unwinds to the active
/// interceptor when there is one.
pub fn request_exit(status: i32) -> ! {
    if INTERCEPTING.load(Ordering::SeqCst) {
        // resume_unwind skips the panic hook, so nothing is printed
        panic::resume_unwind(Box::new(ExitRequest { status }));
    }
    process::exit(status)
}

/// Scope guard for the interception policy. Dropping it restores normal
/// exit behaviour, including when the guarded call unwinds.
#[derive(Debug)]
pub struct ExitInterceptor {
    _installed: (),
}

impl ExitInterceptor {
    pub fn install() -> Result<Self, InterceptError> {
        INTERCEPTING
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| InterceptError::AlreadyInstalled)?;
        tracing::trace!("exit interception installed");
        Ok(Self { _installed: () })
    }

    pub fn is_installed() -> bool {
        INTERCEPTING.load(Ordering::SeqCst)
    }

    /// Runs `f`, returning `Err` with the status if it requested an exit.
    /// Any other panic keeps unwinding.
    pub fn call<F, T>(&self, f: F) -> Result<T, ExitRequest>
    where
        F: FnOnce() -> T,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => match payload.downcast::<ExitRequest>() {
                Ok(request) => Err(*request),
                Err(other) => panic::resume_unwind(other),
            },
        }
    }
}

impl Drop for ExitInterceptor {
    fn drop(&mut self) {
        INTERCEPTING.store(false, Ordering::SeqCst);
        tracing::trace!("exit interception removed");
    }
}
