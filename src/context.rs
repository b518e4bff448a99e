//! Per-thread compile scope
//!
//! The native engine calls the resolver trampoline back on the same
//! thread that entered `blaze_compile`, and the C callback signature
//! cannot carry extra parameters. The registry in scope for one compile
//! call therefore travels through a thread-local slot: set immediately
//! before the native call, cleared on every exit path, and only ever
//! observed by resolver invocations re-entering on the same thread.
//! Compiles running concurrently on other threads see their own slot.

use std::cell::RefCell;

use crate::error::{BlazeError, Result};
use crate::registry::SchemaRegistry;

thread_local! {
    // Outer Option: whether a compile is in flight on this thread.
    // Inner Option: the registry bound to it, if any.
    static COMPILE_SCOPE: RefCell<Option<Option<SchemaRegistry>>> = const { RefCell::new(None) };
}

/// RAII activation of the calling thread's compile scope. Dropping the
/// guard clears the slot, so early returns and panics inside the compile
/// funnel cannot leak a registry into a later compile on this thread.
#[derive(Debug)]
pub(crate) struct ContextGuard {
    _private: (),
}

impl ContextGuard {
    /// Bind `registry` (or an explicit none) to the calling thread for
    /// the duration of one compile call. Errs if a compile is already in
    /// flight on this thread.
    pub(crate) fn activate(registry: Option<SchemaRegistry>) -> Result<Self> {
        COMPILE_SCOPE.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Err(BlazeError::NestedCompile);
            }
            *slot = Some(registry);
            Ok(ContextGuard { _private: () })
        })
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        COMPILE_SCOPE.with(|slot| {
            slot.borrow_mut().take();
        });
    }
}

/// Run `f` with the registry active for the innermost compile on this
/// thread, if a compile is in flight and bound one.
pub(crate) fn with_active_registry<R>(f: impl FnOnce(Option<&SchemaRegistry>) -> R) -> R {
    COMPILE_SCOPE.with(|slot| {
        let slot = slot.borrow();
        f(slot.as_ref().and_then(|scope| scope.as_ref()))
    })
}
