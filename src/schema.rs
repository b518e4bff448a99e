//! Compiled schema handle
//!
//! Wraps the opaque handle the engine returns from a successful compile
//! and owns its release. A handle is released exactly once: by `close()`
//! if the caller gets there first, otherwise by drop glue when the
//! wrapper goes out of scope. After `close()` the wrapper is inert and
//! any use fails loudly.

use tracing::debug;

use crate::error::{BlazeError, Result};
use crate::native::NativeBinding;
use crate::validation::ValidationResult;

/// A schema compiled by the native engine, ready for validation.
#[derive(Debug)]
pub struct CompiledSchema {
    handle: i64,
    closed: bool,
}

impl CompiledSchema {
    /// `handle` must be a live, non-zero handle freshly returned by the
    /// engine; the wrapper takes sole ownership of its release.
    pub(crate) fn new(handle: i64) -> Self {
        debug_assert_ne!(handle, 0);
        Self {
            handle,
            closed: false,
        }
    }

    /// The raw native handle, for as long as the schema is open.
    pub fn handle(&self) -> Result<i64> {
        if self.closed {
            return Err(BlazeError::SchemaClosed);
        }
        Ok(self.handle)
    }

    /// Whether the instance text satisfies this schema.
    pub fn validate(&self, instance: &str) -> Result<bool> {
        let handle = self.handle()?;
        NativeBinding::global()?.validate(handle, instance)
    }

    /// Validate and report each violated keyword with its instance
    /// location and evaluation path.
    pub fn validate_with_details(&self, instance: &str) -> Result<ValidationResult> {
        let handle = self.handle()?;
        let output = NativeBinding::global()?.validate_with_output(handle, instance)?;
        ValidationResult::from_json(&output)
    }

    /// Release the native template. Closing an already-closed schema is
    /// a no-op; the release itself happens at most once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Ok(binding) = NativeBinding::global() {
            binding.release_template(self.handle);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for CompiledSchema {
    fn drop(&mut self) {
        if !self.closed {
            debug!(handle = self.handle, "releasing compiled schema on drop");
            self.close();
        }
    }
}
