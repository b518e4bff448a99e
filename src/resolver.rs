//! Reference resolver trampoline
//!
//! The one function the engine calls back into, synchronously and on its
//! own call stack, whenever it meets a `$ref` URI it cannot satisfy
//! internally. It may be invoked zero or more times per compile, and
//! concurrently by independent compiles on different threads; per-call
//! state comes from the thread-local compile scope, never from the
//! trampoline itself.
//!
//! Nothing may unwind out of this function into native frames: every
//! failure, including a panic, degrades to a null return, which the
//! engine treats as "unresolved".

use std::ffi::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::{debug, warn};

use crate::context;
use crate::fetch;
use crate::memory;
use crate::native::NativeBinding;

/// Where a URI gets resolved from when the active registry has no entry
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UriScheme {
    Remote,
    Bundled,
    Unsupported,
}

impl UriScheme {
    pub(crate) fn classify(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            UriScheme::Remote
        } else if uri.starts_with(fetch::BUNDLE_SCHEME) {
            UriScheme::Bundled
        } else {
            UriScheme::Unsupported
        }
    }
}

/// The resolver callback handed to every `blaze_compile` invocation.
pub(crate) unsafe extern "C" fn resolve_schema_reference(uri: *const c_char) -> *mut c_char {
    match panic::catch_unwind(AssertUnwindSafe(|| resolve(uri))) {
        Ok(result) => result,
        Err(_) => {
            warn!("panic caught at the resolver boundary");
            ptr::null_mut()
        }
    }
}

fn resolve(uri: *const c_char) -> *mut c_char {
    if uri.is_null() {
        warn!("resolver invoked with a null URI");
        return ptr::null_mut();
    }

    // The resolver only runs inside a compile, so the binding must
    // already be initialized; bail out rather than trigger a load here.
    let binding = match NativeBinding::global() {
        Ok(binding) => binding,
        Err(_) => return ptr::null_mut(),
    };

    let max_len = binding.config().resolver.max_uri_len;
    // The pointer is non-null and NUL-terminated per the engine's
    // callback contract; the scan is capped regardless.
    let uri = match unsafe { memory::decode_bounded(uri, max_len) } {
        Some(uri) => uri,
        None => {
            warn!(max_len, "reference URI is empty, overlong, or not UTF-8");
            return ptr::null_mut();
        }
    };
    debug!(uri = %uri, "resolving schema reference");

    match lookup(&uri, binding) {
        Some(schema) => memory::native_owned(binding, &schema),
        None => ptr::null_mut(),
    }
}

/// Fixed resolution precedence: the registry bound to this thread's
/// compile wins over remote and bundled sources with the same name.
fn lookup(uri: &str, binding: &NativeBinding) -> Option<String> {
    let registered = context::with_active_registry(|registry| {
        registry.and_then(|registry| registry.resolve(uri))
    });
    if let Some(schema) = registered {
        debug!(uri = %uri, "resolved from registry");
        return Some(schema);
    }

    match UriScheme::classify(uri) {
        UriScheme::Remote => fetch::fetch_remote(uri, &binding.config().fetch),
        UriScheme::Bundled => fetch::read_bundled(uri),
        UriScheme::Unsupported => {
            warn!(uri = %uri, "unsupported schema reference scheme");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_remote() {
        assert_eq!(
            UriScheme::classify("https://example.com/schema.json"),
            UriScheme::Remote
        );
        assert_eq!(
            UriScheme::classify("http://example.com/schema.json"),
            UriScheme::Remote
        );
    }

    #[test]
    fn test_classify_bundled() {
        assert_eq!(
            UriScheme::classify("bundle://schemas/address.schema.json"),
            UriScheme::Bundled
        );
    }

    #[test]
    fn test_classify_unsupported() {
        assert_eq!(UriScheme::classify("urn:example:schema"), UriScheme::Unsupported);
        assert_eq!(UriScheme::classify("my-integer-schema"), UriScheme::Unsupported);
        assert_eq!(UriScheme::classify(""), UriScheme::Unsupported);
    }

    #[test]
    fn test_null_uri_returns_null_without_scanning() {
        let result = unsafe { resolve_schema_reference(ptr::null()) };
        assert!(result.is_null());
    }
}
