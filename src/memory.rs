//! Cross-boundary string marshalling
//!
//! Every buffer that crosses the boundary belongs to exactly one
//! allocator. Caller-owned buffers are plain [`CString`]s scoped to the
//! enclosing native call and released by Rust drop glue. Native-owned
//! buffers come from the engine's `blaze_alloc_string` and are released
//! only by the engine's matching free functions; the bridge never frees
//! them itself and never hands a Rust allocation to a native free.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use tracing::warn;

use crate::error::{BlazeError, Result};
use crate::native::NativeBinding;

/// Copy `text` into a caller-owned, NUL-terminated buffer scoped to the
/// enclosing native call.
pub(crate) fn caller_owned(text: &str) -> Result<CString> {
    CString::new(text)
        .map_err(|_| BlazeError::InvalidArgument("text contains an interior NUL byte".into()))
}

/// Copy `text` into a buffer from the engine's own allocator, sized
/// `len + 1` with an explicit trailing NUL, and hand back the pointer for
/// the engine to consume. Returns null on allocation failure; this path
/// runs inside the resolver callback where errors cannot propagate.
pub(crate) fn native_owned(binding: &NativeBinding, text: &str) -> *mut c_char {
    let bytes = text.as_bytes();
    let ptr = binding.alloc_string(bytes.len() + 1);
    if ptr.is_null() {
        warn!(size = bytes.len() + 1, "native string allocation failed");
        return ptr::null_mut();
    }
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.cast::<u8>(), bytes.len());
        *ptr.add(bytes.len()) = 0;
    }
    ptr
}

/// Decode a NUL-terminated byte sequence whose true extent is unknown,
/// reading at most `cap` bytes. Returns `None` for a null pointer, an
/// empty string, input with no terminator within `cap` bytes, or invalid
/// UTF-8.
///
/// # Safety
/// `ptr`, when non-null, must point to readable memory that is
/// NUL-terminated or at least `cap` bytes long.
pub(crate) unsafe fn decode_bounded(ptr: *const c_char, cap: usize) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    while len < cap {
        if *ptr.add(len) == 0 {
            break;
        }
        len += 1;
    }
    if len == 0 || len == cap {
        return None;
    }
    let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
    std::str::from_utf8(bytes).ok().map(str::to_owned)
}

/// Decode a NUL-terminated engine-produced string. The caller remains
/// responsible for releasing the buffer with the matching native free.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer that stays
/// valid for the duration of the call.
pub(crate) unsafe fn decode_native_string(ptr: *const c_char) -> Result<String> {
    if ptr.is_null() {
        return Err(BlazeError::Invocation(
            "native call returned a null string".into(),
        ));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|e| BlazeError::Invocation(format!("native string is not valid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_owned_roundtrip() {
        let buffer = caller_owned(r#"{"type":"integer"}"#).unwrap();
        assert_eq!(buffer.to_str().unwrap(), r#"{"type":"integer"}"#);
    }

    #[test]
    fn test_caller_owned_rejects_interior_nul() {
        assert!(caller_owned("{\0}").is_err());
    }

    #[test]
    fn test_decode_bounded_null_pointer() {
        let decoded = unsafe { decode_bounded(ptr::null(), 2048) };
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_bounded_reads_terminated_string() {
        let source = CString::new("https://example.com/s.json").unwrap();
        let decoded = unsafe { decode_bounded(source.as_ptr(), 2048) };
        assert_eq!(decoded.as_deref(), Some("https://example.com/s.json"));
    }

    #[test]
    fn test_decode_bounded_rejects_empty() {
        let source = CString::new("").unwrap();
        let decoded = unsafe { decode_bounded(source.as_ptr(), 2048) };
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_bounded_rejects_overlong_input() {
        let source = CString::new("x".repeat(64)).unwrap();
        // Terminator sits past the cap, so the scan must give up
        let decoded = unsafe { decode_bounded(source.as_ptr(), 16) };
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_decode_bounded_accepts_length_just_under_cap() {
        let source = CString::new("x".repeat(15)).unwrap();
        let decoded = unsafe { decode_bounded(source.as_ptr(), 16) };
        assert_eq!(decoded, Some("x".repeat(15)));
    }

    #[test]
    fn test_decode_native_string() {
        let source = CString::new(r#"{"valid":true}"#).unwrap();
        let decoded = unsafe { decode_native_string(source.as_ptr()) }.unwrap();
        assert_eq!(decoded, r#"{"valid":true}"#);
    }

    #[test]
    fn test_decode_native_string_null_is_invocation_error() {
        match unsafe { decode_native_string(ptr::null()) } {
            Err(BlazeError::Invocation(_)) => {}
            other => panic!("expected Invocation error, got {other:?}"),
        }
    }
}
