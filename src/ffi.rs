//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use the `extern "C"` calling convention and
//! `#[no_mangle]` so symbol names are stable.
//!
//! ## Memory management
//! - Strings returned by `cpdf_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `cpdf_free_string`.
//! - Passing a null pointer to the free function is a no-op.
//!
//! ## Error handling
//! - Conversion outcomes, including failures, come back as the JSON result
//!   object (`{"success":true,"pdfBase64":...}` or
//!   `{"success":false,"error":...,"detail":{...}}`).
//! - A null return means the call itself was malformed (null pointer, invalid
//!   UTF-8); `cpdf_last_error` then describes why.
//!
//! ## Usage from Go (cgo)
//! ```go
//! // #cgo LDFLAGS: -lcontract_pdf
//! // #include <stdint.h>
//! // extern char* cpdf_convert(const uint8_t* html, uint32_t html_len);
//! // extern const char* cpdf_last_error();
//! // extern void cpdf_free_string(char* s);
//! import "C"
//! ```

use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::ptr;
use std::slice;

use crate::pipeline::convert;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Convert HTML to a PDF and return the JSON result object.
///
/// # Safety
/// - `html_ptr` must point to `html_len` readable bytes.
/// - The returned string must be freed with `cpdf_free_string`.
#[no_mangle]
pub unsafe extern "C" fn cpdf_convert(html_ptr: *const u8, html_len: u32) -> *mut c_char {
    if html_ptr.is_null() {
        set_last_error("Null pointer argument");
        return ptr::null_mut();
    }

    let html_bytes = slice::from_raw_parts(html_ptr, html_len as usize);
    let html = match std::str::from_utf8(html_bytes) {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Invalid UTF-8: {e}"));
            return ptr::null_mut();
        }
    };

    match CString::new(convert(html).to_json()) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            set_last_error("JSON contained null byte");
            ptr::null_mut()
        }
    }
}

/// Last error message for the calling thread, or null. The pointer stays
/// valid until the next `cpdf_*` call on the same thread; do not free it.
#[no_mangle]
pub extern "C" fn cpdf_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cs) => cs.as_ptr(),
        None => ptr::null(),
    })
}

/// Free a string returned by `cpdf_convert`.
///
/// # Safety
/// `s` must be null or a pointer obtained from `cpdf_convert` that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn cpdf_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
