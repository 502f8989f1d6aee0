//! FFI bindings for Postflux
//!
//! This module provides C-compatible functions for calling Postflux from other
//! languages. All functions take and return JSON in C strings (null-terminated)
//! and return allocated memory that must be freed with `postflux_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::feed::PostFeed;
use crate::pipeline::{classify_json, classify_posts};
use crate::renderer::{RowFormat, RowRenderer};
use crate::summary::BatchSummary;
use crate::types::ClassifiedPost;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => {
            set_last_error("Output contains an interior NUL byte");
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Classify a JSON array of posts and return a JSON array of records.
///
/// # Safety
/// - `posts_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `postflux_free_string`.
/// - Returns NULL on error; call `postflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn postflux_classify_json(posts_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(posts_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match classify_json(&json_str) {
        Ok(records) => string_to_cstr(&records),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Render one classified record (as JSON) at a 0-based row index.
///
/// `format` is 0 for Markdown and 1 for HTML.
///
/// # Safety
/// - `record_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `postflux_free_string`.
/// - Returns NULL on error; call `postflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn postflux_render_row(
    record_json: *const c_char,
    row_index: u32,
    format: i32,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(record_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid record string pointer");
            return ptr::null_mut();
        }
    };

    let row_format = match format {
        0 => RowFormat::Markdown,
        1 => RowFormat::Html,
        other => {
            set_last_error(&format!("Unknown row format: {}", other));
            return ptr::null_mut();
        }
    };

    match serde_json::from_str::<ClassifiedPost>(&json_str) {
        Ok(record) => {
            let row = RowRenderer::render_row_as(&record, row_index as usize, row_format);
            string_to_cstr(&row)
        }
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Classify a JSON array of posts and return a JSON batch summary.
///
/// # Safety
/// - `posts_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `postflux_free_string`.
/// - Returns NULL on error; call `postflux_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn postflux_summarize_json(posts_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(posts_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let posts = match PostFeed::parse_array(&json_str) {
        Ok(posts) => posts,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let summary = BatchSummary::from_posts(&classify_posts(&posts));
    match serde_json::to_string(&summary) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Postflux functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Postflux function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn postflux_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Postflux call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn postflux_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Postflux library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn postflux_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_posts_json() -> CString {
        CString::new(
            r#"[
                {"text": "Just completed a 10 km run with @RunKeeper http://rnkpr.com/a #RunKeeper", "created_at": "2012-03-01T10:00:00Z"},
                {"text": "Nice weather today", "created_at": "2012-03-02T10:00:00Z"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_classify_json() {
        let json = sample_posts_json();

        unsafe {
            let result = postflux_classify_json(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let value: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(value[0]["category"], "completed_event");
            assert_eq!(value[0]["activity_type"], "running");
            assert_eq!(value[1]["category"], "miscellaneous");

            postflux_free_string(result);
        }
    }

    #[test]
    fn test_ffi_render_row_from_classified_record() {
        let json = sample_posts_json();

        unsafe {
            let records = postflux_classify_json(json.as_ptr());
            assert!(!records.is_null());

            let records_str = CStr::from_ptr(records).to_str().unwrap();
            let value: serde_json::Value = serde_json::from_str(records_str).unwrap();
            let record = CString::new(value[1].to_string()).unwrap();

            let row = postflux_render_row(record.as_ptr(), 4, 0);
            assert!(!row.is_null());
            assert_eq!(CStr::from_ptr(row).to_str().unwrap(), "5. Nice weather today");

            postflux_free_string(row);
            postflux_free_string(records);
        }
    }

    #[test]
    fn test_ffi_summarize_json() {
        let json = sample_posts_json();

        unsafe {
            let result = postflux_summarize_json(json.as_ptr());
            assert!(!result.is_null());

            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["total_posts"], 2);
            assert_eq!(value["activity_frequencies"]["running"], 1);

            postflux_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();
            let result = postflux_classify_json(invalid_json.as_ptr());
            assert!(result.is_null());

            let error = postflux_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());

            let record = CString::new("{}").unwrap();
            assert!(postflux_render_row(record.as_ptr(), 0, 7).is_null());
            assert!(postflux_classify_json(ptr::null()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = postflux_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
