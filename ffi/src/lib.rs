//! C-ABI wrapper around `pet-core`.
//!
//! # Overview
//! Exposes the pet records contract through `extern "C"` functions so a
//! host UI written in any language with a C FFI can validate drafts, build
//! requests, and interpret replies without linking to serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Saving is a single entry point: a null id builds a create, anything
//!   else an update. Drafts are validated and normalized before a request
//!   exists, so an invalid draft never yields a request.
//! - A single `FfiPetResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `pet_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use pet_core::error::{ApiError, TransportError};
use pet_core::http::HttpResponse;
use pet_core::{ImageResolver, PetClient, PetId, SyncConfig};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url` (e.g. `http://localhost:8080`).
///
/// Images resolve against the same origin with the default uploads path.
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `pet_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn pet_client_new(base_url: *const c_char) -> *mut FfiPetClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let config = SyncConfig {
            api_origin: read_c_str(base_url).trim_end_matches('/').to_string(),
            ..SyncConfig::default()
        };
        Box::into_raw(Box::new(FfiPetClient {
            inner: PetClient::from_config(&config),
            images: ImageResolver::new(&config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `pet_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pet_client_free(client: *mut FfiPetClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request that fetches every pet.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `pet_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn pet_build_list_pets(client: *const FfiPetClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_pets())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the save request for `draft`: POST when `id` is null, PUT to the
/// pet's URL otherwise.
///
/// Returns null if `client` or `draft` is null, or if the draft fails
/// validation. Call `pet_validate_draft` first to get the message.
#[unsafe(no_mangle)]
pub extern "C" fn pet_build_save_pet(
    client: *const FfiPetClient,
    id: *const c_char,
    draft: *const FfiPetDraft,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || draft.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let payload = match unsafe { &*draft }.to_core().normalize() {
            Ok(p) => p,
            Err(_) => return std::ptr::null_mut(),
        };
        let built = if id.is_null() {
            client.inner.build_create_pet(&payload)
        } else {
            client.inner.build_update_pet(&PetId::new(&read_c_str(id)), &payload)
        };
        match built {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request that deletes the pet with `id`.
///
/// Returns null if `client` or `id` is null.
#[unsafe(no_mangle)]
pub extern "C" fn pet_build_delete_pet(
    client: *const FfiPetClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_pet(&PetId::new(&read_c_str(id))))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check `draft` against the form rules.
///
/// Returns `Ok` with no data when valid, or `Validation` carrying the first
/// failing rule's message.
#[unsafe(no_mangle)]
pub extern "C" fn pet_validate_draft(draft: *const FfiPetDraft) -> *mut FfiPetResult {
    catch_unwind(|| {
        if draft.is_null() {
            return FfiPetResult::null_arg("draft");
        }
        match unsafe { &*draft }.to_core().validate() {
            Ok(()) => FfiPetResult::ok_empty(),
            Err(e) => FfiPetResult::from_validation(e),
        }
    })
    .unwrap_or_else(|_| FfiPetResult::panic("panic in pet_validate_draft"))
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core reply. Status 0 is a transport
/// failure; a null body reads as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    if resp.status == 0 {
        return Err(TransportError::NoResponse("no response received".into()).into());
    }
    Ok(HttpResponse::new(resp.status, read_c_str(resp.body)))
}

/// Shared null checks and error mapping for every `pet_parse_*` function.
fn parse_with<T>(
    op: &str,
    client: *const FfiPetClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&PetClient, HttpResponse) -> Result<T, ApiError>,
    wrap: impl FnOnce(T) -> *mut FfiPetResult,
) -> *mut FfiPetResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiPetResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPetResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = ffi_response_to_core(unsafe { &*response })
            .and_then(|resp| parse(&client.inner, resp));
        match outcome {
            Ok(value) => wrap(value),
            Err(e) => FfiPetResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiPetResult::panic(&format!("panic in {op}")))
}

/// Parse the reply to a list request.
///
/// Returns a result with `data_tag = PetList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn pet_parse_list_pets(
    client: *const FfiPetClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetResult {
    parse_with(
        "pet_parse_list_pets",
        client,
        response,
        PetClient::parse_list_pets,
        FfiPetResult::ok_pet_list,
    )
}

/// Parse the reply to a save request, create or update alike.
///
/// Returns a result with `data_tag = Pet` on success.
#[unsafe(no_mangle)]
pub extern "C" fn pet_parse_saved_pet(
    client: *const FfiPetClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetResult {
    parse_with(
        "pet_parse_saved_pet",
        client,
        response,
        PetClient::parse_update_pet,
        FfiPetResult::ok_pet,
    )
}

/// Parse the reply to a delete request. Any 2xx is success with no data.
#[unsafe(no_mangle)]
pub extern "C" fn pet_parse_delete_pet(
    client: *const FfiPetClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPetResult {
    parse_with(
        "pet_parse_delete_pet",
        client,
        response,
        PetClient::parse_delete_pet,
        |()| FfiPetResult::ok_empty(),
    )
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Turn a stored image reference into a displayable URL. `raw` may be null.
///
/// Returns null only if `client` is null. Free with `pet_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn pet_resolve_image_url(
    client: *const FfiPetClient,
    raw: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let raw = (!raw.is_null()).then(|| read_c_str(raw));
        to_c_string(client.images.resolve(raw.as_deref()))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `pet_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pet_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free a result returned by any `pet_parse_*` or `pet_validate_draft` call.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn pet_free_result(result: *mut FfiPetResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiPetResult::free(result) });
}

/// Free a string returned by `pet_resolve_image_url`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pet_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}
