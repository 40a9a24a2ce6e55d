//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use pet_core::error::{ApiError, ValidationError};
use pet_core::http::HttpMethod;
use pet_core::{ImageResolver, PetClient, PetDraft, PetRecord};

/// Opaque handle to a `PetClient` plus the image resolver for the same
/// origin. C callers receive a pointer to this and pass it back into every
/// FFI function.
pub struct FfiPetClient {
    pub(crate) inner: PetClient,
    pub(crate) images: ImageResolver,
}

/// Allocate a C string, dropping interior NULs rather than failing.
pub(crate) fn to_c_string(s: impl Into<String>) -> *mut c_char {
    let mut bytes = s.into().into_bytes();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}

fn to_nullable_c_string(s: Option<String>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), to_c_string)
}

/// Read a borrowed C string; null and invalid UTF-8 read as empty.
pub(crate) fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Free a C string allocated by `to_c_string`. Null is a no-op.
pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `pet_build_*` functions. The C caller executes the request
/// and passes the response back through `pet_parse_*`. `path` is the
/// absolute URL.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: pet_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(req.path),
            headers,
            headers_len,
            body: to_nullable_c_string(req.body),
        }))
    }

    /// Release a request built by `from_core`.
    ///
    /// # Safety
    /// `req` must be non-null and come from `from_core`, freed at most once.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Caller-provided input (read, never freed, by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `pet_parse_*` function. A `status` of 0 means
/// no response arrived at all.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

/// The raw form fields exactly as typed. Null fields read as empty.
#[repr(C)]
pub struct FfiPetDraft {
    pub name: *const c_char,
    pub pet_type: *const c_char,
    pub age: *const c_char,
    pub breed: *const c_char,
    pub owner_name: *const c_char,
    pub image_url: *const c_char,
}

impl FfiPetDraft {
    pub(crate) fn to_core(&self) -> PetDraft {
        PetDraft {
            id: None,
            name: read_c_str(self.name),
            pet_type: read_c_str(self.pet_type),
            age: read_c_str(self.age),
            breed: read_c_str(self.breed),
            owner_name: read_c_str(self.owner_name),
            image_url: read_c_str(self.image_url),
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPetResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Validation = 1,
    Server = 2,
    Network = 3,
    Request = 4,
    InvalidResponse = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `pet_free_result` what `FfiPetResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Pet = 1,
    PetList = 2,
}

/// A single pet exposed to C. Optional text fields are null when absent.
#[repr(C)]
pub struct FfiPet {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub pet_type: *mut c_char,
    pub age: i32,
    pub breed: *mut c_char,
    pub owner_name: *mut c_char,
    pub image_url: *mut c_char,
}

impl FfiPet {
    fn from_core(pet: PetRecord) -> Self {
        FfiPet {
            id: to_c_string(pet.id.as_str()),
            name: to_c_string(pet.name),
            pet_type: to_c_string(pet.pet_type),
            age: pet.age,
            breed: to_nullable_c_string(pet.breed),
            owner_name: to_nullable_c_string(pet.owner_name),
            image_url: to_nullable_c_string(pet.image_url),
        }
    }

    fn free_fields(&self) {
        for ptr in [self.id, self.name, self.pet_type, self.breed, self.owner_name, self.image_url] {
            free_c_string(ptr);
        }
    }
}

/// A list of pets exposed to C, in server order.
#[repr(C)]
pub struct FfiPetList {
    pub items: *mut FfiPet,
    pub len: u32,
}

/// Result envelope for all parse and validate operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is the
/// user-facing text, and `data` is null. `http_status` is set for `Server`.
#[repr(C)]
pub struct FfiPetResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiPetResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16) -> *mut Self {
        Box::into_raw(Box::new(FfiPetResult {
            error_code,
            error_message: to_nullable_c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a single `FfiPet`.
    pub(crate) fn ok_pet(pet: PetRecord) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiPet::from_core(pet)));
        Box::into_raw(Box::new(FfiPetResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::Pet,
            data: data as *mut c_void,
        }))
    }

    /// Build a success result carrying an `FfiPetList`.
    pub(crate) fn ok_pet_list(pets: Vec<PetRecord>) -> *mut Self {
        let len = pets.len() as u32;
        let items = if pets.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiPet]> = pets.into_iter().map(FfiPet::from_core).collect();
            Box::into_raw(items) as *mut FfiPet
        };
        let data = Box::into_raw(Box::new(FfiPetList { items, len }));
        Box::into_raw(Box::new(FfiPetResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::PetList,
            data: data as *mut c_void,
        }))
    }

    /// Build a success result with no data payload (delete, validate).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0)
    }

    pub(crate) fn from_validation(err: ValidationError) -> *mut Self {
        Self::boxed(FfiErrorCode::Validation, Some(err.to_string()), 0)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::Server { status, .. } => (FfiErrorCode::Server, *status),
            ApiError::Network(_) => (FfiErrorCode::Network, 0),
            ApiError::Request(_) => (FfiErrorCode::Request, 0),
            ApiError::InvalidResponse(_) => (FfiErrorCode::InvalidResponse, 0),
        };
        Self::boxed(code, Some(err.to_string()), status)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0)
    }

    /// Release a result and whatever `data` points to.
    ///
    /// # Safety
    /// `result` must be non-null and come from one of the constructors above,
    /// freed at most once.
    pub(crate) unsafe fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Pet => {
                let pet = unsafe { Box::from_raw(result.data as *mut FfiPet) };
                pet.free_fields();
            }
            FfiDataTag::PetList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiPetList) };
                if !list.items.is_null() && list.len > 0 {
                    let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
                    let items = unsafe { Box::from_raw(slice) };
                    for pet in items.iter() {
                        pet.free_fields();
                    }
                }
            }
            FfiDataTag::None => {}
        }
    }
}
