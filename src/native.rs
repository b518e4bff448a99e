//! Native engine binding
//!
//! Loads the Blaze shared library once per process, resolves its seven
//! entry points by symbol name, and exposes typed call wrappers. A
//! missing library or symbol is a startup invariant violation: the
//! failure is recorded in the process-wide slot and every subsequent use
//! reports it, without retrying.

use std::ffi::c_char;
use std::path::PathBuf;
use std::ptr;
use std::sync::OnceLock;

use libloading::Library;
use tracing::{debug, warn};

use crate::config::{BridgeConfig, LibraryConfig};
use crate::error::{BlazeError, Result};
use crate::memory;
use crate::resolver;

/// Signature of the resolver callback the engine invokes during compile.
pub(crate) type ResolverFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;

type CompileFn =
    unsafe extern "C" fn(*const c_char, *const c_char, ResolverFn, *const c_char) -> i64;
type ValidateFn = unsafe extern "C" fn(i64, *const c_char) -> bool;
type ValidateWithOutputFn = unsafe extern "C" fn(i64, *const c_char) -> *mut c_char;
type FreeTemplateFn = unsafe extern "C" fn(i64);
type AllocStringFn = unsafe extern "C" fn(usize) -> *mut c_char;
type FreeStringFn = unsafe extern "C" fn(*mut c_char);
type FreeJsonFn = unsafe extern "C" fn(*mut c_char);

/// The engine ignores the walker argument and applies its official
/// keyword walker; the argument must still be a valid JSON string.
const SCHEMA_WALKER: &str = "{}";

static BINDING: OnceLock<std::result::Result<NativeBinding, String>> = OnceLock::new();

/// Resolved entry points of the native engine, immutable after
/// initialization and shared without locking.
pub(crate) struct NativeBinding {
    compile: CompileFn,
    validate: ValidateFn,
    validate_with_output: ValidateWithOutputFn,
    free_template: FreeTemplateFn,
    alloc_string: AllocStringFn,
    free_json: FreeJsonFn,
    config: BridgeConfig,
    // Keeps the shared library mapped for the lifetime of the process;
    // the extracted fn pointers above borrow from it.
    _library: Library,
}

impl NativeBinding {
    /// The process-wide binding. The first call performs initialization;
    /// a failure sticks and is reported by every later call.
    pub(crate) fn global() -> Result<&'static NativeBinding> {
        match BINDING.get_or_init(Self::initialize) {
            Ok(binding) => Ok(binding),
            Err(message) => Err(BlazeError::Initialization(message.clone())),
        }
    }

    fn initialize() -> std::result::Result<NativeBinding, String> {
        let config = BridgeConfig::load().map_err(|e| e.to_string())?;
        let path = library_path(&config.library);
        debug!(path = %path.display(), "loading native engine");

        let library = unsafe { Library::new(&path) }.map_err(|e| {
            format!(
                "failed to load native engine from '{}': {e}",
                path.display()
            )
        })?;

        fn resolve<T: Copy>(
            library: &Library,
            symbol: &'static str,
        ) -> std::result::Result<T, String> {
            let found = unsafe { library.get::<T>(symbol.as_bytes()) }
                .map_err(|e| format!("missing native entry point '{symbol}': {e}"))?;
            Ok(*found)
        }

        let compile = resolve::<CompileFn>(&library, "blaze_compile")?;
        let validate = resolve::<ValidateFn>(&library, "blaze_validate")?;
        let validate_with_output =
            resolve::<ValidateWithOutputFn>(&library, "blaze_validate_with_output")?;
        let free_template = resolve::<FreeTemplateFn>(&library, "blaze_free_template")?;
        let alloc_string = resolve::<AllocStringFn>(&library, "blaze_alloc_string")?;
        let free_json = resolve::<FreeJsonFn>(&library, "blaze_free_json")?;
        // Resolver result buffers are consumed and released engine-side,
        // so the string free is never called from here; its presence is
        // still part of the startup invariant.
        resolve::<FreeStringFn>(&library, "blaze_free_string")?;

        debug!(path = %path.display(), "native engine ready");
        Ok(NativeBinding {
            compile,
            validate,
            validate_with_output,
            free_template,
            alloc_string,
            free_json,
            config,
            _library: library,
        })
    }

    pub(crate) fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Compile a schema, with the one process-lifetime resolver
    /// trampoline as the engine's reference resolver. The engine's `0`
    /// return is the compilation failure sentinel and is never wrapped
    /// as a handle.
    pub(crate) fn compile(&self, schema: &str, default_dialect: Option<&str>) -> Result<i64> {
        let schema_text = memory::caller_owned(schema)?;
        let walker_text = memory::caller_owned(SCHEMA_WALKER)?;
        let dialect_text = default_dialect.map(memory::caller_owned).transpose()?;
        let dialect_ptr = dialect_text
            .as_ref()
            .map_or(ptr::null(), |text| text.as_ptr());

        let handle = unsafe {
            (self.compile)(
                schema_text.as_ptr(),
                walker_text.as_ptr(),
                resolver::resolve_schema_reference,
                dialect_ptr,
            )
        };
        if handle == 0 {
            return Err(BlazeError::Compilation);
        }
        Ok(handle)
    }

    pub(crate) fn validate(&self, handle: i64, instance: &str) -> Result<bool> {
        let instance_text = memory::caller_owned(instance)?;
        Ok(unsafe { (self.validate)(handle, instance_text.as_ptr()) })
    }

    /// Run detailed validation. The engine's null return means the call
    /// itself failed, which is distinct from "valid with no errors".
    pub(crate) fn validate_with_output(&self, handle: i64, instance: &str) -> Result<String> {
        let instance_text = memory::caller_owned(instance)?;
        let output = unsafe { (self.validate_with_output)(handle, instance_text.as_ptr()) };
        if output.is_null() {
            return Err(BlazeError::Invocation(
                "detailed validation produced no output".into(),
            ));
        }
        let decoded = unsafe { memory::decode_native_string(output) };
        unsafe { (self.free_json)(output) };
        decoded
    }

    /// Request a buffer from the engine's own allocator. Returns null on
    /// failure; callers on the resolver path must degrade, not error.
    pub(crate) fn alloc_string(&self, size: usize) -> *mut c_char {
        unsafe { (self.alloc_string)(size) }
    }

    /// Release a compiled template. Failures are reported but never
    /// propagated; release commonly runs in cleanup paths where a
    /// secondary error would mask the primary one.
    pub(crate) fn release_template(&self, handle: i64) {
        if handle == 0 {
            warn!("refusing to release the zero handle sentinel");
            return;
        }
        unsafe { (self.free_template)(handle) };
    }
}

/// The library file to load: an explicit configured path, else the
/// platform file name for the configured base name, searched on the
/// loader path.
pub(crate) fn library_path(config: &LibraryConfig) -> PathBuf {
    match &config.path {
        Some(path) => path.clone(),
        None => PathBuf::from(libloading::library_filename(&config.name)),
    }
}
