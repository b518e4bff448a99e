//! Blaze Bridge
//!
//! Safe Rust bindings to the Blaze native JSON Schema compiler and
//! evaluator. The engine does the schema work; this crate makes the
//! boundary safe: a reentrant reference-resolver callback, per-thread
//! compile scoping, a strict cross-boundary memory ownership discipline,
//! and exactly-once release of compiled-schema handles.
//!
//! ## Features
//!
//! - **Pre-registered schemas**: a thread-safe [`SchemaRegistry`] maps
//!   reference URIs to schema text, consulted before any remote source
//! - **Remote references**: `http`/`https` refs are fetched with short,
//!   bounded timeouts
//! - **Bundled references**: `bundle://` refs resolve against a schema
//!   tree embedded with `include_dir`
//! - **Detailed validation**: per-keyword errors with instance location
//!   and evaluation path
//!
//! ## Architecture
//!
//! ```text
//! caller ──► compile(schema, registry)
//!               │  bind registry to this thread
//!               ▼
//!          native engine ──► resolver callback (per unresolved $ref)
//!               │                 │ registry → http(s) → bundle://
//!               ▼                 ▼
//!          CompiledSchema ◄── engine-owned schema text
//!               │
//!               ├─► validate(instance) -> bool
//!               └─► validate_with_details(instance) -> ValidationResult
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use blaze_bridge as blaze;
//!
//! # fn main() -> blaze::Result<()> {
//! let registry = blaze::new_registry();
//! registry.register("int-schema", r#"{"type":"integer"}"#)?;
//!
//! let mut schema = blaze::compile_with(r#"{"$ref":"int-schema"}"#, &registry)?;
//! assert!(schema.validate("42")?);
//! assert!(!schema.validate(r#""x""#)?);
//! schema.close();
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
mod context;
pub mod error;
pub mod fetch;
mod memory;
mod native;
pub mod registry;
mod resolver;
pub mod schema;
pub mod validation;

pub use compiler::SchemaCompiler;
pub use config::BridgeConfig;
pub use error::{BlazeError, Result};
pub use fetch::set_bundled_schemas;
pub use registry::SchemaRegistry;
pub use schema::CompiledSchema;
pub use validation::{ValidationError, ValidationResult};

/// Force native engine initialization, reporting the startup failure if
/// the library or one of its entry points cannot be resolved. Calling
/// this is optional; the first compile initializes on demand.
pub fn initialize() -> Result<()> {
    native::NativeBinding::global().map(|_| ())
}

/// Create an empty schema registry.
pub fn new_registry() -> SchemaRegistry {
    SchemaRegistry::new()
}

/// Compile a schema with no pre-registered references.
pub fn compile(schema: &str) -> Result<CompiledSchema> {
    compiler::compile_schema(schema, None, None)
}

/// Compile a schema whose references are resolved against `registry`
/// first, before remote or bundled sources.
pub fn compile_with(schema: &str, registry: &SchemaRegistry) -> Result<CompiledSchema> {
    compiler::compile_schema(schema, Some(registry.clone()), None)
}
