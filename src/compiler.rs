//! Schema compilation
//!
//! [`SchemaCompiler`] carries the per-compiler configuration (an optional
//! registry of pre-registered schemas and an optional default dialect);
//! `compile_schema` is the single funnel every compile goes through. The
//! funnel binds the registry to the calling thread, invokes the native
//! compiler, and unbinds on every exit path, so resolver callbacks
//! re-entering on this thread during the call see exactly this compile's
//! registry and nothing else.

use crate::context::ContextGuard;
use crate::error::Result;
use crate::native::NativeBinding;
use crate::registry::SchemaRegistry;
use crate::schema::CompiledSchema;

/// Compiles schemas against an optional registry and default dialect.
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    registry: Option<SchemaRegistry>,
    default_dialect: Option<String>,
}

impl SchemaCompiler {
    /// A compiler with no pre-registered schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler whose resolver consults `registry` first.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self {
            registry: Some(registry),
            default_dialect: None,
        }
    }

    /// Dialect applied when a schema does not declare `$schema`.
    pub fn default_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.default_dialect = Some(dialect.into());
        self
    }

    pub fn registry(&self) -> Option<&SchemaRegistry> {
        self.registry.as_ref()
    }

    pub fn compile(&self, schema: &str) -> Result<CompiledSchema> {
        compile_schema(schema, self.registry.clone(), self.default_dialect.as_deref())
    }
}

pub(crate) fn compile_schema(
    schema: &str,
    registry: Option<SchemaRegistry>,
    default_dialect: Option<&str>,
) -> Result<CompiledSchema> {
    let binding = NativeBinding::global()?;
    let _scope = ContextGuard::activate(registry)?;
    let handle = binding.compile(schema, default_dialect)?;
    Ok(CompiledSchema::new(handle))
}
