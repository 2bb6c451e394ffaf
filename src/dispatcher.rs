//! Dispatcher - resolves and invokes operations against the wire protocol
//!
//! One dispatch = one request: parse the compound `handlerType_methodName`
//! path, decode the raw argument strings through the serializer (resolving
//! any handles), invoke the registered operation, encode the result back
//! into a wire string. The reserved pseudo-methods `release` and
//! `flushMemory` act on the handle table directly and bypass the registry.
//!
//! The dispatcher is transport-agnostic: it consumes an already-parsed
//! string map and returns a string or an error. It holds no lock while an
//! operation runs - a slow handler cannot stall other requests' handle
//! traffic.

use std::collections::HashMap;
use std::sync::Arc;

use crate::args::Args;
use crate::error::{BridgeError, Result};
use crate::memory::Memory;
use crate::registry::HandlerRegistry;
use crate::serializer::{decode, encode};

/// Wire body answered for operations that return nothing.
pub const VOID_SENTINEL: &str = "I-1";

/// Handler type assigned to paths with no `_` separator, which can only
/// reach the reserved pseudo-methods.
const NO_HANDLER: &str = "nohandler";

/// Resolves `(handlerType, methodName, raw args)` to a wire-string result.
pub struct Dispatcher {
    registry: HandlerRegistry,
    memory: Arc<Memory>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, memory: Arc<Memory>) -> Self {
        Self { registry, memory }
    }

    pub fn memory(&self) -> &Arc<Memory> {
        &self.memory
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatch one request.
    ///
    /// `method_path` is the compound `{handlerType}_{methodName}` from the
    /// request URL; `raw_args` maps argument names to wire strings.
    pub fn dispatch(
        &self,
        method_path: &str,
        raw_args: &HashMap<String, String>,
    ) -> Result<String> {
        let (handler_type, method) = split_method_path(method_path);

        // Reserved pseudo-methods act on Memory itself. `release` takes the
        // handle verbatim - decoding it would resolve the object instead of
        // naming it.
        if method == "release" {
            if let Some(handle) = raw_args.get("releaseObject").or_else(|| raw_args.get("object"))
            {
                self.memory.remove(handle);
            }
            return Ok(VOID_SENTINEL.to_string());
        }
        if method == "flushMemory" || method == "flush" {
            self.memory.flush();
            return Ok(VOID_SENTINEL.to_string());
        }

        let operation =
            self.registry
                .get(handler_type, method)
                .ok_or_else(|| BridgeError::UnknownOperation {
                    handler_type: handler_type.to_string(),
                    method: method.to_string(),
                })?;

        let mut args = Args::new();
        for (name, raw) in raw_args {
            args.insert(name.clone(), decode(raw, &self.memory)?);
        }

        let result = operation(&args).map_err(BridgeError::OperationFailed)?;

        match result {
            Some(value) => encode(&value, &self.memory),
            None => Ok(VOID_SENTINEL.to_string()),
        }
    }
}

/// Split `"database_create"` into `("database", "create")`.
///
/// A path without a separator has no handler type and can only address the
/// reserved pseudo-methods.
fn split_method_path(path: &str) -> (&str, &str) {
    match path.split_once('_') {
        Some((handler_type, method)) => (handler_type, method),
        None => (NO_HANDLER, path),
    }
}
