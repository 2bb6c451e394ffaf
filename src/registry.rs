//! Handler registry - the startup-time table of invokable operations
//!
//! Every operation a driver may call is registered explicitly under a
//! `(handlerType, methodName)` pair before the server starts accepting
//! requests. There is no runtime discovery and no reflection: an
//! unregistered pair is rejected at dispatch time, and registering the same
//! pair twice is a programmer error caught at startup.

use std::collections::HashMap;

use crate::args::Args;
use crate::value::Value;

/// What an operation returns: a value to encode, or `None` for void.
pub type OperationResult = anyhow::Result<Option<Value>>;

/// A registered operation. Receives the decoded argument bag, returns a
/// value or a domain error.
pub type Operation = Box<dyn Fn(&Args) -> OperationResult + Send + Sync>;

/// Registry mapping `(handlerType, methodName)` to operations.
///
/// Built once at startup, then shared immutably by all workers.
pub struct HandlerRegistry {
    /// Operations grouped by handler type (namespace)
    namespaces: HashMap<String, HashMap<String, Operation>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            namespaces: HashMap::new(),
        }
    }

    /// Register an operation.
    ///
    /// # Panics
    ///
    /// Panics if the `(handler_type, method)` pair is already registered.
    /// Registration runs at startup; a duplicate is a bug in the wiring,
    /// not a runtime condition.
    pub fn register<F>(&mut self, handler_type: &str, method: &str, operation: F)
    where
        F: Fn(&Args) -> OperationResult + Send + Sync + 'static,
    {
        let previous = self
            .namespaces
            .entry(handler_type.to_string())
            .or_default()
            .insert(method.to_string(), Box::new(operation));

        if previous.is_some() {
            panic!(
                "duplicate operation registered: {}_{}",
                handler_type, method
            );
        }
    }

    /// Look up an operation by handler type and method name.
    pub fn get(&self, handler_type: &str, method: &str) -> Option<&Operation> {
        self.namespaces
            .get(handler_type)
            .and_then(|methods| methods.get(method))
    }

    pub fn contains(&self, handler_type: &str, method: &str) -> bool {
        self.get(handler_type, method).is_some()
    }

    /// Total number of registered operations.
    pub fn operation_count(&self) -> usize {
        self.namespaces.values().map(HashMap::len).sum()
    }

    /// Registered handler types, for diagnostics.
    pub fn handler_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.namespaces.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
