//! Built-in handler namespaces
//!
//! The namespaces every bridge deployment ships: primitive factories and
//! comparators (`datatype`) plus handle-addressed mutable containers
//! (`dictionary`, `array`). Together they exercise every serializer branch
//! and the full Memory lifecycle. Product-specific namespaces are
//! registered next to these by the embedding binary.

pub mod array;
pub mod datatype;
pub mod dictionary;

use crate::registry::HandlerRegistry;

/// Register all built-in namespaces.
pub fn register_builtins(registry: &mut HandlerRegistry) {
    datatype::register(registry);
    dictionary::register(registry);
    array::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_register_cleanly() {
        let mut registry = HandlerRegistry::new();
        register_builtins(&mut registry);

        assert_eq!(registry.handler_types(), vec!["array", "datatype", "dictionary"]);
        assert!(registry.contains("datatype", "setLong"));
        assert!(registry.contains("dictionary", "create"));
        assert!(registry.contains("array", "addItem"));
    }
}
