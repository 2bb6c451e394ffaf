//! `datatype` namespace - primitive factories and comparators
//!
//! Drivers use these to manufacture values of an exact width on the server
//! (a driver-side integer loses its tag once it lands in a dynamically
//! typed test script) and to compare what came back. `hashMap` produces a
//! handle-addressed mutable map compatible with the `dictionary` namespace.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::handlers::dictionary::SharedDictionary;
use crate::registry::HandlerRegistry;
use crate::value::Value;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("datatype", "setLong", |args| {
        Ok(Some(Value::Long(args.get_i64("value")?)))
    });

    registry.register("datatype", "setFloat", |args| {
        Ok(Some(Value::Float(args.get_f32("value")?)))
    });

    registry.register("datatype", "setDouble", |args| {
        Ok(Some(Value::Double(args.get_f64("value")?)))
    });

    registry.register("datatype", "hashMap", |_args| {
        Ok(Some(Value::object::<SharedDictionary>(Mutex::new(
            HashMap::new(),
        ))))
    });

    registry.register("datatype", "get", |args| {
        let map = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        let value = map.lock().unwrap().get(key).cloned().unwrap_or(Value::Null);
        Ok(Some(value))
    });

    registry.register("datatype", "put", |args| {
        let map = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        let value = args.get("value").cloned().unwrap_or(Value::Null);
        map.lock().unwrap().insert(key.to_string(), value);
        Ok(None)
    });

    registry.register("datatype", "compare", |args| {
        let first = args.get_str("first")?;
        let second = args.get_str("second")?;
        Ok(Some(Value::Bool(first == second)))
    });

    registry.register("datatype", "compareLong", |args| {
        let long1 = args.get_i64("long1")?;
        let long2 = args.get_i64("long2")?;
        Ok(Some(Value::Bool(long1 == long2)))
    });

    registry.register("datatype", "compareDouble", |args| {
        let double1 = args.get_f64("double1")?;
        let double2 = args.get_f64("double2")?;
        Ok(Some(Value::Bool(double1 == double2)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        register(&mut registry);
        registry
    }

    fn one(registry: &HandlerRegistry, method: &str, args: Args) -> Option<Value> {
        registry.get("datatype", method).unwrap()(&args).unwrap()
    }

    #[test]
    fn test_set_long_widens_int_tag() {
        let registry = registry();

        let mut args = Args::new();
        args.insert("value", Value::Int(42));
        assert_eq!(one(&registry, "setLong", args), Some(Value::Long(42)));

        let mut args = Args::new();
        args.insert("value", Value::Long(1 << 40));
        assert_eq!(one(&registry, "setLong", args), Some(Value::Long(1 << 40)));
    }

    #[test]
    fn test_set_double_accepts_float_tag() {
        let registry = registry();

        let mut args = Args::new();
        args.insert("value", Value::Float(1.5));
        assert_eq!(one(&registry, "setDouble", args), Some(Value::Double(1.5)));
    }

    #[test]
    fn test_hash_map_lifecycle() {
        let registry = registry();

        let map = one(&registry, "hashMap", Args::new()).unwrap();

        let mut put = Args::new();
        put.insert("dictionary", map.clone());
        put.insert("key", Value::from("k"));
        put.insert("value", Value::Int(9));
        assert!(registry.get("datatype", "put").unwrap()(&put)
            .unwrap()
            .is_none());

        let mut get = Args::new();
        get.insert("dictionary", map);
        get.insert("key", Value::from("k"));
        assert_eq!(one(&registry, "get", get), Some(Value::Int(9)));
    }

    #[test]
    fn test_comparators() {
        let registry = registry();

        let mut args = Args::new();
        args.insert("first", Value::from("a"));
        args.insert("second", Value::from("a"));
        assert_eq!(one(&registry, "compare", args), Some(Value::Bool(true)));

        let mut args = Args::new();
        args.insert("long1", Value::Long(5));
        args.insert("long2", Value::Int(5));
        assert_eq!(one(&registry, "compareLong", args), Some(Value::Bool(true)));

        let mut args = Args::new();
        args.insert("double1", Value::Double(0.5));
        args.insert("double2", Value::Float(0.5));
        assert_eq!(
            one(&registry, "compareDouble", args),
            Some(Value::Bool(true))
        );
    }
}
