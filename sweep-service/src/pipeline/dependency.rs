// Dependency Pipeline
// Ordered pure transforms that derive additional values for a combination

use crate::parser::models::ParamMap;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A named pure transform over a combination.
///
/// The function receives the combination as merged so far (original values
/// plus everything derived by earlier functions) and returns only its
/// additions. It must not rely on hidden state: re-applying the pipeline to
/// the same input must produce the same output.
pub trait DependencyFn: Send + Sync {
    /// Identity used in error reports.
    fn name(&self) -> &str;

    /// Compute derived key/value pairs from the merged combination.
    fn apply(&self, values: &ParamMap) -> Result<ParamMap, String>;
}

/// Error raised when a dependency function fails.
///
/// Dependency functions are never an expected source of failure: filters
/// classify, dependencies compute. A failing dependency therefore aborts the
/// owning phase rather than landing in the fail-set.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("dependency function '{function}' failed: {message}")]
pub struct DependencyError {
    pub function: String,
    pub message: String,
}

/// An ordered list of dependency functions.
#[derive(Clone, Default)]
pub struct DependencySet {
    functions: Vec<Arc<dyn DependencyFn>>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a function (builder form).
    pub fn with(mut self, function: Arc<dyn DependencyFn>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn push(&mut self, function: Arc<dyn DependencyFn>) {
        self.functions.push(function);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name()).collect()
    }

    /// Fold every function's additions into a fresh copy of the input.
    ///
    /// Later keys override earlier ones (and the originals). The input is
    /// never mutated, and there is no partial application: the first failing
    /// function aborts the whole fold.
    pub fn apply(&self, values: &ParamMap) -> Result<ParamMap, DependencyError> {
        let mut merged = values.clone();
        for function in &self.functions {
            let additions = function.apply(&merged).map_err(|message| DependencyError {
                function: function.name().to_string(),
                message,
            })?;
            for (key, value) in additions {
                merged.insert(key, value);
            }
        }
        Ok(merged)
    }
}

impl fmt::Debug for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencySet")
            .field("functions", &self.names())
            .finish()
    }
}

struct ClosureDependency<F> {
    name: String,
    func: F,
}

impl<F> DependencyFn for ClosureDependency<F>
where
    F: Fn(&ParamMap) -> Result<ParamMap, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, values: &ParamMap) -> Result<ParamMap, String> {
        (self.func)(values)
    }
}

/// Wrap a closure as a named dependency function.
pub fn named_dependency<F>(name: impl Into<String>, func: F) -> Arc<dyn DependencyFn>
where
    F: Fn(&ParamMap) -> Result<ParamMap, String> + Send + Sync + 'static,
{
    Arc::new(ClosureDependency {
        name: name.into(),
        func,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::Scalar;

    fn base() -> ParamMap {
        let mut m = ParamMap::new();
        m.insert("H".to_string(), Scalar::Float(1.0));
        m.insert("T".to_string(), Scalar::Float(8.0));
        m
    }

    #[test]
    fn test_empty_set_passes_through() {
        let set = DependencySet::new();
        let out = set.apply(&base()).unwrap();
        assert_eq!(out, base());
    }

    #[test]
    fn test_later_function_sees_earlier_additions() {
        let set = DependencySet::new()
            .with(named_dependency("double_h", |v: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert(
                    "H2".to_string(),
                    Scalar::Float(v["H"].as_f64().unwrap() * 2.0),
                );
                Ok(out)
            }))
            .with(named_dependency("sum", |v: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert(
                    "SUM".to_string(),
                    Scalar::Float(v["H"].as_f64().unwrap() + v["H2"].as_f64().unwrap()),
                );
                Ok(out)
            }));

        let out = set.apply(&base()).unwrap();
        assert_eq!(out["H2"], Scalar::Float(2.0));
        assert_eq!(out["SUM"], Scalar::Float(3.0));
    }

    #[test]
    fn test_later_keys_override_earlier() {
        let set = DependencySet::new()
            .with(named_dependency("first", |_: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert("K".to_string(), Scalar::Int(1));
                Ok(out)
            }))
            .with(named_dependency("second", |_: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert("K".to_string(), Scalar::Int(2));
                Ok(out)
            }));

        assert_eq!(set.apply(&base()).unwrap()["K"], Scalar::Int(2));
    }

    #[test]
    fn test_override_of_original_value() {
        let set = DependencySet::new().with(named_dependency("clamp", |_: &ParamMap| {
            let mut out = ParamMap::new();
            out.insert("H".to_string(), Scalar::Float(0.5));
            Ok(out)
        }));

        let out = set.apply(&base()).unwrap();
        assert_eq!(out["H"], Scalar::Float(0.5));
        // Overriding keeps the key's original column position.
        assert_eq!(out.keys().next().map(String::as_str), Some("H"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = base();
        let set = DependencySet::new().with(named_dependency("add", |_: &ParamMap| {
            let mut out = ParamMap::new();
            out.insert("NEW".to_string(), Scalar::Int(1));
            Ok(out)
        }));
        let _ = set.apply(&input).unwrap();
        assert_eq!(input, base());
    }

    #[test]
    fn test_error_is_tagged_with_function_name() {
        let set = DependencySet::new()
            .with(named_dependency("fine", |_: &ParamMap| Ok(ParamMap::new())))
            .with(named_dependency("bad_wavelength", |_: &ParamMap| {
                Err("negative depth".to_string())
            }));

        let err = set.apply(&base()).unwrap_err();
        assert_eq!(err.function, "bad_wavelength");
        assert!(err.to_string().contains("negative depth"));
    }
}
