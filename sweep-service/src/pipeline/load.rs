// Load-Once Parameters
// Values loaded a single time before the sweep and broadcast to every combination

use crate::parser::models::ParamMap;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A named loader producing values shared by every combination.
///
/// Loaders run once, before any combination is processed, and see the values
/// accumulated by earlier loaders in the list. Their merged output travels
/// into each worker as an immutable broadcast input.
pub trait LoadFn: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self, loaded: &ParamMap) -> Result<ParamMap, String>;
}

/// Error raised when a loader fails; aborts the run before dispatch.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("loader '{loader}' failed: {message}")]
pub struct LoadError {
    pub loader: String,
    pub message: String,
}

/// An ordered list of loaders.
#[derive(Clone, Default)]
pub struct LoadSet {
    loaders: Vec<Arc<dyn LoadFn>>,
}

impl LoadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: Arc<dyn LoadFn>) -> Self {
        self.loaders.push(loader);
        self
    }

    pub fn push(&mut self, loader: Arc<dyn LoadFn>) {
        self.loaders.push(loader);
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Run every loader in order, folding their outputs. Later loaders
    /// override same-named keys from earlier ones.
    pub fn run(&self) -> Result<ParamMap, LoadError> {
        let mut loaded = ParamMap::new();
        for loader in &self.loaders {
            let additions = loader.load(&loaded).map_err(|message| LoadError {
                loader: loader.name().to_string(),
                message,
            })?;
            for (key, value) in additions {
                loaded.insert(key, value);
            }
        }
        Ok(loaded)
    }
}

impl fmt::Debug for LoadSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSet")
            .field("loaders", &self.names())
            .finish()
    }
}

struct ClosureLoader<F> {
    name: String,
    func: F,
}

impl<F> LoadFn for ClosureLoader<F>
where
    F: Fn(&ParamMap) -> Result<ParamMap, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, loaded: &ParamMap) -> Result<ParamMap, String> {
        (self.func)(loaded)
    }
}

/// Wrap a closure as a named loader.
pub fn named_loader<F>(name: impl Into<String>, func: F) -> Arc<dyn LoadFn>
where
    F: Fn(&ParamMap) -> Result<ParamMap, String> + Send + Sync + 'static,
{
    Arc::new(ClosureLoader {
        name: name.into(),
        func,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::Scalar;

    #[test]
    fn test_empty_set_loads_nothing() {
        assert!(LoadSet::new().run().unwrap().is_empty());
    }

    #[test]
    fn test_later_loader_sees_and_overrides_earlier() {
        let set = LoadSet::new()
            .with(named_loader("grid", |_: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert("NX".to_string(), Scalar::Int(100));
                out.insert("NY".to_string(), Scalar::Int(50));
                Ok(out)
            }))
            .with(named_loader("refine", |loaded: &ParamMap| {
                let mut out = ParamMap::new();
                out.insert(
                    "NX".to_string(),
                    Scalar::Int(loaded["NX"].as_i64().unwrap() * 2),
                );
                Ok(out)
            }));

        let loaded = set.run().unwrap();
        assert_eq!(loaded["NX"], Scalar::Int(200));
        assert_eq!(loaded["NY"], Scalar::Int(50));
    }

    #[test]
    fn test_loader_error_carries_name() {
        let set = LoadSet::new().with(named_loader("bathy_file", |_: &ParamMap| {
            Err("file not found".to_string())
        }));
        let err = set.run().unwrap_err();
        assert_eq!(err.loader, "bathy_file");
    }
}
