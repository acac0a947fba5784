// Filter Pipeline
// Ordered predicates that classify combinations as valid or invalid

use crate::parser::models::ParamMap;

use std::fmt;
use std::sync::Arc;

/// A named predicate-with-explanation over a resolved combination.
///
/// Returning `Some(explanation)` marks the combination invalid; the
/// explanation map becomes the failure payload. Returning `None` passes.
/// Filters must be deterministic given their input so re-running validation
/// is idempotent.
pub trait FilterFn: Send + Sync {
    /// Identity recorded in failure payloads.
    fn name(&self) -> &str;

    /// Check a combination, returning an explanation on failure.
    fn check(&self, values: &ParamMap) -> Option<ParamMap>;
}

/// The first failing filter's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterFailure {
    /// Name of the filter that rejected the combination.
    pub filter: String,
    /// The filter's explanation map.
    pub explanation: ParamMap,
}

/// An ordered list of filters, evaluated with short-circuit semantics.
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: Vec<Arc<dyn FilterFn>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter (builder form).
    pub fn with(mut self, filter: Arc<dyn FilterFn>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Arc<dyn FilterFn>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Evaluate filters in order; the first failure wins. An empty set
    /// always passes.
    pub fn apply(&self, values: &ParamMap) -> Option<FilterFailure> {
        for filter in &self.filters {
            if let Some(explanation) = filter.check(values) {
                return Some(FilterFailure {
                    filter: filter.name().to_string(),
                    explanation,
                });
            }
        }
        None
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("filters", &self.names())
            .finish()
    }
}

struct ClosureFilter<F> {
    name: String,
    func: F,
}

impl<F> FilterFn for ClosureFilter<F>
where
    F: Fn(&ParamMap) -> Option<ParamMap> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, values: &ParamMap) -> Option<ParamMap> {
        (self.func)(values)
    }
}

/// Wrap a closure as a named filter.
pub fn named_filter<F>(name: impl Into<String>, func: F) -> Arc<dyn FilterFn>
where
    F: Fn(&ParamMap) -> Option<ParamMap> + Send + Sync + 'static,
{
    Arc::new(ClosureFilter {
        name: name.into(),
        func,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CombinationGenerator;
    use crate::parser::models::Scalar;
    use crate::parser::TabularParser;

    fn reason(text: &str) -> ParamMap {
        let mut m = ParamMap::new();
        m.insert("REASON".to_string(), Scalar::Text(text.to_string()));
        m
    }

    fn s_too_high() -> Arc<dyn FilterFn> {
        named_filter("s_too_high", |v: &ParamMap| {
            if v["S"].as_f64().unwrap_or(0.0) > 0.8 {
                Some(reason("S too high"))
            } else {
                None
            }
        })
    }

    #[test]
    fn test_empty_set_always_passes() {
        let set = FilterSet::new();
        assert!(set.apply(&ParamMap::new()).is_none());
    }

    #[test]
    fn test_scenario_two_pass_one_fail() {
        // H constant, S swept over three samples; only S=1.0 trips the filter.
        let ranges =
            TabularParser::parse_str("VAR,CON,LO,HI,NUM\nH,1.0,,,\nS,,0,1,3\n").unwrap();
        let combos = CombinationGenerator::generate(&ranges);
        let set = FilterSet::new().with(s_too_high());

        let verdicts: Vec<Option<FilterFailure>> =
            combos.iter().map(|c| set.apply(&c.values)).collect();

        assert!(verdicts[0].is_none());
        assert!(verdicts[1].is_none());
        let failure = verdicts[2].as_ref().unwrap();
        assert_eq!(failure.filter, "s_too_high");
        assert_eq!(
            failure.explanation["REASON"],
            Scalar::Text("S too high".to_string())
        );
        assert_eq!(combos[2].combo_num, 3);
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let set = FilterSet::new()
            .with(named_filter("always_fails", |_: &ParamMap| {
                Some(ParamMap::new())
            }))
            .with(named_filter("never_reached", |_: &ParamMap| {
                panic!("second filter must not run")
            }));

        let failure = set.apply(&ParamMap::new()).unwrap();
        assert_eq!(failure.filter, "always_fails");
    }

    #[test]
    fn test_reapplication_is_idempotent() {
        let mut values = ParamMap::new();
        values.insert("S".to_string(), Scalar::Float(0.9));
        let set = FilterSet::new().with(s_too_high());

        let first = set.apply(&values);
        let second = set.apply(&values);
        assert_eq!(first, second);
    }
}
