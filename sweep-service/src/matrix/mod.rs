// Design-Matrix Expansion
// Expands parsed parameter ranges into concrete, numbered combinations

use crate::parser::models::{ParamMap, ParamRanges};

/// A single combination: one concrete value for every parameter, tagged with
/// its 1-based position in product-iteration order.
///
/// `combo_num` is the sole join key between validation results, generated
/// artifacts and the pass/fail summaries. Combinations are never mutated
/// after generation; downstream stages build new maps from `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub combo_num: usize,
    pub values: ParamMap,
}

/// Combination generator over parsed parameter ranges.
pub struct CombinationGenerator;

impl CombinationGenerator {
    /// Total number of combinations the ranges expand to.
    pub fn count(ranges: &ParamRanges) -> usize {
        if ranges.is_empty() {
            return 0;
        }
        ranges.values().map(Vec::len).product()
    }

    /// Expand the full cartesian product.
    ///
    /// Iteration follows the standard nested-loop convention: the
    /// last-declared parameter varies fastest. The order is a contract:
    /// `combo_num = index + 1` must be reproducible for identical input,
    /// since it identifies combinations everywhere downstream. Identical
    /// value tuples reachable through different range entries are all kept.
    ///
    /// An empty parameter set, or any parameter with an empty value list,
    /// yields no combinations.
    pub fn generate(ranges: &ParamRanges) -> Vec<Combination> {
        let total = Self::count(ranges);
        if total == 0 {
            return Vec::new();
        }

        let names: Vec<&String> = ranges.keys().collect();
        let lists: Vec<&Vec<_>> = ranges.values().collect();

        let mut combinations = Vec::with_capacity(total);
        for index in 0..total {
            // Odometer decomposition, least-significant digit last.
            let mut digits = vec![0usize; lists.len()];
            let mut remainder = index;
            for (j, list) in lists.iter().enumerate().rev() {
                digits[j] = remainder % list.len();
                remainder /= list.len();
            }

            let mut values = ParamMap::with_capacity(names.len());
            for (j, name) in names.iter().enumerate() {
                values.insert((*name).clone(), lists[j][digits[j]].clone());
            }

            combinations.push(Combination {
                combo_num: index + 1,
                values,
            });
        }

        combinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::Scalar;
    use crate::parser::TabularParser;

    fn ranges(input: &str) -> ParamRanges {
        TabularParser::parse_str(input).unwrap()
    }

    #[test]
    fn test_count_is_product_of_list_lengths() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nA,,0,1,4\nB,,0,1,3\nC,7,,,\n");
        assert_eq!(CombinationGenerator::count(&ranges), 12);
        assert_eq!(CombinationGenerator::generate(&ranges).len(), 12);
    }

    #[test]
    fn test_combo_nums_are_complete_and_ordered() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nA,,0,1,5\nB,,0,1,2\n");
        let combos = CombinationGenerator::generate(&ranges);
        let nums: Vec<usize> = combos.iter().map(|c| c.combo_num).collect();
        assert_eq!(nums, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_last_declared_parameter_varies_fastest() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nH,1.0,,,\nS,,0,1,3\n");
        let combos = CombinationGenerator::generate(&ranges);

        assert_eq!(combos.len(), 3);
        for (i, expected_s) in [0.0, 0.5, 1.0].iter().enumerate() {
            assert_eq!(combos[i].values["H"], Scalar::Float(1.0));
            assert_eq!(combos[i].values["S"], Scalar::Float(*expected_s));
            assert_eq!(combos[i].combo_num, i + 1);
        }
    }

    #[test]
    fn test_two_varying_parameters_order() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nA,,0,1,2\nB,,0,1,2\n");
        let combos = CombinationGenerator::generate(&ranges);
        let pairs: Vec<(f64, f64)> = combos
            .iter()
            .map(|c| {
                (
                    c.values["A"].as_f64().unwrap(),
                    c.values["B"].as_f64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_duplicate_values_are_kept() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nA,1,,,\nA,1,,,\n");
        let combos = CombinationGenerator::generate(&ranges);
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].values, combos[1].values);
        assert_ne!(combos[0].combo_num, combos[1].combo_num);
    }

    #[test]
    fn test_empty_ranges_yield_nothing() {
        assert!(CombinationGenerator::generate(&ParamRanges::new()).is_empty());
    }

    #[test]
    fn test_generation_is_reproducible() {
        let ranges = ranges("VAR,CON,LO,HI,NUM\nA,,0,1,3\nB,,5,6,2\n");
        let first = CombinationGenerator::generate(&ranges);
        let second = CombinationGenerator::generate(&ranges);
        assert_eq!(first, second);
    }
}
