use clap::ValueEnum;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::model::DatasetDocument;

/// How rows are permuted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShuffleAlgorithm {
    /// Shrinking-range Fisher-Yates; every permutation equally likely.
    #[default]
    FisherYates,
    /// Swap each position with a uniformly drawn index over the whole slice.
    /// Not uniform over permutations; reproduces the legacy script's output
    /// distribution.
    FullRangeSwap,
}

/// Permute `rows` in place with the given algorithm.
pub fn shuffle_slice<T, R: Rng + ?Sized>(rows: &mut [T], algorithm: ShuffleAlgorithm, rng: &mut R) {
    match algorithm {
        ShuffleAlgorithm::FisherYates => rows.shuffle(rng),
        ShuffleAlgorithm::FullRangeSwap => {
            let n = rows.len();
            if n == 0 {
                return;
            }
            for i in 0..n {
                let j = rng.gen_range(0..n);
                rows.swap(i, j);
            }
        }
    }
}

/// Return `doc` with its rows in random order.
///
/// A fixed `seed` makes the order reproducible; `None` seeds from OS entropy.
pub fn shuffle(mut doc: DatasetDocument, algorithm: ShuffleAlgorithm, seed: Option<u64>) -> DatasetDocument {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!("shuffling {} rows with {algorithm:?} (seed {seed:?})", doc.len());
    shuffle_slice(&mut doc.data, algorithm, &mut rng);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn numbered(n: usize) -> DatasetDocument {
        DatasetDocument::new(
            vec!["id".into()],
            vec!["A".into(), "B".into()],
            (0..n).map(|i| Row::new(i % 2, vec![i as f64])).collect(),
        )
        .unwrap()
    }

    fn ids(doc: &DatasetDocument) -> Vec<f64> {
        doc.data.iter().map(|r| r.columns[0]).collect()
    }

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn preserves_rows_for_both_algorithms() {
        for algorithm in [ShuffleAlgorithm::FisherYates, ShuffleAlgorithm::FullRangeSwap] {
            let input = numbered(50);
            let out = shuffle(input.clone(), algorithm, Some(7));
            assert_eq!(out.len(), input.len());
            assert_eq!(sorted(ids(&out)), sorted(ids(&input)));
            // each id keeps its own label
            assert!(out.data.iter().all(|r| r.label == (r.columns[0] as usize) % 2));
            assert_eq!(out.result_map, input.result_map);
        }
    }

    #[test]
    fn same_seed_same_order() {
        let a = shuffle(numbered(30), ShuffleAlgorithm::FisherYates, Some(42));
        let b = shuffle(numbered(30), ShuffleAlgorithm::FisherYates, Some(42));
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn seeded_shuffle_moves_rows() {
        let input = numbered(30);
        let out = shuffle(input.clone(), ShuffleAlgorithm::FisherYates, Some(1));
        assert_ne!(ids(&out), ids(&input));
    }

    #[test]
    fn tiny_datasets_are_unchanged() {
        for algorithm in [ShuffleAlgorithm::FisherYates, ShuffleAlgorithm::FullRangeSwap] {
            assert_eq!(shuffle(numbered(0), algorithm, None), numbered(0));
            assert_eq!(shuffle(numbered(1), algorithm, None), numbered(1));
        }
    }

    #[test]
    fn full_range_swap_on_slice() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut v: Vec<u32> = (0..10).collect();
        shuffle_slice(&mut v, ShuffleAlgorithm::FullRangeSwap, &mut rng);
        v.sort_unstable();
        assert_eq!(v, (0..10).collect::<Vec<_>>());
    }
}
