use itertools::{Either, Itertools};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Value;

/// All three-valued patterns of the given size, in lexicographic order of `Value::ALL`
///
/// Patterns are generated on the fly: there are `3^nb_inputs` of them.
pub fn exhaustive_patterns(nb_inputs: usize) -> impl Iterator<Item = Vec<Value>> {
    if nb_inputs == 0 {
        return Either::Left(std::iter::once(Vec::new()));
    }
    Either::Right(
        (0..nb_inputs)
            .map(|_| Value::ALL.iter().copied())
            .multi_cartesian_product(),
    )
}

/// Number of exhaustive patterns of the given size, if it fits in a `usize`
pub fn nb_exhaustive_patterns(nb_inputs: usize) -> Option<usize> {
    let exp = u32::try_from(nb_inputs).ok()?;
    Value::ALL.len().checked_pow(exp)
}

/// All binary patterns of the given size; bit i of the pattern index gives input i
pub fn binary_patterns(nb_inputs: usize) -> Vec<Vec<Value>> {
    assert!(nb_inputs < 32);
    (0..1usize << nb_inputs)
        .map(|mask| {
            (0..nb_inputs)
                .map(|i| Value::from((mask >> i) & 1 != 0))
                .collect()
        })
        .collect()
}

/// Generate random three-valued patterns
pub fn generate_random_patterns(nb_inputs: usize, nb_patterns: usize, seed: u64) -> Vec<Vec<Value>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ret = Vec::new();
    for _ in 0..nb_patterns {
        let mut p = Vec::new();
        for _ in 0..nb_inputs {
            p.push(Value::ALL[rng.gen_range(0..Value::ALL.len())]);
        }
        ret.push(p);
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive() {
        assert_eq!(
            exhaustive_patterns(0).collect::<Vec<_>>(),
            vec![Vec::<Value>::new()]
        );
        assert_eq!(exhaustive_patterns(1).count(), 3);
        let p: Vec<_> = exhaustive_patterns(3).collect();
        assert_eq!(p.len(), 27);
        assert_eq!(p[0], vec![Value::Low; 3]);
        assert_eq!(p[26], vec![Value::Unknown; 3]);
        assert!(p.iter().all_unique());
        for w in 0..6 {
            assert_eq!(nb_exhaustive_patterns(w), Some(exhaustive_patterns(w).count()));
        }
    }

    #[test]
    fn test_exhaustive_wide() {
        // Far too many patterns to store, but the first ones come immediately
        let mut it = exhaustive_patterns(64);
        assert_eq!(it.next(), Some(vec![Value::Low; 64]));
        assert_eq!(it.take(4).count(), 4);
        assert_eq!(nb_exhaustive_patterns(40), Some(3usize.pow(40)));
        assert_eq!(nb_exhaustive_patterns(64), None);
        assert_eq!(nb_exhaustive_patterns(usize::MAX), None);
    }

    #[test]
    fn test_binary() {
        let p = binary_patterns(2);
        assert_eq!(
            p,
            vec![
                vec![Value::Low, Value::Low],
                vec![Value::High, Value::Low],
                vec![Value::Low, Value::High],
                vec![Value::High, Value::High],
            ]
        );
    }

    #[test]
    fn test_random() {
        let p = generate_random_patterns(5, 100, 1);
        assert_eq!(p.len(), 100);
        assert!(p.iter().all(|v| v.len() == 5));
        assert_eq!(p, generate_random_patterns(5, 100, 1));
        for v in Value::ALL {
            assert!(p.iter().flatten().any(|x| *x == v));
        }
    }
}
