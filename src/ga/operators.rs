//! Destination crossover and mutation.

use rand::Rng;

/// Single-parent crossover: the child is one of the two parents, each with
/// probability 1/2.
pub fn crossover<'a, R: Rng>(parent1: &'a str, parent2: &'a str, rng: &mut R) -> &'a str {
    if rng.random::<f64>() < 0.5 {
        parent1
    } else {
        parent2
    }
}

/// Random-reset mutation: with probability `rate`, the destination is
/// redrawn uniformly from `destinations`.
pub fn mutate<R: Rng>(individual: &str, destinations: &[String], rate: f64, rng: &mut R) -> String {
    if !destinations.is_empty() && rng.random::<f64>() < rate {
        destinations[rng.random_range(0..destinations.len())].clone()
    } else {
        individual.to_owned()
    }
}

/// Two distinct parent slots drawn without replacement (the same parent
/// twice when only one is available).
pub fn choose_pair<'a, R: Rng>(parents: &'a [String], rng: &mut R) -> Option<(&'a str, &'a str)> {
    match parents.len() {
        0 => None,
        1 => Some((&parents[0], &parents[0])),
        n => {
            let first = rng.random_range(0..n);
            let mut second = rng.random_range(0..n - 1);
            if second >= first {
                second += 1;
            }
            Some((&parents[first], &parents[second]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn cities() -> Vec<String> {
        vec!["Seattle".into(), "NYC".into(), "Denver".into()]
    }

    #[test]
    fn test_crossover_returns_a_parent() {
        let mut rng = create_rng(42);
        let mut seen = [false; 2];
        for _ in 0..100 {
            match crossover("A", "B", &mut rng) {
                "A" => seen[0] = true,
                "B" => seen[1] = true,
                other => panic!("unexpected child {other}"),
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_mutation_rates() {
        let mut rng = create_rng(42);
        for _ in 0..50 {
            assert_eq!(mutate("Austin", &cities(), 0.0, &mut rng), "Austin");
            assert!(cities().contains(&mutate("Austin", &cities(), 1.0, &mut rng)));
        }
    }

    #[test]
    fn test_pair_is_distinct() {
        let mut rng = create_rng(42);
        let parents = cities();
        for _ in 0..100 {
            let (a, b) = choose_pair(&parents, &mut rng).unwrap();
            assert_ne!(a, b);
        }
        assert_eq!(choose_pair(&parents[..1], &mut rng), Some(("Seattle", "Seattle")));
        assert_eq!(choose_pair(&[], &mut rng), None);
    }
}
