//! Random names and notes for demo data.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "guard", "mount", "back", "side", "half", "closed", "open", "butterfly", "spider", "lasso",
    "collar", "sleeve", "wrist", "ankle", "knee", "hip", "shoulder", "frame", "underhook",
    "overhook", "crossface", "whizzer", "shrimp", "bridge", "post", "base", "pressure", "angle",
    "grip", "sweep", "pass", "escape", "choke", "lock", "turn", "roll", "sit", "stand",
    "pull", "push", "drive", "switch", "float", "hook", "clamp", "stack", "spin", "reverse",
];

pub fn word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("guard")
}

/// One to three capitalised words.
pub fn name<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| capitalise(word(rng)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A short sentence ending in a full stop.
pub fn sentence<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(4..=10);
    let words: Vec<&str> = (0..count).map(|_| word(rng)).collect();
    format!("{}.", capitalise(&words.join(" ")))
}

pub fn sentences<R: Rng>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count).map(|_| sentence(rng)).collect()
}

/// Up to `count` distinct items from `pool`.
pub fn pick<R: Rng>(rng: &mut R, pool: &[String], count: usize) -> Vec<String> {
    pool.choose_multiple(rng, count).cloned().collect()
}

/// Any element of `pool` other than `exclude`.
pub fn other<R: Rng>(rng: &mut R, pool: &[String], exclude: &str) -> Option<String> {
    let candidates: Vec<&String> = pool.iter().filter(|id| *id != exclude).collect();
    candidates.choose(rng).map(|id| (*id).clone())
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn names_and_sentences_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let name = name(&mut rng);
            assert!(!name.is_empty());
            assert!(name.chars().next().unwrap().is_uppercase());

            let sentence = sentence(&mut rng);
            assert!(sentence.ends_with('.'));
            assert!(sentence.split(' ').count() >= 4);
        }
    }

    #[test]
    fn pick_is_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<String> = (0..10).map(|i| format!("t{}", i)).collect();

        let mut picked = pick(&mut rng, &pool, 2);
        assert_eq!(picked.len(), 2);
        picked.dedup();
        assert_eq!(picked.len(), 2);

        assert_eq!(pick(&mut rng, &pool[..1], 2).len(), 1);
    }

    #[test]
    fn other_never_returns_the_excluded_id() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = vec!["a".to_string(), "b".to_string()];
        for _ in 0..20 {
            assert_eq!(other(&mut rng, &pool, "a").as_deref(), Some("b"));
        }
        assert_eq!(other(&mut rng, &pool[..1], "a"), None);
    }
}
