//! Fuzzy string scores used to match free-text place names from the survey against the
//! census settlement names. Scores are on a 0 to 100 scale.

use itertools::Itertools;

const TOKEN_SORT_WEIGHT: f64 = 0.95;

/// Similarity based on the insertion/deletion edit distance:
/// `(|a| + |b| - indel(a, b)) / (|a| + |b|) * 100`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let len_sum = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let indel = len_sum - 2 * longest_common_subsequence(&a, &b);
    (len_sum - indel) as f64 / len_sum as f64 * 100.0
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            current[j + 1] = if a_char == b_char {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Lowercases, replaces everything but letters and digits with spaces and squeezes runs of
/// whitespace.
pub fn preprocess(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

fn token_sort(value: &str) -> String {
    value.split_whitespace().sorted().join(" ")
}

/// Best of the plain ratio and a slightly discounted word-order-insensitive ratio.
pub fn match_score(a: &str, b: &str) -> f64 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let plain = ratio(&a, &b);
    let sorted = ratio(&token_sort(&a), &token_sort(&b)) * TOKEN_SORT_WEIGHT;
    plain.max(sorted)
}

/// The candidate scoring highest against the query, provided it reaches `cutoff`. The first
/// candidate wins ties.
pub fn best_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = match_score(query, candidate);
        if score < cutoff {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}
