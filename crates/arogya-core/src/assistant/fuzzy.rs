//! Fuzzy string matching using normalized Levenshtein distance.

/// Default minimum score for [`fuzzy_match`].
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 80;

/// Edit distance between two char sequences (insert, delete, substitute all cost 1).
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Case-insensitive similarity on a 0–100 scale; 100 means equal.
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 100;
    }
    let distance = levenshtein(&a, &b);
    let score = 100.0 * (1.0 - distance as f64 / longest as f64);
    score.round() as u8
}

/// Candidates scoring at least `threshold` against `query`, best first.
/// Equal scores keep the candidates' original order.
pub fn fuzzy_match<S: AsRef<str>>(query: &str, candidates: &[S], threshold: u8) -> Vec<(String, u8)> {
    let mut matches: Vec<(String, u8)> = candidates
        .iter()
        .map(|c| (c.as_ref(), similarity_ratio(query, c.as_ref())))
        .filter(|(_, score)| *score >= threshold)
        .map(|(c, score)| (c.to_string(), score))
        .collect();
    // sort_by is stable
    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches
}
