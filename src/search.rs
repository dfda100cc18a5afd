// Fuzzy lookup for interactive pickers
//
// Ranks catalog rows against a typed search term so a human can narrow a
// brand/category/gear choice down to an id. Partial similarity: the term is
// slid across the candidate and scored by edit distance, so "hill" still
// finds "Hilleberg Nallo". Domain entities never call this.

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i64,
    pub label: String,
    /// Similarity in percent (0-100).
    pub score: u8,
}

/// Default cutoff below which a candidate is not worth showing.
pub const DEFAULT_MIN_SCORE: u8 = 60;

/// Default number of results offered to the user.
pub const DEFAULT_LIMIT: usize = 10;

/// Rank `(id, label)` candidates against `term`.
///
/// Candidates scoring below `min_score` are dropped; the rest come back
/// sorted by descending score (ties keep candidate order) and truncated to
/// `limit`. An empty term matches nothing.
pub fn rank(
    term: &str,
    candidates: impl IntoIterator<Item = (i64, String)>,
    min_score: u8,
    limit: usize,
) -> Vec<SearchHit> {
    let term = normalize(term);
    if term.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|(id, label)| {
            let score = partial_similarity(&term, &normalize(&label));
            if score >= min_score {
                Some(SearchHit { id, label, score })
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

/// Lowercase and collapse runs of whitespace.
fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Partial similarity in percent: the best edit-distance ratio of the
/// shorter string against every equally long window of the longer one.
/// A substring therefore scores 100 even when the candidate is much longer.
fn partial_similarity(a: &str, b: &str) -> u8 {
    let (short, long): (Vec<char>, Vec<char>) = if a.chars().count() <= b.chars().count() {
        (a.chars().collect(), b.chars().collect())
    } else {
        (b.chars().collect(), a.chars().collect())
    };

    if short.is_empty() {
        return 0;
    }

    let window = short.len();
    let mut best = 0u8;
    for start in 0..=(long.len() - window) {
        let distance = levenshtein(&short, &long[start..start + window]);
        let score = (100 * (window - distance.min(window)) / window) as u8;
        best = best.max(score);
        if best == 100 {
            break;
        }
    }
    best
}

/// Levenshtein distance over char slices, two-row dynamic programming.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1) // deletion
                .min(current[j] + 1); // insertion
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
