//! Coarse free-text matching for fill-in-blank and real-world answers.
//!
//! Case and surrounding whitespace are ignored. There is no stemming,
//! synonym handling or edit distance: "recursive" does not match
//! "recursion" unless one contains the other or enough words overlap.

/// Which rule accepted a pair of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    WordOverlap,
    None,
}

impl MatchKind {
    pub fn is_match(self) -> bool {
        self != Self::None
    }
}

/// Fraction of the shorter word sequence that must appear in the other one.
pub const WORD_OVERLAP_THRESHOLD: f64 = 0.5;

/// Whether `user` earns credit against `reference`.
pub fn fuzzy_match(user: Option<&str>, reference: Option<&str>) -> bool {
    classify(user, reference).is_match()
}

/// Run the rules in order and report the first one that accepts.
pub fn classify(user: Option<&str>, reference: Option<&str>) -> MatchKind {
    let (Some(user), Some(reference)) = (user, reference) else {
        return MatchKind::None;
    };
    let user = user.trim().to_lowercase();
    let reference = reference.trim().to_lowercase();
    if user.is_empty() || reference.is_empty() {
        return MatchKind::None;
    }

    if user == reference {
        return MatchKind::Exact;
    }
    if user.contains(&reference) || reference.contains(&user) {
        return MatchKind::Substring;
    }

    let user_words: Vec<&str> = user.split_whitespace().collect();
    let reference_words: Vec<&str> = reference.split_whitespace().collect();
    if word_overlap_ok(&user_words, &reference_words) {
        return MatchKind::WordOverlap;
    }
    MatchKind::None
}

/// Count of `user` words that occur anywhere in `reference`.
///
/// Membership only: a word repeated in `user` counts every time it occurs
/// as long as `reference` contains it once.
pub fn word_overlap(user: &[&str], reference: &[&str]) -> usize {
    user.iter().filter(|w| reference.contains(w)).count()
}

fn word_overlap_ok(user: &[&str], reference: &[&str]) -> bool {
    let overlap = word_overlap(user, reference);
    let shorter_len = user.len().min(reference.len());
    overlap as f64 >= shorter_len as f64 * WORD_OVERLAP_THRESHOLD
}
