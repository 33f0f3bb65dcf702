//! Commit message heuristic for test refactoring intent.

use once_cell::sync::Lazy;
use regex::Regex;

static TEST_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btest\w*\b").expect("valid regex"));
static REFACTOR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\brefactor\w*\b").expect("valid regex"));

/// True when the lower-cased message holds a word starting with `test` and
/// a word starting with `refactor`, in any order.
///
/// Both words must start at a word boundary, so `retest` does not count and
/// neither does the `refactor` inside `testrefactor`.
pub fn matches_refactor_intent(message: &str) -> bool {
    let lower = message.to_lowercase();
    TEST_WORD.is_match(&lower) && REFACTOR_WORD.is_match(&lower)
}
