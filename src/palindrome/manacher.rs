//! Manacher's linear-time longest palindromic substring search.
//!
//! The text is case-folded and interleaved with a gap symbol between every
//! character and at both ends, then bracketed by two distinct sentinels:
//!
//! ```text
//! "abba" => Start Gap a Gap b Gap b Gap a Gap End
//! ```
//!
//! Odd and even length palindromes are then both centered on a single
//! position, and expansion always stops at the sentinels.

use super::{FinderError, PalindromeFinder, PalindromeSolution};
use tracing::trace;

/// Lower-case form of a single character.
///
/// `char::to_lowercase` yields at most three chars, so one character always
/// occupies one position regardless of its folded width.
type Folded = [char; 3];

/// One position of the interleaved sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Start,
    End,
    Gap,
    Char(Folded),
}

/// [`PalindromeFinder`] backed by Manacher's algorithm.
///
/// Matching is case-insensitive; the returned substring keeps the casing of
/// the original text. Whitespace and punctuation take part in matching like
/// any other character.
///
/// # Examples
///
/// ```
/// use palindromes::palindrome::{ManacherFinder, PalindromeFinder};
///
/// let solution = ManacherFinder.find("I am Anna").expect("search is total");
/// assert_eq!(solution.text(), "Anna");
/// assert_eq!(solution.length(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ManacherFinder;

impl PalindromeFinder for ManacherFinder {
    fn find(&self, text: &str) -> Result<PalindromeSolution, FinderError> {
        Ok(longest_palindrome(text))
    }
}

/// Returns the leftmost longest palindromic substring of `text`.
///
/// Runs in O(n) time and space over the number of characters. Empty input
/// yields the empty solution; any other input yields at least one character.
#[must_use]
pub fn longest_palindrome(text: &str) -> PalindromeSolution {
    let chars: Vec<char> = text.chars().collect();
    let symbols = interleave(&chars);
    let radii = radii(&symbols);

    let (center, radius) = widest_center(&radii);
    let solution = if radius == 0 {
        PalindromeSolution::empty()
    } else {
        let start = original_offset(center, radius);
        PalindromeSolution::new(chars.iter().skip(start).take(radius).collect::<String>())
    };

    trace!(
        text_length = chars.len(),
        palindrome_length = solution.length(),
        "longest palindrome located"
    );
    solution
}

fn fold(ch: char) -> Folded {
    let mut folded = ['\0'; 3];
    for (slot, lower) in folded.iter_mut().zip(ch.to_lowercase()) {
        *slot = lower;
    }
    folded
}

fn interleave(chars: &[char]) -> Vec<Symbol> {
    let mut symbols = Vec::with_capacity(chars.len() * 2 + 3);
    symbols.push(Symbol::Start);
    for &ch in chars {
        symbols.push(Symbol::Gap);
        symbols.push(Symbol::Char(fold(ch)));
    }
    symbols.push(Symbol::Gap);
    symbols.push(Symbol::End);
    symbols
}

/// Computes the palindrome radius centered at every position.
///
/// A radius in the interleaved sequence equals the length of the matching
/// palindrome in the original text.
fn radii(symbols: &[Symbol]) -> Vec<usize> {
    let mut radii = vec![0; symbols.len()];
    let mut center: usize = 0;
    let mut right: usize = 0;

    for position in 1..symbols.len().saturating_sub(1) {
        let mut radius = 0;
        if right > position {
            // Seed from the mirror image inside the rightmost palindrome.
            let mirrored = (2 * center)
                .checked_sub(position)
                .and_then(|mirror| radii.get(mirror))
                .copied()
                .unwrap_or(0);
            radius = mirrored.min(right - position);
        }

        while symbols_match(symbols, position, radius + 1) {
            radius += 1;
        }

        if let Some(slot) = radii.get_mut(position) {
            *slot = radius;
        }
        if position + radius > right {
            center = position;
            right = position + radius;
        }
    }

    radii
}

fn symbols_match(symbols: &[Symbol], center: usize, offset: usize) -> bool {
    let Some(left) = center.checked_sub(offset) else {
        return false;
    };
    match (symbols.get(left), symbols.get(center + offset)) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

/// Returns the first center attaining the maximum radius.
fn widest_center(radii: &[usize]) -> (usize, usize) {
    let mut best = (0, 0);
    for (center, &radius) in radii.iter().enumerate() {
        if radius > best.1 {
            best = (center, radius);
        }
    }
    best
}

/// Maps a center and radius back to a char offset in the original text.
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "the left edge of a palindrome always sits on an even interleaved offset"
)]
const fn original_offset(center: usize, radius: usize) -> usize {
    center.saturating_sub(1).saturating_sub(radius) / 2
}
