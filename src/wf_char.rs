use std::collections::HashSet;
use std::sync::LazyLock;

// Character-set constants
pub(crate) const VOWELS: &str = "aeiou";
pub(crate) const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";

/// Variable names are restricted to A–R; S–Z are reserved.
pub(crate) const VARIABLE_CHARS: &str = "ABCDEFGHIJKLMNOPQR";

static VOWEL_SET: LazyLock<HashSet<char>> = LazyLock::new(|| VOWELS.chars().collect());
static CONSONANT_SET: LazyLock<HashSet<char>> = LazyLock::new(|| CONSONANTS.chars().collect());

pub(crate) trait WfChar {
    fn is_vowel(&self) -> bool;
    fn is_consonant(&self) -> bool;
    fn is_variable(&self) -> bool;
}

impl WfChar for char {
    fn is_vowel(&self) -> bool {
        VOWEL_SET.contains(self)
    }
    fn is_consonant(&self) -> bool {
        CONSONANT_SET.contains(self)
    }
    fn is_variable(&self) -> bool {
        VARIABLE_CHARS.contains(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_vowel() {
        assert!('a'.is_vowel());
        assert!('e'.is_vowel());
        assert!('i'.is_vowel());
        assert!('o'.is_vowel());
        assert!('u'.is_vowel());
    }

    #[test]
    fn test_y_is_a_consonant() {
        // the 21-letter consonant set includes y
        assert!(!'y'.is_vowel());
        assert!('y'.is_consonant());
    }

    #[test]
    fn test_is_not_vowel() {
        assert!(!'b'.is_vowel());
        assert!(!'z'.is_vowel());
        assert!(!'A'.is_vowel()); // uppercase
        assert!(!'1'.is_vowel());
        assert!(!'@'.is_vowel());
    }

    #[test]
    fn test_is_consonant() {
        assert!('b'.is_consonant());
        assert!('c'.is_consonant());
        assert!('z'.is_consonant());
    }

    #[test]
    fn test_is_not_consonant() {
        assert!(!'a'.is_consonant());
        assert!(!'e'.is_consonant());
        assert!(!'B'.is_consonant()); // uppercase
        assert!(!'1'.is_consonant());
        assert!(!'.'.is_consonant());
    }

    #[test]
    fn test_vowel_consonant_mutual_exclusivity() {
        for c in 'a'..='z' {
            let is_v = c.is_vowel();
            let is_c = c.is_consonant();
            assert_ne!(is_v, is_c, "char '{c}' should be either vowel or consonant, not both or neither");
        }
    }

    #[test]
    fn test_is_variable() {
        assert!('A'.is_variable());
        assert!('M'.is_variable());
        assert!('R'.is_variable());
    }

    #[test]
    fn test_is_not_variable() {
        assert!(!'S'.is_variable()); // past R
        assert!(!'Z'.is_variable());
        assert!(!'a'.is_variable()); // lowercase
        assert!(!'1'.is_variable());
        assert!(!'@'.is_variable());
    }

    #[test]
    fn test_alphabet_constants() {
        assert_eq!(VOWELS.len(), 5); // a e i o u
        assert_eq!(CONSONANTS.len(), 21); // 26 - 5
        assert_eq!(VARIABLE_CHARS.len(), 18); // A through R
    }
}
