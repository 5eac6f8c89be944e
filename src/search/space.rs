//! Indexable candidate space.
//!
//! Pattern mode maps an index to a candidate by treating the wildcard slots as
//! the digits of a base-`charset.len()` number. Slots are read left to right and
//! the leftmost wildcard is the least-significant digit, so with charset `ab`
//! and pattern `??` the order is `aa`, `ba`, `ab`, `bb`.

use crate::error::{Result, SearchError};
use crate::search::config::{parse_charset, SearchConfig, Slot, DEFAULT_CHARSET};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
enum Source {
    Pattern { charset: Vec<char>, slots: Vec<Slot> },
    Dictionary(Arc<Vec<String>>),
}

/// Finite, indexable set of candidate passphrases
#[derive(Debug, Clone)]
pub struct SearchSpace {
    source: Source,
    size: u64,
}

impl SearchSpace {
    /// Build the space described by `config`.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        if let Some(words) = &config.dictionary {
            if config.pattern.is_some() {
                return Err(SearchError::PatternWithDictionary);
            }
            if config.charset.is_some() {
                warn!("charset is ignored in dictionary mode");
            }
            return Ok(Self::dictionary(Arc::clone(words)));
        }

        let charset = parse_charset(config.charset.as_deref().unwrap_or(DEFAULT_CHARSET))?;
        let slots = config.resolve_slots()?;
        Self::pattern(charset, slots)
    }

    /// Pattern-mode space; fails if `charset.len() ^ wildcards` exceeds `u64`.
    pub fn pattern(charset: Vec<char>, slots: Vec<Slot>) -> Result<Self> {
        if charset.is_empty() {
            return Err(SearchError::EmptyCharset);
        }
        let wildcards = slots.iter().filter(|s| s.is_wildcard()).count();
        let size = u32::try_from(wildcards)
            .ok()
            .and_then(|exp| (charset.len() as u64).checked_pow(exp))
            .ok_or(SearchError::SpaceOverflow {
                charset: charset.len(),
                wildcards,
            })?;

        Ok(Self {
            source: Source::Pattern { charset, slots },
            size,
        })
    }

    pub fn dictionary(words: Arc<Vec<String>>) -> Self {
        let size = words.len() as u64;
        Self {
            source: Source::Dictionary(words),
            size,
        }
    }

    /// Number of candidates in the space
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Dictionary length in dictionary mode
    pub fn dictionary_len(&self) -> Option<u64> {
        match &self.source {
            Source::Dictionary(words) => Some(words.len() as u64),
            Source::Pattern { .. } => None,
        }
    }

    pub fn charset(&self) -> Option<&[char]> {
        match &self.source {
            Source::Pattern { charset, .. } => Some(charset),
            Source::Dictionary(_) => None,
        }
    }

    pub fn slots(&self) -> Option<&[Slot]> {
        match &self.source {
            Source::Pattern { slots, .. } => Some(slots),
            Source::Dictionary(_) => None,
        }
    }

    /// Candidate at `index`, or `None` past the end of the space.
    pub fn candidate_at(&self, index: u64) -> Option<String> {
        let mut out = String::new();
        self.write_candidate(index, &mut out).then_some(out)
    }

    /// Write the candidate at `index` into `out`, reusing its allocation.
    ///
    /// Returns false if `index` is out of range.
    pub fn write_candidate(&self, index: u64, out: &mut String) -> bool {
        if index >= self.size {
            return false;
        }
        out.clear();
        match &self.source {
            Source::Dictionary(words) => out.push_str(&words[index as usize]),
            Source::Pattern { charset, slots } => {
                let base = charset.len() as u64;
                let mut rest = index;
                for slot in slots {
                    match slot {
                        Slot::Literal(c) => out.push(*c),
                        Slot::Wildcard => {
                            out.push(charset[(rest % base) as usize]);
                            rest /= base;
                        }
                    }
                }
            }
        }
        true
    }

    /// Index of `candidate`, the inverse of [`candidate_at`](Self::candidate_at).
    ///
    /// Dictionary mode returns the first matching position.
    pub fn index_of(&self, candidate: &str) -> Option<u64> {
        match &self.source {
            Source::Dictionary(words) => words
                .iter()
                .position(|w| w == candidate)
                .map(|p| p as u64),
            Source::Pattern { charset, slots } => {
                let chars: Vec<char> = candidate.chars().collect();
                if chars.len() != slots.len() {
                    return None;
                }
                let base = charset.len() as u64;
                let mut index = 0u64;
                // Most-significant digit is the rightmost wildcard.
                for (slot, c) in slots.iter().zip(&chars).rev() {
                    match slot {
                        Slot::Literal(lit) if lit == c => {}
                        Slot::Literal(_) => return None,
                        Slot::Wildcard => {
                            let digit = charset.iter().position(|x| x == c)? as u64;
                            index = index * base + digit;
                        }
                    }
                }
                Some(index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::parse_pattern;

    fn pattern_space(charset: &str, pattern: &str) -> SearchSpace {
        SearchSpace::pattern(charset.chars().collect(), parse_pattern(pattern)).unwrap()
    }

    #[test]
    fn test_first_wildcard_is_least_significant() {
        let space = pattern_space("ab", "??");
        let all: Vec<_> = (0..space.size())
            .map(|i| space.candidate_at(i).unwrap())
            .collect();
        assert_eq!(all, vec!["aa", "ba", "ab", "bb"]);
    }

    #[test]
    fn test_literals_are_copied() {
        let space = pattern_space("01", "x?y?");
        assert_eq!(space.size(), 4);
        assert_eq!(space.candidate_at(0).unwrap(), "x0y0");
        assert_eq!(space.candidate_at(1).unwrap(), "x1y0");
        assert_eq!(space.candidate_at(3).unwrap(), "x1y1");
        assert_eq!(space.candidate_at(4), None);
    }

    #[test]
    fn test_bijection() {
        let space = pattern_space("abc1", "?-??z?");
        assert_eq!(space.size(), 256);
        for i in 0..space.size() {
            let candidate = space.candidate_at(i).unwrap();
            assert_eq!(space.index_of(&candidate), Some(i), "candidate {candidate}");
        }
    }

    #[test]
    fn test_index_of_rejects_foreign_candidates() {
        let space = pattern_space("ab", "x??");
        assert_eq!(space.index_of("xab"), Some(2));
        assert_eq!(space.index_of("yab"), None);
        assert_eq!(space.index_of("xac"), None);
        assert_eq!(space.index_of("xa"), None);
    }

    #[test]
    fn test_size_is_exact_power() {
        let space = pattern_space("0123456789", "??????");
        assert_eq!(space.size(), 1_000_000);

        // 2^63 still fits.
        let space = SearchSpace::pattern(vec!['0', '1'], vec![Slot::Wildcard; 63]).unwrap();
        assert_eq!(space.size(), 1u64 << 63);
    }

    #[test]
    fn test_size_overflow_is_an_error() {
        let result = SearchSpace::pattern(vec!['0', '1'], vec![Slot::Wildcard; 64]);
        assert!(matches!(
            result,
            Err(SearchError::SpaceOverflow {
                charset: 2,
                wildcards: 64
            })
        ));

        let printable: Vec<char> = DEFAULT_CHARSET.chars().collect();
        let result = SearchSpace::pattern(printable, vec![Slot::Wildcard; 10]);
        assert!(matches!(result, Err(SearchError::SpaceOverflow { .. })));
    }

    #[test]
    fn test_from_config_defaults_to_printable_charset() {
        let space = SearchSpace::from_config(&SearchConfig::default().with_pwlen(2)).unwrap();
        assert_eq!(space.size(), 95 * 95);
        assert_eq!(space.candidate_at(0).unwrap(), "  ");
    }

    #[test]
    fn test_dictionary_mode() {
        let config = SearchConfig::default()
            .with_dictionary(vec!["x".into(), "y".into(), "z".into()])
            .with_charset("ignored");
        let space = SearchSpace::from_config(&config).unwrap();

        assert_eq!(space.size(), 3);
        assert_eq!(space.dictionary_len(), Some(3));
        assert_eq!(space.candidate_at(1).unwrap(), "y");
        assert_eq!(space.index_of("z"), Some(2));
        assert_eq!(space.candidate_at(3), None);
    }

    #[test]
    fn test_dictionary_and_pattern_conflict() {
        let config = SearchConfig::default()
            .with_dictionary(vec!["x".into()])
            .with_pattern("??");
        assert!(matches!(
            SearchSpace::from_config(&config),
            Err(SearchError::PatternWithDictionary)
        ));
    }

    #[test]
    fn test_write_candidate_reuses_buffer() {
        let space = pattern_space("ab", "??");
        let mut buf = String::from("garbage");
        assert!(space.write_candidate(3, &mut buf));
        assert_eq!(buf, "bb");
        assert!(!space.write_candidate(4, &mut buf));
    }
}
