//! Configuration types describing the candidate space

use crate::error::{Result, SearchError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

/// Printable ASCII, used when neither a charset nor a dictionary is given.
pub const DEFAULT_CHARSET: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Pattern character standing for an unknown position.
pub const WILDCARD: char = '?';

/// One position of a password pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Known character, copied into every candidate
    Literal(char),
    /// Unknown character, filled from the charset
    Wildcard,
}

impl Slot {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Slot::Wildcard)
    }
}

/// Parse a pattern such as `pa??w0rd` into slots.
pub fn parse_pattern(pattern: &str) -> Vec<Slot> {
    pattern
        .chars()
        .map(|c| {
            if c == WILDCARD {
                Slot::Wildcard
            } else {
                Slot::Literal(c)
            }
        })
        .collect()
}

/// Validate a charset string, returning its characters in order.
pub fn parse_charset(charset: &str) -> Result<Vec<char>> {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        return Err(SearchError::EmptyCharset);
    }
    for (i, c) in chars.iter().enumerate() {
        if chars[..i].contains(c) {
            return Err(SearchError::DuplicateCharset(*c));
        }
    }
    Ok(chars)
}

/// Read a dictionary file, one passphrase per line.
///
/// Trailing `\r` is stripped and empty lines are skipped; any other whitespace
/// belongs to the passphrase.
pub fn load_dictionary(path: &Path) -> Result<Vec<String>> {
    let wrap = |source| SearchError::Dictionary {
        path: path.display().to_string(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(wrap)?);

    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(wrap)?;
        let word = line.strip_suffix('\r').unwrap_or(&line);
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

/// Search space configuration
///
/// Either pattern mode (charset, pattern, password length) or dictionary mode.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Characters filling wildcard positions (None = [`DEFAULT_CHARSET`])
    pub charset: Option<String>,
    /// Password template using [`WILDCARD`] for unknown positions
    pub pattern: Option<String>,
    /// Password length, used to synthesize an all-wildcard pattern
    pub pwlen: Option<usize>,
    /// Candidate passphrases to scan instead of enumerating a pattern
    pub dictionary: Option<Arc<Vec<String>>>,
}

impl SearchConfig {
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_charset_option(mut self, charset: Option<String>) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_pattern_option(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_pwlen(mut self, pwlen: usize) -> Self {
        self.pwlen = Some(pwlen);
        self
    }

    pub fn with_pwlen_option(mut self, pwlen: Option<usize>) -> Self {
        self.pwlen = pwlen;
        self
    }

    pub fn with_dictionary(mut self, words: Vec<String>) -> Self {
        self.dictionary = Some(Arc::new(words));
        self
    }

    pub fn is_dictionary_mode(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Resolve the pattern slots, synthesizing `?` * pwlen when no pattern is given.
    pub fn resolve_slots(&self) -> Result<Vec<Slot>> {
        let slots = match &self.pattern {
            Some(pattern) => {
                let slots = parse_pattern(pattern);
                if let Some(pwlen) = self.pwlen {
                    if pwlen != slots.len() {
                        return Err(SearchError::PatternLength {
                            pattern: slots.len(),
                            pwlen,
                        });
                    }
                }
                slots
            }
            None => vec![Slot::Wildcard; self.pwlen.unwrap_or(0)],
        };

        if slots.is_empty() {
            return Err(SearchError::EmptyPattern);
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_pattern() {
        let slots = parse_pattern("a?c?");
        assert_eq!(
            slots,
            vec![
                Slot::Literal('a'),
                Slot::Wildcard,
                Slot::Literal('c'),
                Slot::Wildcard
            ]
        );
    }

    #[test]
    fn test_parse_charset() {
        assert_eq!(parse_charset("ab1").unwrap(), vec!['a', 'b', '1']);
        assert!(matches!(parse_charset(""), Err(SearchError::EmptyCharset)));
        assert!(matches!(
            parse_charset("abca"),
            Err(SearchError::DuplicateCharset('a'))
        ));
    }

    #[test]
    fn test_default_charset_is_a_set() {
        let chars = parse_charset(DEFAULT_CHARSET).unwrap();
        assert_eq!(chars.len(), 95);
    }

    #[test]
    fn test_resolve_slots_from_pwlen() {
        let config = SearchConfig::default().with_pwlen(3);
        assert_eq!(config.resolve_slots().unwrap(), vec![Slot::Wildcard; 3]);
    }

    #[test]
    fn test_pattern_fixes_length() {
        let config = SearchConfig::default().with_pattern("x??");
        assert_eq!(config.resolve_slots().unwrap().len(), 3);

        let config = SearchConfig::default().with_pattern("x??").with_pwlen(3);
        assert!(config.resolve_slots().is_ok());

        let config = SearchConfig::default().with_pattern("x??").with_pwlen(5);
        assert!(matches!(
            config.resolve_slots(),
            Err(SearchError::PatternLength {
                pattern: 3,
                pwlen: 5
            })
        ));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(
            SearchConfig::default().resolve_slots(),
            Err(SearchError::EmptyPattern)
        ));
        assert!(matches!(
            SearchConfig::default().with_pattern("").resolve_slots(),
            Err(SearchError::EmptyPattern)
        ));
    }

    #[test]
    fn test_load_dictionary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "alpha\r\n\nbeta gamma\n  \ndelta").unwrap();

        let words = load_dictionary(file.path()).unwrap();
        assert_eq!(words, vec!["alpha", "beta gamma", "  ", "delta"]);
    }

    #[test]
    fn test_load_dictionary_missing_file() {
        let err = load_dictionary(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, SearchError::Dictionary { .. }));
    }
}
