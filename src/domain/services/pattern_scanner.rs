//! Pattern scanner
//!
//! Finds the next occurrence of a byte pattern at or after a position.
//! Each registered pattern remembers its last answer so that a later query
//! starting between the previous start and the previous hit is answered
//! without touching the buffer again.

use memchr::memmem::Finder;

/// Smallest position `>= from` where `pattern` occurs in `haystack`
pub fn find_next(haystack: &[u8], pattern: &[u8], from: usize) -> Option<usize> {
    let tail = haystack.get(from..)?;
    memchr::memmem::find(tail, pattern).map(|pos| from + pos)
}

/// Handle for a pattern registered with a [`PatternScanner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternId(usize);

#[derive(Debug)]
struct MemoFinder {
    finder: Finder<'static>,
    // (searched_from, result)
    last: Option<(usize, Option<usize>)>,
}

/// Memoising scanner over one immutable buffer
#[derive(Debug)]
pub struct PatternScanner<'a> {
    haystack: &'a [u8],
    finders: Vec<MemoFinder>,
}

impl<'a> PatternScanner<'a> {
    pub fn new(haystack: &'a [u8]) -> Self {
        Self {
            haystack,
            finders: Vec::new(),
        }
    }

    /// Registers a pattern and returns its handle
    pub fn register(&mut self, pattern: &[u8]) -> PatternId {
        self.finders.push(MemoFinder {
            finder: Finder::new(pattern).into_owned(),
            last: None,
        });
        PatternId(self.finders.len() - 1)
    }

    /// Smallest position `>= from` at which the pattern occurs
    pub fn find_next(&mut self, id: PatternId, from: usize) -> Option<usize> {
        let memo = &mut self.finders[id.0];

        if let Some((searched_from, result)) = memo.last {
            if from >= searched_from {
                match result {
                    None => return None,
                    Some(pos) if pos >= from => return Some(pos),
                    Some(_) => {}
                }
            }
        }

        let result = self
            .haystack
            .get(from..)
            .and_then(|tail| memo.finder.find(tail))
            .map(|pos| from + pos);
        memo.last = Some((from, result));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_next_respects_start() {
        let data = b"abcabcabc";
        assert_eq!(find_next(data, b"abc", 0), Some(0));
        assert_eq!(find_next(data, b"abc", 1), Some(3));
        assert_eq!(find_next(data, b"abc", 7), None);
        assert_eq!(find_next(data, b"abc", 100), None);
    }

    #[test]
    fn memoised_answers_match_direct_search() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        let pattern = [data[1000], data[1001]];
        let mut scanner = PatternScanner::new(&data);
        let id = scanner.register(&pattern);

        for from in [0, 10, 500, 999, 1000, 1001, 2000, 4095, 4096, 5000] {
            assert_eq!(
                scanner.find_next(id, from),
                find_next(&data, &pattern, from),
                "from = {from}"
            );
        }
    }

    #[test]
    fn memo_handles_backward_queries() {
        let data = b"xxIENDxxxxIENDxx";
        let mut scanner = PatternScanner::new(data);
        let id = scanner.register(b"IEND");

        assert_eq!(scanner.find_next(id, 6), Some(10));
        assert_eq!(scanner.find_next(id, 0), Some(2));
        assert_eq!(scanner.find_next(id, 3), Some(10));
        assert_eq!(scanner.find_next(id, 11), None);
    }
}
