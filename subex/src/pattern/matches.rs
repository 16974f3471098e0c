use std::iter::FusedIterator;

use crate::{pattern::Captures, Pattern};

/// An iterator over successive matches of a [`Pattern`] in a haystack.
///
/// Each search resumes at the end of the previous match. After an empty match
/// the next search starts one byte later, so that zero-width patterns
/// terminate; the skipped byte still belongs to the next gap.
///
/// Created by [`Pattern::captures_iter`].
#[derive(Clone, Debug)]
pub struct Matches<'p, 'h> {
    pattern: &'p Pattern,
    haystack: &'h [u8],
    want_groups: usize,
    pos: usize,
    done: bool,
}

impl<'p, 'h> Matches<'p, 'h> {
    pub(crate) fn new(pattern: &'p Pattern, haystack: &'h [u8], want_groups: usize) -> Self {
        Self {
            pattern,
            haystack,
            want_groups,
            pos: 0,
            done: !pattern.is_compiled(),
        }
    }

    pub fn haystack(&self) -> &'h [u8] {
        self.haystack
    }

    /// Calls `f` with the gap before every match and the match itself, then
    /// returns the trailing remainder of the haystack.
    pub(crate) fn for_each_gap(self, mut f: impl FnMut(&'h [u8], Captures)) -> &'h [u8] {
        let haystack = self.haystack;
        let mut last = 0;
        for caps in self {
            let (start, end) = (caps.start(), caps.end());
            f(&haystack[last..start], caps);
            last = end;
        }
        &haystack[last..]
    }
}

impl Iterator for Matches<'_, '_> {
    type Item = Captures;

    fn next(&mut self) -> Option<Captures> {
        if self.done {
            return None;
        }
        let Some(caps) = self
            .pattern
            .execute(self.haystack, self.pos, self.want_groups)
        else {
            self.done = true;
            return None;
        };
        let range = caps.range();
        self.pos = if range.is_empty() {
            range.end + 1
        } else {
            range.end
        };
        if self.pos > self.haystack.len() {
            self.done = true;
        }
        Some(caps)
    }
}

impl FusedIterator for Matches<'_, '_> {}
