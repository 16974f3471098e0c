use std::ops::Range;

/// The capture group spans of one match.
///
/// There is exactly one entry per group of the compiled program, including
/// group 0 (the whole match). A group that did not participate in the match
/// (for example, it was in a not-taken branch of an alternation) is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Captures {
    groups: Box<[Option<Range<usize>>]>,
}

impl Captures {
    /// Engines must set group 0.
    pub fn new(groups: impl Into<Box<[Option<Range<usize>>]>>) -> Self {
        let groups = groups.into();
        debug_assert!(groups.first().is_some_and(Option::is_some));
        Self { groups }
    }

    /// Access a group by index, using the convention of Python's `group()`
    /// function. Index 0 is the whole match, index 1 is the first capture
    /// group.
    #[inline]
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.groups.get(index).cloned().flatten()
    }

    /// The span of the whole match.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.group(0).unwrap_or_default()
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.range().start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.range().end
    }

    /// Number of groups, including group 0.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        self.groups.iter().cloned()
    }

    /// The text of group `index` in `haystack`, or `None` if the group is
    /// unset or out of range.
    #[inline]
    pub fn get<'h>(&self, haystack: &'h [u8], index: usize) -> Option<&'h [u8]> {
        self.group(index).and_then(|range| haystack.get(range))
    }

    /// The texts of all groups, in index order.
    pub fn texts<'h>(&self, haystack: &'h [u8]) -> Vec<Option<&'h [u8]>> {
        self.iter()
            .map(|group| group.and_then(|range| haystack.get(range)))
            .collect()
    }

    /// Returns new captures with `offset` added to every set span.
    pub(crate) fn offset(self, offset: usize) -> Captures {
        if offset == 0 {
            return self;
        }
        let groups = self
            .groups
            .into_vec()
            .into_iter()
            .map(|group| group.map(|range| range.start + offset..range.end + offset))
            .collect::<Box<[_]>>();
        Captures { groups }
    }
}
