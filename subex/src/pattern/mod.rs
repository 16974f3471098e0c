/*!
Compiled patterns and the operations on them.

```
use subex::Pattern;

let re = Pattern::new(r"(\w+)=(\d+)");
assert_eq!(re.match_all(b"a=1, b=22"), vec![&b"a=1"[..], &b"b=22"[..]]);
assert_eq!(re.split(b"a=1, b=22"), vec![&b""[..], &b", "[..], &b""[..]]);
assert_eq!(
    re.parse(b"a=1"),
    vec![Some(&b"a=1"[..]), Some(&b"a"[..]), Some(&b"1"[..])]
);
```

A pattern that failed to compile is *absent*: the failure has been reported
through the cache's [`Warn`](crate::Warn) sink, and every operation behaves as
if nothing matched.

```
use subex::Pattern;

let re = Pattern::new("(unclosed");
assert!(!re.is_compiled());
assert_eq!(re.split(b"abc"), vec![&b"abc"[..]]);
assert!(re.match_all(b"abc").is_empty());
```
*/
use std::{fmt, ops::Range, sync::Arc};

use itertools::Itertools;

use crate::{cache::CompileResult, CompileError, CompileFlags, Compiled, PatternCache};

mod captures;
mod matches;

pub use captures::Captures;
pub use matches::Matches;

/// A handle to a compiled pattern. Cheap to clone.
#[derive(Clone)]
pub struct Pattern {
    text: Arc<str>,
    flags: CompileFlags,
    compiled: Option<Arc<Compiled>>,
}

impl Pattern {
    /// Compiles `text` with the default flags through the
    /// [global cache](PatternCache::global).
    pub fn new(text: &str) -> Self {
        Self::with_flags(text, CompileFlags::default())
    }

    pub fn with_flags(text: &str, flags: CompileFlags) -> Self {
        PatternCache::global().pattern(text, flags)
    }

    /// Like [`Pattern::new`], but returns the compile error instead of an absent
    /// pattern.
    pub fn try_new(text: &str) -> Result<Self, Arc<CompileError>> {
        let flags = CompileFlags::default();
        PatternCache::global().try_pattern(text, flags)
    }

    pub(crate) fn from_result(text: &str, flags: CompileFlags, result: CompileResult) -> Self {
        Self {
            text: text.into(),
            flags,
            compiled: result.ok(),
        }
    }

    /// The pattern text as given, before shorthand rewriting.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn flags(&self) -> CompileFlags {
        self.flags
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn compiled(&self) -> Option<&Arc<Compiled>> {
        self.compiled.as_ref()
    }

    /// Number of capture groups, including group 0. Zero if absent.
    pub fn group_len(&self) -> usize {
        self.compiled
            .as_ref()
            .map_or(0, |compiled| compiled.program().group_len())
    }

    /// Top-level capture group indices. Empty if absent.
    pub fn outer_groups(&self) -> &[usize] {
        match &self.compiled {
            Some(compiled) => compiled.outer_groups(),
            None => &[],
        }
    }

    /// Searches `haystack[offset..]` for the leftmost match.
    ///
    /// The remainder is searched as a fresh subject, so `^` matches at
    /// `offset`. Spans in the result are relative to `haystack`. Only the first
    /// `want_groups` groups are reported; group 0 always is.
    ///
    /// Returns `None` if the pattern is absent, `offset` is past the end, or the
    /// engine failed (after reporting the failure).
    pub fn execute(&self, haystack: &[u8], offset: usize, want_groups: usize) -> Option<Captures> {
        let compiled = self.compiled.as_ref()?;
        let subject = haystack.get(offset..)?;
        match compiled.program().execute(subject, want_groups) {
            Ok(caps) => caps.map(|caps| caps.offset(offset)),
            Err(e) => {
                compiled.warn(&format!(
                    "Regex match error: {e}, in pattern \"{}\"",
                    self.text
                ));
                None
            }
        }
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.execute(haystack, 0, 1).is_some()
    }

    /// The byte range of the first match.
    pub fn find(&self, haystack: &[u8]) -> Option<Range<usize>> {
        self.execute(haystack, 0, 1).map(|caps| caps.range())
    }

    /// Iterates over successive matches, reporting every group.
    pub fn captures_iter<'p, 'h>(&'p self, haystack: &'h [u8]) -> Matches<'p, 'h> {
        Matches::new(self, haystack, usize::MAX)
    }

    /// At most `max_results` successive matches.
    pub fn find_all(&self, haystack: &[u8], max_results: usize) -> Vec<Captures> {
        self.captures_iter(haystack).take(max_results).collect()
    }

    /// The texts between matches, including the leading and trailing ones.
    ///
    /// There is always one more piece than there are matches.
    pub fn split<'h>(&self, haystack: &'h [u8]) -> Vec<&'h [u8]> {
        let mut out = Vec::new();
        let matches = Matches::new(self, haystack, 1);
        let rest = matches.for_each_gap(|gap, _| out.push(gap));
        out.push(rest);
        out
    }

    /// The texts of all matches.
    pub fn match_all<'h>(&self, haystack: &'h [u8]) -> Vec<&'h [u8]> {
        Matches::new(self, haystack, 1)
            .map(|caps| &haystack[caps.range()])
            .collect()
    }

    /// The texts of the outer capture groups of all matches, flattened.
    ///
    /// Falls back to [`Pattern::match_all`] if the pattern has no capture
    /// groups.
    ///
    /// ```
    /// use subex::Pattern;
    ///
    /// let re = Pattern::new(r"(\w)(\d(\d))?");
    /// assert_eq!(
    ///     re.match_outer(b"a12 b"),
    ///     vec![Some(&b"a"[..]), Some(&b"12"[..]), Some(&b"b"[..]), None]
    /// );
    /// ```
    pub fn match_outer<'h>(&self, haystack: &'h [u8]) -> Vec<Option<&'h [u8]>> {
        let outer = self.outer_groups();
        if outer.is_empty() {
            return self.match_all(haystack).into_iter().map(Some).collect();
        }
        let want_groups = outer.iter().max().map_or(1, |max| max + 1);
        Matches::new(self, haystack, want_groups)
            .flat_map(|caps| {
                outer
                    .iter()
                    .map(|&group| caps.get(haystack, group))
                    .collect_vec()
            })
            .collect()
    }

    /// The texts of every group of the first match, or an empty result if
    /// nothing matches.
    pub fn parse<'h>(&self, haystack: &'h [u8]) -> Vec<Option<&'h [u8]>> {
        self.execute(haystack, 0, usize::MAX)
            .map(|caps| caps.texts(haystack))
            .unwrap_or_default()
    }

    /// [`Pattern::parse`] for every match.
    pub fn parse_all<'h>(&self, haystack: &'h [u8]) -> Vec<Vec<Option<&'h [u8]>>> {
        self.captures_iter(haystack)
            .map(|caps| caps.texts(haystack))
            .collect()
    }

    /// Replaces every match with the result of `replace`, which receives the
    /// texts of all groups of the match.
    ///
    /// ```
    /// use subex::Pattern;
    ///
    /// let re = Pattern::new(r"(\d+)");
    /// let out = re.replace_with(b"a1b22", |groups| {
    ///     format!("<{}>", groups[1].map_or(0, |g| g.len()))
    /// });
    /// assert_eq!(out, b"a<1>b<2>");
    /// ```
    pub fn replace_with<R>(
        &self,
        haystack: &[u8],
        mut replace: impl FnMut(&[Option<&[u8]>]) -> R,
    ) -> Vec<u8>
    where
        R: AsRef<[u8]>,
    {
        let mut out = Vec::with_capacity(haystack.len());
        let rest = self.captures_iter(haystack).for_each_gap(|gap, caps| {
            out.extend_from_slice(gap);
            let replacement = replace(&caps.texts(haystack));
            out.extend_from_slice(replacement.as_ref());
        });
        out.extend_from_slice(rest);
        out
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("text", &self.text)
            .field("flags", &self.flags)
            .field("compiled", &self.compiled)
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
