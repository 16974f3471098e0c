/*!
Perl-style substitution.

```
use subex::Replace;

let re = Replace::parse("/a(b)c/X$1Y/").unwrap();
assert_eq!(re.exec(b"abcabc"), b"XbYXbY");

let re = Replace::parse(r"#(\w+)@(\w+)#$2 at ${1}s#i").unwrap();
assert_eq!(re.exec(b"Tea@Five"), b"Five at Teas");
```

## Replacement syntax
- `$N`: the text of capture group `N`, where `$0` is the whole match. An
  unset group, or one beyond the pattern's groups, expands to nothing.
- `${N}`: the same, for when the group is followed by a digit.
- `\$`: a literal `$`.

Everything else is copied verbatim. A `$` that starts none of the above is
literal too.
*/
use std::str::FromStr;

use crate::{pattern::Matches, CompileFlags, ParseError, Pattern, PatternCache};

mod template;

pub use template::{Reference, ReferenceKind, Template};

/// A pattern and the replacement for its matches.
#[derive(Clone, Debug)]
pub struct Replace {
    pattern: Pattern,
    template: Template,
}

impl Replace {
    /// Compiles `pattern` through the [global cache](PatternCache::global).
    ///
    /// If `pattern` fails to compile, [`Replace::exec`] returns its input
    /// unchanged.
    pub fn new(pattern: &str, replacement: impl AsRef<[u8]>, flags: CompileFlags) -> Self {
        Self::with_cache(PatternCache::global(), pattern, replacement, flags)
    }

    pub fn with_cache(
        cache: &PatternCache,
        pattern: &str,
        replacement: impl AsRef<[u8]>,
        flags: CompileFlags,
    ) -> Self {
        Self {
            pattern: cache.pattern(pattern, flags),
            template: Template::parse(replacement),
        }
    }

    /// Parses a `/pattern/replacement/flags` expression.
    ///
    /// The delimiter is the first character of `expr`, and the flags part may be
    /// left out. Flag letters are `i` (case-insensitive) and `m`
    /// (newline-sensitive); others are ignored.
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        Self::parse_with_cache(PatternCache::global(), expr)
    }

    pub fn parse_with_cache(cache: &PatternCache, expr: &str) -> Result<Self, ParseError> {
        let delimiter = expr.chars().next().ok_or(ParseError::Empty)?;
        let parts: Vec<&str> = expr[delimiter.len_utf8()..].split(delimiter).collect();
        let (pattern, replacement, flags) = match parts[..] {
            [pattern, replacement] => (pattern, replacement, ""),
            [pattern, replacement, flags] => (pattern, replacement, flags),
            _ => {
                return Err(ParseError::Parts {
                    delimiter,
                    parts: parts.len(),
                })
            }
        };
        let flags = CompileFlags::default() | CompileFlags::from_letters(flags);
        Ok(Self::with_cache(cache, pattern, replacement, flags))
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Replaces every match in `haystack` with the expanded template.
    pub fn exec(&self, haystack: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(haystack.len());
        let rest = Matches::new(&self.pattern, haystack, self.template.want_groups())
            .for_each_gap(|gap, caps| {
                out.extend_from_slice(gap);
                self.template.expand(haystack, &caps, &mut out);
            });
        out.extend_from_slice(rest);
        out
    }

    /// Replaces the `i`-th match with the expanded `replacements[i]`, in place of
    /// this replacement's own template.
    ///
    /// Matches beyond the last replacement are left as they are.
    ///
    /// ```
    /// use subex::{CompileFlags, Replace};
    ///
    /// let re = Replace::new(r"\d", "", CompileFlags::default());
    /// assert_eq!(re.exec_each(b"1 2 3", &["one", "<$0>"]), b"one <2> 3");
    /// ```
    pub fn exec_each<T: AsRef<[u8]>>(&self, haystack: &[u8], replacements: &[T]) -> Vec<u8> {
        let mut out = Vec::with_capacity(haystack.len());
        let mut last = 0;
        let matches = self.pattern.captures_iter(haystack);
        for (replacement, caps) in replacements.iter().zip(matches) {
            out.extend_from_slice(&haystack[last..caps.start()]);
            let template = Template::parse(replacement);
            template.expand(haystack, &caps, &mut out);
            last = caps.end();
        }
        out.extend_from_slice(&haystack[last..]);
        out
    }
}

impl FromStr for Replace {
    type Err = ParseError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        Self::parse(expr)
    }
}
