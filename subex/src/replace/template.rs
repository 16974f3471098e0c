use std::{ops::Range, sync::LazyLock};

use crate::{pattern::Captures, syntax::shorthand::BOOTSTRAP_FLAGS, Pattern, PatternCache};

/// Finds `\$`, `$N` and `${N}` in replacement text.
static REFERENCE: LazyLock<Pattern> = LazyLock::new(|| {
    PatternCache::global().pattern(
        r"\\\$|\$[[:digit:]]+|\$\{[[:digit:]]+\}",
        BOOTSTRAP_FLAGS,
    )
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `\$`, a literal `$`.
    Dollar,
    /// `$N`
    Group(usize),
    /// `${N}`, for a group followed by digits.
    Braced(usize),
}

impl ReferenceKind {
    pub fn group(self) -> Option<usize> {
        match self {
            ReferenceKind::Dollar => None,
            ReferenceKind::Group(group) | ReferenceKind::Braced(group) => Some(group),
        }
    }
}

/// A reference in a replacement [`Template`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub span: Range<usize>,
    pub kind: ReferenceKind,
}

impl Reference {
    fn from_bytes(span: Range<usize>, bytes: &[u8]) -> Self {
        let kind = match bytes {
            [b'\\', ..] => ReferenceKind::Dollar,
            [b'$', b'{', digits @ .., b'}'] => ReferenceKind::Braced(parse_group(digits)),
            [b'$', digits @ ..] => ReferenceKind::Group(parse_group(digits)),
            _ => unreachable!("not a reference: {bytes:?}"),
        };
        Self { span, kind }
    }
}

/// Numbers too large for `usize` refer to a group that cannot exist.
fn parse_group(digits: &[u8]) -> usize {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(usize::MAX)
}

/// Replacement text, pre-scanned for references.
///
/// ```
/// use subex::{replace::Template, Pattern};
///
/// let template = Template::parse(r"<$2 \$${1}0>");
/// let re = Pattern::new(r"(\w+)=(\w+)");
/// let haystack = b"k=v";
/// let caps = re.execute(haystack, 0, usize::MAX).unwrap();
///
/// let mut out = Vec::new();
/// template.expand(haystack, &caps, &mut out);
/// assert_eq!(out, b"<v $k0>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    text: Box<[u8]>,
    references: Box<[Reference]>,
}

impl Template {
    pub fn parse(replacement: impl AsRef<[u8]>) -> Self {
        let text = replacement.as_ref();
        let references = if text.contains(&b'$') {
            REFERENCE
                .captures_iter(text)
                .map(|caps| Reference::from_bytes(caps.range(), &text[caps.range()]))
                .collect()
        } else {
            Default::default()
        };
        Self {
            text: text.into(),
            references,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Number of groups a match needs to report for this template, including
    /// group 0.
    pub fn want_groups(&self) -> usize {
        self.references
            .iter()
            .filter_map(|reference| reference.kind.group())
            .max()
            .map_or(1, |group| group.saturating_add(1))
    }

    /// Appends the template to `out`, with every reference expanded against
    /// `caps`, a match in `haystack`.
    ///
    /// A group that is unset or out of range expands to nothing.
    pub fn expand(&self, haystack: &[u8], caps: &Captures, out: &mut Vec<u8>) {
        let mut last = 0;
        for reference in self.references.iter() {
            out.extend_from_slice(&self.text[last..reference.span.start]);
            match reference.kind.group() {
                None => out.push(b'$'),
                Some(group) => {
                    out.extend_from_slice(caps.get(haystack, group).unwrap_or_default())
                }
            }
            last = reference.span.end;
        }
        out.extend_from_slice(&self.text[last..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let template = Template::parse(r"a$1b${23}c\$d$");
        assert_eq!(
            template.references(),
            &[
                Reference {
                    span: 1..3,
                    kind: ReferenceKind::Group(1)
                },
                Reference {
                    span: 4..9,
                    kind: ReferenceKind::Braced(23)
                },
                Reference {
                    span: 10..12,
                    kind: ReferenceKind::Dollar
                },
            ]
        );
        assert_eq!(template.want_groups(), 24);

        let template = Template::parse("no references, $ {1} $x");
        assert!(template.references().is_empty());
        assert_eq!(template.want_groups(), 1);

        let template = Template::parse("$99999999999999999999999");
        assert_eq!(
            template.references()[0].kind,
            ReferenceKind::Group(usize::MAX)
        );
        assert_eq!(template.want_groups(), usize::MAX);
    }

    fn expand(template: &str, pattern: &str, haystack: &[u8]) -> Vec<u8> {
        let caps = Pattern::new(pattern)
            .execute(haystack, 0, usize::MAX)
            .unwrap();
        let mut out = Vec::new();
        Template::parse(template).expand(haystack, &caps, &mut out);
        out
    }

    #[test]
    fn expand_references() {
        assert_eq!(expand("<$1-$2>", "(a)(b)", b"ab"), b"<a-b>");
        assert_eq!(expand("$0$0", "ab", b"xab"), b"abab");
        assert_eq!(expand(r"\$1", "(a)", b"a"), b"$1");
        assert_eq!(expand("${1}0 $10", "(a)", b"a"), b"a0 ");
        assert_eq!(expand("plain", "(a)", b"a"), b"plain");
        assert_eq!(expand("", "(a)", b"a"), b"");
    }

    #[test]
    fn expand_unset() {
        assert_eq!(expand("[$1|$2]", "(a)|(b)", b"b"), b"[|b]");
        assert_eq!(expand("[$7]", "(a)", b"a"), b"[]");
    }
}
