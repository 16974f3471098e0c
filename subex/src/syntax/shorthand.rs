/*!
Perl-style shorthand classes (`\w \W \d \D \s \S`) to POSIX bracket expressions.

Each shorthand is rewritten by its own [`Replace`] rule of the form
`((?:^|[^\\])(?:\\\\)*)\\w` → `$1[[:alnum:]]`, i.e. a shorthand is live only if it is
preceded by an even run of backslashes. The rules are compiled once, with
[`CompileFlags::ENHANCED`] so that compiling them never goes through the
rewriter again.

```
use subex::syntax::shorthand::rewrite;

assert_eq!(rewrite(r"\d+-\w").unwrap(), r"[[:digit:]]+-[[:alnum:]]");
assert_eq!(rewrite(r"\\w").unwrap(), r"\\w");
assert_eq!(rewrite(r"\\\w").unwrap(), r"\\[[:alnum:]]");
```
*/
use std::{string::FromUtf8Error, sync::LazyLock};

use crate::{CompileFlags, Replace};

/// Flags of the rule patterns and other internal patterns.
pub(crate) const BOOTSTRAP_FLAGS: CompileFlags =
    CompileFlags::EXTENDED.union(CompileFlags::ENHANCED);

/// Shorthand letter and its bracket expression.
pub const SHORTHANDS: [(char, &str); 6] = [
    ('w', "[[:alnum:]]"),
    ('W', "[^[:alnum:]]"),
    ('d', "[[:digit:]]"),
    ('D', "[^[:digit:]]"),
    ('s', "[[:space:]]"),
    ('S', "[^[:space:]]"),
];

static RULES: LazyLock<Vec<Replace>> = LazyLock::new(|| {
    SHORTHANDS
        .iter()
        .map(|(letter, class)| {
            Replace::new(
                &format!(r"((?:^|[^\\])(?:\\\\)*)\\{letter}"),
                format!("$1{class}"),
                BOOTSTRAP_FLAGS,
            )
        })
        .collect()
});

/// Rewrite every unescaped shorthand class in `pattern`.
///
/// The rewritten text is only invalid UTF-8 if a rule split a codepoint,
/// which the rules never do for valid patterns; the error is still
/// propagated rather than assumed away.
pub fn rewrite(pattern: &str) -> Result<String, FromUtf8Error> {
    if !pattern.contains('\\') {
        return Ok(pattern.to_owned());
    }
    let mut text = pattern.as_bytes().to_vec();
    for rule in RULES.iter() {
        text = rule.exec(&text);
    }
    String::from_utf8(text)
}
