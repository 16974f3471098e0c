/*!
Pattern syntax.

Patterns are POSIX extended regular expressions as understood by
[`regex-syntax`](https://docs.rs/regex-syntax), plus the Perl-style shorthand
classes below. Unless [`CompileFlags::ENHANCED`] is set, the shorthands are
rewritten to POSIX bracket expressions by [`shorthand::rewrite`] before the
pattern reaches the engine.

<pre class="rust">
\w     [[:alnum:]]
\W     [^[:alnum:]]
\d     [[:digit:]]
\D     [^[:digit:]]
\s     [[:space:]]
\S     [^[:space:]]
</pre>

Unlike Perl, `\w` does not include `_`. Set [`CompileFlags::ENHANCED`] to use
the engine's native shorthands instead, where `\w` includes `_`.

An escaped backslash keeps its meaning: `\\w` is a literal backslash followed
by `w`, while `\\\w` is a literal backslash followed by a word character.

### Bracket expressions

<pre class="rust">
[[:alnum:]]    alphanumeric ([0-9A-Za-z])
[[:alpha:]]    alphabetic ([A-Za-z])
[[:blank:]]    blank ([\t ])
[[:cntrl:]]    control ([\x00-\x1F\x7F])
[[:digit:]]    digits ([0-9])
[[:graph:]]    graphical ([!-~])
[[:lower:]]    lower case ([a-z])
[[:print:]]    printable ([ -~])
[[:punct:]]    punctuation ([!-/:-@\[-`{-~])
[[:space:]]    whitespace ([\t\n\v\f\r ])
[[:upper:]]    upper case ([A-Z])
[[:xdigit:]]   hex digit ([0-9A-Fa-f])
</pre>

Bracket expressions nest, so a rewritten shorthand inside a class, e.g.
`[\d-]` becoming `[[[:digit:]]-]`, keeps its meaning.

### Flags

- [`CompileFlags::ICASE`]: case-insensitive, same as `(?i)`.
- [`CompileFlags::NEWLINE`]: `^`/`$` match at lines and `.` excludes `\n`,
  same as `(?m-s)`. Without it `.` matches any byte including `\n`.

Patterns match bytes, not codepoints: `.`, `[^...]` and the negated shorthands
match any single byte, valid UTF-8 or not, while a non-ASCII literal matches
its UTF-8 encoding. Unicode mode can be enabled per group with `(?u:...)`, or for
the whole engine with [`Backtrack::builder().unicode(true)`](crate::engine::Backtrack).
*/
use regex_automata::util::syntax;

use crate::CompileFlags;

pub mod group;
pub mod shorthand;

/// The syntax config for compiling a pattern with `flags`.
///
/// Haystacks are byte strings, so `utf8` is always disabled and Unicode mode
/// is off: `.` and negated classes match any single byte.
pub fn config(flags: CompileFlags) -> syntax::Config {
    syntax::Config::new()
        .unicode(false)
        .utf8(false)
        .case_insensitive(flags.contains(CompileFlags::ICASE))
        .multi_line(flags.contains(CompileFlags::NEWLINE))
        .dot_matches_new_line(!flags.contains(CompileFlags::NEWLINE))
}
