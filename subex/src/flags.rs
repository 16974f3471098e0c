use core::fmt;

bitflags::bitflags! {
    /// Flags used when compiling a pattern. Part of the [cache](crate::cache) key.
    ///
    /// The default flags are [`CompileFlags::EXTENDED`] only, i.e. case-sensitive,
    /// not newline-sensitive and with shorthand classes rewritten to POSIX
    /// bracket expressions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CompileFlags: u32 {
        /// POSIX extended syntax (`|`, `+`, `?`, `{n,m}` and unescaped groups).
        const EXTENDED = 1 << 0;
        /// Letters match both upper and lower case.
        ///
        /// Equivalent to the `i` flag of a `/pattern/replacement/flags` expression.
        const ICASE = 1 << 1;
        /// `^` and `$` match at line boundaries and `.` does not match `\n`.
        ///
        /// Equivalent to the `m` flag of a `/pattern/replacement/flags` expression.
        const NEWLINE = 1 << 2;
        /// The engine understands `\w`, `\d`, `\s` and their negations natively,
        /// so the [shorthand rewriter](crate::syntax::shorthand) is skipped.
        const ENHANCED = 1 << 3;
    }
}

impl Default for CompileFlags {
    fn default() -> Self {
        Self::EXTENDED
    }
}

impl CompileFlags {
    /// Construct flags from the letters of a `/pattern/replacement/flags` expression.
    ///
    /// `i` means [`ICASE`](Self::ICASE) and `m` means [`NEWLINE`](Self::NEWLINE).
    /// Other letters are silently skipped. Note that [`EXTENDED`](Self::EXTENDED)
    /// is not implied; OR the result into [`CompileFlags::default()`] for that.
    pub fn from_letters(letters: &str) -> Self {
        letters.chars().fold(Self::empty(), |flags, c| match c {
            'i' => flags | Self::ICASE,
            'm' => flags | Self::NEWLINE,
            _ => flags,
        })
    }
}

impl From<&str> for CompileFlags {
    /// Equivalent to `CompileFlags::default() | CompileFlags::from_letters(s)`.
    #[inline]
    fn from(s: &str) -> Self {
        Self::default() | Self::from_letters(s)
    }
}

impl fmt::Display for CompileFlags {
    /// Writes the letters understood by [`CompileFlags::from_letters`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.contains(Self::ICASE) {
            f.write_str("i")?;
        }
        if self.contains(Self::NEWLINE) {
            f.write_str("m")?;
        }
        Ok(())
    }
}
