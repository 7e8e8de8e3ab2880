/// How repeated file records with the same full path are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The later record replaces the offset and sizes of the earlier entry.
    ///
    /// This matches what the game's own loader has been observed to do; it is
    /// not a documented format rule.
    #[default]
    LastWins,
    /// The first record is kept and later ones are ignored.
    FirstWins,
    /// Any repeated path makes the archive corrupt.
    Reject,
}

/// How raw name bytes are turned into strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameEncoding {
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    #[default]
    Lossy,
    /// Invalid UTF-8 makes the archive corrupt.
    Strict,
}

/// Options used when opening an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub name_encoding: NameEncoding,
    /// Also accept archives tagged `"RAS\0"` instead of `"RAS "`.
    pub accept_nul_signature: bool,
}

impl Default for RasConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            name_encoding: NameEncoding::default(),
            accept_nul_signature: true,
        }
    }
}

impl RasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    #[must_use]
    pub fn with_name_encoding(mut self, encoding: NameEncoding) -> Self {
        self.name_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_nul_signature(mut self, accept: bool) -> Self {
        self.accept_nul_signature = accept;
        self
    }
}
