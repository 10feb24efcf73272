/// Abundance class of a bin or redundancy group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Abundance {
    Rare,
    Abundant,
}

impl Abundance {
    pub const ALL: [Abundance; 2] = [Abundance::Rare, Abundance::Abundant];

    /// Suffix used in output file names
    pub fn suffix(&self) -> &'static str {
        match self {
            Abundance::Rare => "rare",
            Abundance::Abundant => "abund",
        }
    }
}

impl std::fmt::Display for Abundance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Anything at or below `cutoff` is rare.
pub fn classify(count: usize, cutoff: usize) -> Abundance {
    if count <= cutoff {
        Abundance::Rare
    } else {
        Abundance::Abundant
    }
}
