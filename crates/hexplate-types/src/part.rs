use std::fmt;

/// Index of one of the three derived parts, in assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartIndex {
    /// The large region (mirrored-and-closed big curve, lower half).
    One,
    /// The small region combined with the large region.
    Two,
    /// The doubled large region.
    Three,
}

impl PartIndex {
    pub const ALL: [PartIndex; 3] = [PartIndex::One, PartIndex::Two, PartIndex::Three];

    /// 1-based index, as embossed on the part.
    pub fn number(self) -> u32 {
        match self {
            PartIndex::One => 1,
            PartIndex::Two => 2,
            PartIndex::Three => 3,
        }
    }

    /// Label text embossed on the top face.
    pub fn label(self) -> &'static str {
        match self {
            PartIndex::One => "1",
            PartIndex::Two => "2",
            PartIndex::Three => "3",
        }
    }
}

impl fmt::Display for PartIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part{}", self.number())
    }
}
