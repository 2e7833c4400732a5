/// Dashboard time range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    M15,
    H1,
    H6,
    H24,
}

impl TimeRange {
    pub fn as_millis(&self) -> i64 {
        match self {
            TimeRange::M15 => 15 * 60 * 1000,
            TimeRange::H1 => 60 * 60 * 1000,
            TimeRange::H6 => 6 * 60 * 60 * 1000,
            TimeRange::H24 => 24 * 60 * 60 * 1000,
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15m" => Ok(TimeRange::M15),
            "1h" => Ok(TimeRange::H1),
            "6h" => Ok(TimeRange::H6),
            "24h" => Ok(TimeRange::H24),
            _ => Err(format!("unknown time range: {s}")),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::M15 => write!(f, "15m"),
            TimeRange::H1 => write!(f, "1h"),
            TimeRange::H6 => write!(f, "6h"),
            TimeRange::H24 => write!(f, "24h"),
        }
    }
}
