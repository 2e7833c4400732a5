use serde::{Deserialize, Serialize};

/// Device-reported health hint attached to a normalized reading.
///
/// Computed from per-payload booleans (a flame-detect flag, a shaking flag)
/// at normalization time; independent of the severity the alert evaluator
/// derives from the series itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Ok,
    Warn,
    Critical,
}

/// One normalized sample on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Reading {
    /// Sample time, integer milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
}

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use sitewatch_common::types::Severity;
///
/// let sev: Severity = "warn".parse().unwrap();
/// assert_eq!(sev, Severity::Warn);
/// assert_eq!(sev.to_string(), "warn");
/// assert!(Severity::Critical > Severity::Warn);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warn => write!(f, "warn"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" | "warning" => Ok(Severity::Warn),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Comparison operator of an alert rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn check(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Gte => value >= threshold,
            Self::Lt => value < threshold,
            Self::Lte => value <= threshold,
        }
    }
}

impl std::str::FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" | "greater_than" => Ok(Self::Gt),
            "gte" | "greater_equal" => Ok(Self::Gte),
            "lt" | "less_than" => Ok(Self::Lt),
            "lte" | "less_equal" => Ok(Self::Lte),
            _ => Err(format!("unknown compare operator: {s}")),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gt => write!(f, "gt"),
            Self::Gte => write!(f, "gte"),
            Self::Lt => write!(f, "lt"),
            Self::Lte => write!(f, "lte"),
        }
    }
}

/// Threshold alert rule for one channel. At most one rule per channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertRule {
    pub channel_id: String,
    pub threshold: f64,
    pub op: CompareOp,
    /// Averaging window, seconds. Valid range [1, 3600].
    pub window_secs: u32,
    pub enabled: bool,
}

/// A recorded alert transition. Immutable except for `acknowledged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertEvent {
    pub event_id: String,
    pub channel_id: String,
    /// Most recent reading's value at trigger time (0.0 when the series
    /// had no latest reading).
    pub value: f64,
    pub triggered_at_ms: i64,
    pub severity: Severity,
    pub acknowledged: bool,
}

impl AlertEvent {
    /// Event ids combine the channel and the trigger instant.
    pub fn make_id(channel_id: &str, triggered_at_ms: i64) -> String {
        format!("{channel_id}-{triggered_at_ms}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_both_spellings() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn compare_op_round_trips() {
        for s in ["gt", "gte", "lt", "lte"] {
            let op: CompareOp = s.parse().unwrap();
            assert_eq!(op.to_string(), s);
        }
        assert_eq!("greater_than".parse::<CompareOp>().unwrap(), CompareOp::Gt);
    }

    #[test]
    fn compare_op_check() {
        assert!(CompareOp::Gt.check(2.0, 1.0));
        assert!(!CompareOp::Gt.check(1.0, 1.0));
        assert!(CompareOp::Gte.check(1.0, 1.0));
        assert!(CompareOp::Lt.check(0.5, 1.0));
        assert!(CompareOp::Lte.check(1.0, 1.0));
    }

    #[test]
    fn reading_serializes_without_null_status() {
        let r = Reading {
            timestamp_ms: 1,
            value: 2.0,
            status: None,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("status").is_none());
    }

    #[test]
    fn event_id_combines_channel_and_time() {
        assert_eq!(
            AlertEvent::make_id("raspi/node/flame", 1700000000000),
            "raspi/node/flame-1700000000000"
        );
    }
}
