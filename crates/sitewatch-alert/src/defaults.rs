use sitewatch_common::types::{AlertRule, CompareOp};

/// Provenance of an effective rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    /// User-configured rule from the store.
    Explicit,
    /// Built-in per-channel default.
    Default,
    /// Generic fallback for channels without a default.
    Generic,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSource::Explicit => "explicit",
            RuleSource::Default => "default",
            RuleSource::Generic => "generic",
        }
    }
}

/// Built-in default rule for a channel, if one exists.
pub fn default_rule(channel_id: &str) -> Option<AlertRule> {
    let (threshold, window_secs, enabled) = match channel_id {
        "raspi/sensors/dht/temp" => (30.0, 5, true),
        "raspi/sensors/dht/humid" => (70.0, 10, false),
        "raspi/node/sound" => (80.0, 3, true),
        "raspi/node/flame" => (0.0, 1, true),
        "raspi/node/smoke" => (1500.0, 5, true),
        "raspi/sensors/gyro" => (2.0, 2, false),
        _ => return None,
    };
    Some(AlertRule {
        channel_id: channel_id.to_string(),
        threshold,
        op: CompareOp::Gt,
        window_secs,
        enabled,
    })
}

/// Generic fallback when a channel has neither an explicit rule nor a
/// built-in default. Disabled, so unknown channels never alert on their own.
pub fn generic_rule(channel_id: &str) -> AlertRule {
    AlertRule {
        channel_id: channel_id.to_string(),
        threshold: 0.0,
        op: CompareOp::Gt,
        window_secs: 5,
        enabled: false,
    }
}

/// Resolve the effective rule for a channel: explicit user rule, else the
/// per-channel default, else the generic fallback.
pub fn resolve(channel_id: &str, explicit: Option<&AlertRule>) -> (AlertRule, RuleSource) {
    if let Some(rule) = explicit {
        return (rule.clone(), RuleSource::Explicit);
    }
    match default_rule(channel_id) {
        Some(rule) => (rule, RuleSource::Default),
        None => (generic_rule(channel_id), RuleSource::Generic),
    }
}
