use sitewatch_common::types::{AlertRule, CompareOp, Reading, Severity};

/// Dead-band width as a fraction of the threshold magnitude.
const HYSTERESIS_RATIO: f64 = 0.05;

/// Evaluate a rule against a channel's series at `now_ms`.
///
/// Averages the readings inside the rule's window, then compares against the
/// threshold with a hysteresis offset on the side that makes triggering
/// harder, so values hovering at the boundary do not flip state rapidly.
/// A zero threshold collapses the dead-band and any breach evaluates exactly.
///
/// Returns `None` for disabled rules, empty series, or an empty window.
pub fn evaluate(series: &[Reading], rule: &AlertRule, now_ms: i64) -> Option<Severity> {
    if !rule.enabled || series.is_empty() {
        return None;
    }

    let window_start = now_ms - i64::from(rule.window_secs) * 1000;
    let mut sum = 0.0;
    let mut count = 0usize;
    for r in series.iter().filter(|r| r.timestamp_ms >= window_start) {
        sum += r.value;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let avg = sum / count as f64;

    let hysteresis = HYSTERESIS_RATIO * rule.threshold.abs();
    let effective = match rule.op {
        CompareOp::Gt | CompareOp::Gte => rule.threshold + hysteresis,
        CompareOp::Lt | CompareOp::Lte => rule.threshold - hysteresis,
    };
    if !rule.op.check(avg, effective) {
        return None;
    }

    if (avg - rule.threshold).abs() > 2.0 * hysteresis {
        Some(Severity::Critical)
    } else {
        Some(Severity::Warn)
    }
}
