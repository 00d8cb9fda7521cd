//! Local deterministic actions

use serde_json::{json, Value};

use crate::types::ToolOutcome;

const DEFAULT_BRIGHTNESS: u8 = 100;

/// Switch the smart light on or off
///
/// `brightness` is clamped to 0..=100 and defaults to 100 when turning on.
/// Same arguments, same outcome.
pub fn control_light(args: &Value) -> ToolOutcome {
    match args.get("action").and_then(Value::as_str) {
        Some("on") => {
            let level = args
                .get("brightness")
                .and_then(Value::as_f64)
                .map(|b| b.clamp(0.0, 100.0).round() as u8)
                .unwrap_or(DEFAULT_BRIGHTNESS);
            ToolOutcome::ok(format!("Light turned on at {}% brightness", level))
                .field("state", json!({"power": "on", "brightness": level}))
        }
        Some("off") => {
            ToolOutcome::ok("Light turned off").field("state", json!({"power": "off", "brightness": 0}))
        }
        other => ToolOutcome::failure(format!(
            "Invalid action {}: expected \"on\" or \"off\"",
            other.map(|a| format!("\"{}\"", a)).unwrap_or_else(|| "(missing)".to_string())
        )),
    }
}
