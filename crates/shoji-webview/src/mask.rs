//! Mask descriptors: view-relative rectangles cut out of a view's input
//! area, so the pointer reaches whatever lies beneath.

use serde_json::Value;
use shoji_common::{Point, Rect};
use tracing::debug;

/// Parse a descriptor of the form `[{"x":..,"y":..,"width":..,"height":..}]`.
///
/// Empty or malformed descriptors yield no masks; entries missing a field
/// are skipped. Descriptors that arrive double-escaped (`[{\"x\":1,..}]`)
/// are unescaped once.
pub fn parse_masks(descriptor: &str) -> Vec<Rect> {
    let trimmed = descriptor.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let entries = match serde_json::from_str::<Vec<Value>>(trimmed) {
        Ok(v) => v,
        Err(_) if trimmed.contains("\\\"") => {
            match serde_json::from_str::<Vec<Value>>(&trimmed.replace("\\\"", "\"")) {
                Ok(v) => v,
                Err(e) => {
                    debug!(error = %e, "malformed mask descriptor ignored");
                    return Vec::new();
                }
            }
        }
        Err(e) => {
            debug!(error = %e, "malformed mask descriptor ignored");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Rect>(v).ok())
        .collect()
}

/// Whether a view-local point falls inside any mask.
pub fn point_in_masks(local: Point, masks: &[Rect]) -> bool {
    masks.iter().any(|m| m.contains(local))
}
