use crate::model::Layout;
use serde_json::{Value, json};

/// Frames keyed by item index (as a string, since JSON object keys are
/// strings). Shape: `{ "frames": { "0": {x,y,w,h}, ... }, "meta": {...} }`.
/// Indices dropped by the planner are simply absent.
pub fn to_json_hash(layout: &Layout) -> Value {
    let mut frames = serde_json::Map::new();
    for (index, rect) in &layout.frames {
        frames.insert(
            index.to_string(),
            json!({"x": rect.x, "y": rect.y, "w": rect.w, "h": rect.h}),
        );
    }
    json!({ "frames": frames, "meta": &layout.meta })
}

/// Frames as an array in ascending index order, each entry carrying its
/// index. Shape: `{ "frames": [ {index, x, y, w, h}, ... ], "meta": {...} }`.
pub fn to_json_array(layout: &Layout) -> Value {
    let frames: Vec<Value> = layout
        .frames
        .iter()
        .map(|(index, rect)| {
            json!({
                "index": index,
                "x": rect.x,
                "y": rect.y,
                "w": rect.w,
                "h": rect.h,
            })
        })
        .collect();
    json!({ "frames": frames, "meta": &layout.meta })
}
