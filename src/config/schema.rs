use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "sequencer": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "min_total_ms": { "type": "integer", "minimum": 0 },
                    "policy": { "type": "string", "enum": ["sequential", "overlap"] },
                    "overlap_ms": { "type": "integer", "minimum": 0 }
                }
            },
            "matcher": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "token_overlap_threshold": { "type": "number", "exclusiveMinimum": 0, "maximum": 1 }
                }
            },
            "chat": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "title_max_chars": { "type": "integer", "minimum": 1 }
                }
            },
            "fixtures": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "path": { "type": "string", "minLength": 1 }
                }
            }
        }
    })
});
