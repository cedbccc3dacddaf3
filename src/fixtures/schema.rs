use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CATALOG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "databases": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name", "database_type"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "name": { "type": "string" },
                        "database_type": { "type": "string" },
                        "description": { "type": "string" },
                        "tables": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "database", "question"],
                    "properties": {
                        "id": { "type": "integer", "minimum": 0 },
                        "database": { "type": "string" },
                        "question": { "type": "string", "minLength": 1 },
                        "category": { "type": "string" }
                    }
                }
            },
            "workflows": {
                "type": "array",
                "items": { "$ref": "#/definitions/workflow" }
            }
        },
        "definitions": {
            "agent": {
                "type": "object",
                "required": ["id", "duration"],
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "name": { "type": "string" },
                    "kind": {
                        "type": "string",
                        "enum": ["system", "retrieval", "generation", "validation", "visualization"]
                    },
                    "duration": { "type": "number", "minimum": 0 }
                }
            },
            "edge": {
                "type": "object",
                "required": ["source", "target"],
                "properties": {
                    "source": { "type": "string" },
                    "target": { "type": "string" }
                }
            },
            "workflow": {
                "type": "object",
                "required": ["question", "answer"],
                "properties": {
                    "question": { "type": "string", "minLength": 1 },
                    "database": { "type": "string" },
                    "agents": { "type": "array", "items": { "$ref": "#/definitions/agent" } },
                    "edges": { "type": "array", "items": { "$ref": "#/definitions/edge" } },
                    "answer": { "type": "string" },
                    "chart": {
                        "type": "string",
                        "enum": ["bar", "trend_line", "bar_horizontal_bottom_5", "bar_vertical_top_5"]
                    },
                    "follow_ups": { "type": "array", "items": { "type": "string" } },
                    "tables_used": { "type": "array", "items": { "type": "string" } },
                    "sql": { "type": "string" },
                    "need_visualization": { "type": "boolean" }
                }
            }
        }
    })
});
