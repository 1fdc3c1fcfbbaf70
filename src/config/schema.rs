use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "scan": {
                "type": "object",
                "properties": {
                    "subject": { "type": "string", "minLength": 1 },
                    "reveal_interval_ms": { "type": "integer", "minimum": 0 },
                    "phases": { "type": "array", "minItems": 1, "items": { "$ref": "#/$defs/phase" } },
                    "findings": { "type": "array", "items": { "$ref": "#/$defs/finding" } }
                }
            },
            "session": {
                "type": "object",
                "properties": {
                    "dir": { "type": "string" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "color": { "type": "boolean" },
                    "json": { "type": "boolean" }
                }
            }
        },
        "$defs": {
            "phase": {
                "type": "object",
                "required": ["name", "weight_ms"],
                "properties": {
                    "name": { "type": "string" },
                    "weight_ms": { "type": "integer", "minimum": 0 }
                }
            },
            "finding": {
                "type": "object",
                "required": ["id", "category", "severity", "title", "description", "location"],
                "properties": {
                    "id": { "type": "string" },
                    "category": { "type": "string", "enum": ["vulnerability", "dependency", "code_quality"] },
                    "severity": { "type": "string", "enum": ["critical", "high", "medium", "low"] },
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "location": { "type": "string" },
                    "line": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
});
