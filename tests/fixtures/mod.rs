//! Test fixtures: minimal image payloads and backend status bodies

#![allow(dead_code)]

use serde_json::{json, Value};

/// Smallest byte strings recognised as each image format.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\0\x01\0";

pub fn processing() -> Value {
    json!({ "id": 42, "status": "processing" })
}

/// A completed analysis of a healthy Monstera.
pub fn completed_healthy() -> Value {
    json!({
        "id": 42,
        "status": "completed",
        "image_url": "https://cdn.sikjipsa.example/diagnosis/42.jpg",
        "plant_name": "Monstera deliciosa",
        "scientific_name": "Monstera deliciosa",
        "confidence": 93.2,
        "is_healthy": true,
        "health_confidence": 88.0,
        "diseases": [],
        "suggestions": [{ "message": "Keep in bright, indirect light" }],
        "created_at": "2026-03-01T09:00:00Z"
    })
}

/// A completed analysis that found leaf spot.
pub fn completed_with_disease() -> Value {
    json!({
        "id": 42,
        "status": "completed",
        "plant_name": "Ficus lyrata",
        "confidence": 61.0,
        "is_healthy": false,
        "diseases": [{ "disease_name": "Leaf spot", "confidence": 72.4 }],
        "suggestions": [{ "message": "Remove affected leaves" }]
    })
}

pub fn failed(message: Option<&str>) -> Value {
    match message {
        Some(message) => json!({ "id": 42, "status": "failed", "error_message": message }),
        None => json!({ "id": 42, "status": "failed" }),
    }
}

/// Community post body as served by the feed.
pub fn post(id: u64, title: &str, post_type: &str) -> Value {
    json!({
        "id": id,
        "user_id": 7,
        "user": { "id": 7, "username": "fern_lover" },
        "title": title,
        "content": format!("content of {title}"),
        "images": "[]",
        "post_type": post_type,
        "likes_count": 0,
        "comments": [],
        "is_liked_by_user": false,
        "created_at": "2026-03-01T09:00:00Z"
    })
}
