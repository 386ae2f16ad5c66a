//! Shared fixtures for civic-service integration tests
#![allow(dead_code)]

use actix_middleware::sign_token;
use civic_service::{AppState, Config};
use file_lock::LockMarker;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789";

/// A throwaway data directory plus the configuration pointing at it
pub struct TestEnv {
    pub dir: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = Config::for_data_dir(dir.path(), JWT_SECRET);
        Self { dir, config }
    }

    pub fn with_lock_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.lock.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry_interval_ms(mut self, retry_interval_ms: u64) -> Self {
        self.config.lock.retry_interval_ms = retry_interval_ms;
        self
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    pub fn state(&self) -> AppState {
        AppState::from_config(&self.config).expect("build app state")
    }

    pub fn write_json(&self, file: &str, value: &Value) {
        std::fs::write(self.path(file), serde_json::to_vec_pretty(value).unwrap()).unwrap();
    }

    pub fn read_json(&self, file: &str) -> Value {
        serde_json::from_slice(&std::fs::read(self.path(file)).unwrap()).unwrap()
    }

    pub fn read_bytes(&self, file: &str) -> Vec<u8> {
        std::fs::read(self.path(file)).unwrap()
    }

    pub fn seed_users(&self, names: &[&str]) {
        let users: Vec<Value> = names.iter().map(|n| user_json(n)).collect();
        self.write_json("users.json", &Value::Array(users));
    }

    pub fn seed_posts(&self, ids: &[&str]) {
        let posts: Vec<Value> = ids.iter().map(|id| post_json(id)).collect();
        self.write_json("posts.json", &Value::Array(posts));
    }

    pub fn seed_reels(&self, ids: &[&str]) {
        let reels: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "title": format!("Reel {id}"),
                    "author": "carol",
                    "date": "2024-05-01",
                    "description": "Lake cleanup",
                    "videoUrl": null,
                    "likes": 0,
                    "likedBy": []
                })
            })
            .collect();
        self.write_json("reels.json", &Value::Array(reels));
    }

    /// Plant a lock marker as if another process held the lock.
    pub fn plant_marker(&self, record_file: &str, age_ms: i64) {
        let marker = LockMarker {
            pid: 999_999,
            acquired_at_ms: chrono::Utc::now().timestamp_millis() - age_ms,
            token: "foreign-holder".to_string(),
        };
        std::fs::write(self.lock_path(record_file), marker.to_bytes()).unwrap();
    }

    pub fn lock_path(&self, record_file: &str) -> PathBuf {
        self.path(&format!("{record_file}.lock"))
    }
}

pub fn user_json(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{name}@example.com"),
        "pincode": "560001",
        "phone": format!("98765{:05}", name.len()),
        "gender": "unspecified",
        "submittedAt": "2024-05-01T10:00:00Z"
    })
}

pub fn post_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "excerpt": "Broken streetlight on 5th",
        "author": "carol",
        "date": "2024-05-01",
        "imageUrl": null,
        "likes": 0,
        "likedBy": []
    })
}

pub fn bearer(user_id: &str) -> (String, String) {
    let token = sign_token(user_id, 3600, JWT_SECRET).expect("sign token");
    ("Authorization".to_string(), format!("Bearer {token}"))
}

/// The `likes`/`likedBy` pair of one item in a record file
pub fn like_fields(items: &Value, id: &str) -> (u64, Vec<String>) {
    let item = items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == id)
        .expect("item present");
    let liked_by = item["likedBy"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    (item["likes"].as_u64().unwrap(), liked_by)
}
