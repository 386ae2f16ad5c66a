/// Domain models for Civic Service
///
/// Every record is stored camelCase in its own JSON array file.
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Like state embedded in every likeable item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    #[serde(default)]
    pub liked_by: Vec<String>,
}

/// Stored counts can be null, negative or fractional; those read as the nearest valid count.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)),
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

impl LikeRecord {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|u| u == user_id)
    }

    /// Flip `user_id`'s like. Returns true when the like is now active.
    ///
    /// `likes` is recomputed from `liked_by` afterwards, so a record that was
    /// inconsistent on disk comes back consistent.
    pub fn toggle(&mut self, user_id: &str) -> bool {
        let was_liked = self.is_liked_by(user_id);
        if was_liked {
            self.liked_by.retain(|u| u != user_id);
        } else {
            self.liked_by.push(user_id.to_string());
        }

        let mut seen = HashSet::new();
        self.liked_by.retain(|u| seen.insert(u.clone()));
        self.likes = self.liked_by.len() as u64;

        !was_liked
    }
}

/// Content that carries a `LikeRecord`
pub trait Likeable {
    /// Human-readable kind, used in responses ("Post liked")
    const KIND: &'static str;

    fn item_id(&self) -> &str;
    fn like_record(&self) -> &LikeRecord;
    fn like_record_mut(&mut self) -> &mut LikeRecord;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    pub pincode: String,
    pub phone: String,
    pub gender: String,
    pub submitted_at: DateTime<Utc>,
}

impl User {
    /// A user is addressed by email, phone number or name.
    pub fn matches(&self, user_id: &str) -> bool {
        self.email == user_id || self.phone == user_id || self.name == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub like_record: LikeRecord,
}

impl Post {
    /// `<unix-millis>-<9 lowercase alphanumerics>`
    pub fn generate_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}-{}", Utc::now().timestamp_millis(), suffix)
    }
}

impl Likeable for Post {
    const KIND: &'static str = "Post";

    fn item_id(&self) -> &str {
        &self.id
    }

    fn like_record(&self) -> &LikeRecord {
        &self.like_record
    }

    fn like_record_mut(&mut self) -> &mut LikeRecord {
        &mut self.like_record
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    // Reels written before ids were assigned have none; they cannot be liked.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(flatten)]
    pub like_record: LikeRecord,
}

impl Likeable for Reel {
    const KIND: &'static str = "Reel";

    fn item_id(&self) -> &str {
        &self.id
    }

    fn like_record(&self) -> &LikeRecord {
        &self.like_record
    }

    fn like_record_mut(&mut self) -> &mut LikeRecord {
        &mut self.like_record
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: String,
    pub content_type: String,
    pub content_id: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn belongs_to(&self, content_type: &str, content_id: &str) -> bool {
        self.content_type == content_type && self.content_id == content_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: String,
    pub user_id: String,
    pub content_type: String,
    pub content_id: String,
    pub platform: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareSummary {
    pub count: usize,
    pub shares: Vec<Share>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub name: String,
}

/// Locally contributed news article, shaped like a news API article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub url_to_image: String,
    pub published_at: DateTime<Utc>,
    pub source: NewsSource,
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub likes: u64,
    pub liked: bool,
}

/// Non-exclusive view of an item's likes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub likes: u64,
    pub liked: bool,
}
