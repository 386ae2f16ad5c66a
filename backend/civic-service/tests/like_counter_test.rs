/// Like counter behaviour against real record files
mod common;

use civic_service::services::LikeError;
use common::{like_fields, TestEnv};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn assert_consistent(env: &TestEnv, id: &str) {
    let (likes, liked_by) = like_fields(&env.read_json("posts.json"), id);
    let unique: HashSet<_> = liked_by.iter().collect();
    assert_eq!(likes as usize, liked_by.len());
    assert_eq!(unique.len(), liked_by.len());
}

#[tokio::test]
async fn alice_then_bob_then_alice() {
    let env = TestEnv::new();
    env.seed_users(&["alice", "bob"]);
    env.seed_posts(&["p1"]);
    let state = env.state();

    let first = state.post_likes.toggle_like("p1", "alice").await.unwrap();
    assert_eq!((first.likes, first.liked), (1, true));

    let second = state.post_likes.toggle_like("p1", "bob").await.unwrap();
    assert_eq!((second.likes, second.liked), (2, true));

    let third = state.post_likes.toggle_like("p1", "alice").await.unwrap();
    assert_eq!((third.likes, third.liked), (1, false));

    let (likes, liked_by) = like_fields(&env.read_json("posts.json"), "p1");
    assert_eq!(likes, 1);
    assert_eq!(liked_by, vec!["bob"]);
    assert!(!env.lock_path("posts.json").exists());
}

#[tokio::test]
async fn count_matches_likers_after_every_toggle() {
    let env = TestEnv::new();
    env.seed_users(&["alice", "bob", "carol"]);
    env.seed_posts(&["p1", "p2"]);
    let state = env.state();

    let sequence = [
        ("p1", "alice"),
        ("p1", "bob"),
        ("p2", "alice"),
        ("p1", "alice"),
        ("p1", "carol"),
        ("p2", "alice"),
        ("p1", "bob"),
        ("p1", "bob"),
    ];
    for (post, user) in sequence {
        state.post_likes.toggle_like(post, user).await.unwrap();
        assert_consistent(&env, "p1");
        assert_consistent(&env, "p2");
    }

    let (likes, liked_by) = like_fields(&env.read_json("posts.json"), "p1");
    assert_eq!(likes, 2);
    assert_eq!(liked_by, vec!["carol", "bob"]);
}

#[tokio::test]
async fn double_toggle_restores_original_state() {
    let env = TestEnv::new();
    env.seed_users(&["alice", "bob"]);
    env.seed_posts(&["p1"]);
    let state = env.state();
    state.post_likes.toggle_like("p1", "bob").await.unwrap();
    let before = like_fields(&env.read_json("posts.json"), "p1");

    state.post_likes.toggle_like("p1", "alice").await.unwrap();
    state.post_likes.toggle_like("p1", "alice").await.unwrap();

    assert_eq!(like_fields(&env.read_json("posts.json"), "p1"), before);
}

#[tokio::test]
async fn login_identity_may_be_email_or_phone() {
    let env = TestEnv::new();
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    let state = env.state();

    let outcome = state
        .post_likes
        .toggle_like("p1", "alice@example.com")
        .await
        .unwrap();
    assert!(outcome.liked);

    let status = state
        .post_likes
        .get_like_status("p1", Some("alice@example.com"))
        .await
        .unwrap();
    assert_eq!((status.likes, status.liked), (1, true));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_from_distinct_users_all_land() {
    let users: Vec<String> = (0..25).map(|i| format!("user{i}")).collect();
    let names: Vec<&str> = users.iter().map(String::as_str).collect();

    let env = TestEnv::new().with_retry_interval_ms(5);
    env.seed_users(&names);
    env.seed_posts(&["p1"]);
    let state = Arc::new(env.state());

    let handles: Vec<_> = users
        .iter()
        .cloned()
        .map(|user| {
            let state = state.clone();
            tokio::spawn(async move { state.post_likes.toggle_like("p1", &user).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().liked);
    }

    let (likes, liked_by) = like_fields(&env.read_json("posts.json"), "p1");
    assert_eq!(likes, 25);
    let expected: HashSet<_> = users.iter().cloned().collect();
    let actual: HashSet<_> = liked_by.into_iter().collect();
    assert_eq!(actual, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_instances_sharing_a_directory_exclude_each_other() {
    let users: Vec<String> = (0..20).map(|i| format!("user{i}")).collect();
    let names: Vec<&str> = users.iter().map(String::as_str).collect();

    let env = TestEnv::new()
        .with_retry_interval_ms(5)
        .with_lock_timeout_ms(20_000);
    env.seed_users(&names);
    env.seed_posts(&["p1"]);

    // Two states share files but not in-process mutexes, like two processes.
    let first = Arc::new(env.state());
    let second = Arc::new(env.state());

    let handles: Vec<_> = users
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, user)| {
            let state = if i % 2 == 0 { first.clone() } else { second.clone() };
            tokio::spawn(async move { state.post_likes.toggle_like("p1", &user).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (likes, liked_by) = like_fields(&env.read_json("posts.json"), "p1");
    assert_eq!(likes, 20);
    assert_eq!(liked_by.into_iter().collect::<HashSet<_>>().len(), 20);
}

#[tokio::test]
async fn held_lock_times_out_without_mutation() {
    let env = TestEnv::new().with_lock_timeout_ms(200);
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    env.plant_marker("posts.json", 0);
    let before = env.read_bytes("posts.json");
    let state = env.state();

    let err = state.post_likes.toggle_like("p1", "alice").await.unwrap_err();

    assert!(matches!(err, LikeError::Timeout(_)));
    assert_eq!(env.read_bytes("posts.json"), before);
    // someone else's marker is left alone
    assert!(env.lock_path("posts.json").exists());
}

#[tokio::test]
async fn stale_marker_is_reclaimed() {
    let env = TestEnv::new().with_lock_timeout_ms(1_000);
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    env.plant_marker("posts.json", 60_000);
    let state = env.state();

    let outcome = state.post_likes.toggle_like("p1", "alice").await.unwrap();

    assert_eq!((outcome.likes, outcome.liked), (1, true));
    assert!(!env.lock_path("posts.json").exists());
}

#[tokio::test]
async fn unknown_item_is_not_found_and_untouched() {
    let env = TestEnv::new();
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    let before = env.read_bytes("posts.json");
    let state = env.state();

    let err = state.post_likes.toggle_like("pX", "alice").await.unwrap_err();

    assert!(matches!(err, LikeError::NotFound { .. }));
    assert_eq!(env.read_bytes("posts.json"), before);
    assert!(!env.lock_path("posts.json").exists());
}

#[tokio::test]
async fn unregistered_user_is_forbidden_before_locking() {
    let env = TestEnv::new().with_lock_timeout_ms(2_000);
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    // A held lock would make any acquisition attempt wait out the timeout.
    env.plant_marker("posts.json", 0);
    let before = env.read_bytes("posts.json");
    let state = env.state();

    let started = Instant::now();
    let err = state.post_likes.toggle_like("p1", "mallory").await.unwrap_err();

    assert!(matches!(err, LikeError::Forbidden(_)));
    assert!(started.elapsed() < Duration::from_millis(1_000));
    assert_eq!(env.read_bytes("posts.json"), before);
    assert!(env.lock_path("posts.json").exists());
}

#[tokio::test]
async fn reels_have_their_own_counter_and_lock() {
    let env = TestEnv::new().with_lock_timeout_ms(1_000);
    env.seed_users(&["alice"]);
    env.seed_posts(&["p1"]);
    env.seed_reels(&["r1"]);
    // posts being locked does not block reels
    env.plant_marker("posts.json", 0);
    let state = env.state();

    let outcome = state.reel_likes.toggle_like("r1", "alice").await.unwrap();
    assert_eq!((outcome.likes, outcome.liked), (1, true));

    let err = state.reel_likes.toggle_like("p1", "alice").await.unwrap_err();
    assert!(matches!(err, LikeError::NotFound { kind: "Reel", .. }));
}

#[tokio::test]
async fn null_or_negative_sibling_counts_do_not_break_the_file() {
    let env = TestEnv::new();
    env.seed_users(&["alice"]);
    let mut legacy = common::post_json("p2");
    legacy["likes"] = serde_json::Value::Null;
    let mut underflowed = common::post_json("p3");
    underflowed["likes"] = serde_json::json!(-1);
    env.write_json(
        "posts.json",
        &serde_json::json!([common::post_json("p1"), legacy, underflowed]),
    );
    let state = env.state();

    let posts = state.posts.list().await.unwrap();
    assert_eq!(posts.len(), 3);
    assert!(posts.iter().all(|p| p.like_record.likes == 0));

    let outcome = state.post_likes.toggle_like("p1", "alice").await.unwrap();
    assert_eq!((outcome.likes, outcome.liked), (1, true));

    let outcome = state.post_likes.toggle_like("p3", "alice").await.unwrap();
    assert_eq!((outcome.likes, outcome.liked), (1, true));

    let stored = env.read_json("posts.json");
    assert_eq!(like_fields(&stored, "p2").0, 0);
    assert_eq!(like_fields(&stored, "p3"), (1, vec!["alice".to_string()]));
}
