use axum::response::IntoResponse;
use gamerec::algorithms::{SoftmaxClassifier, TfidfVectorizer};
use gamerec::services::catalog::CatalogService;
use gamerec::services::cooldown::CooldownCache;
use gamerec::services::pipeline::FeaturePipeline;
use gamerec::services::recommendation::RecommendationService;
use gamerec::{AppError, CatalogEntry, Config, RecommendRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn entry(appid: u32, name: &str, combined_features: &str) -> CatalogEntry {
    CatalogEntry {
        appid,
        name: name.to_string(),
        short_description: format!("About {}", name),
        header_image: format!("https://img.example/{}.jpg", appid),
        combined_features: combined_features.to_string(),
    }
}

/// Deterministic pretrained pipeline over three genre tokens: each token
/// maps straight onto one genre label.
fn test_pipeline() -> FeaturePipeline {
    let vocabulary = HashMap::from([
        ("action".to_string(), 0),
        ("puzzle".to_string(), 1),
        ("strategy".to_string(), 2),
    ]);
    let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0, 1.0, 1.0]).unwrap();

    let classifier = SoftmaxClassifier::new(
        vec![
            "Action".to_string(),
            "Puzzle".to_string(),
            "Strategy".to_string(),
        ],
        vec![
            vec![4.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
            vec![0.0, 0.0, 4.0],
        ],
        vec![0.0, 0.0, 0.0],
    )
    .unwrap();

    FeaturePipeline::new(vectorizer, Arc::new(classifier))
}

fn build_service(entries: Vec<CatalogEntry>) -> (Arc<RecommendationService>, Arc<CooldownCache>) {
    let config = Arc::new(Config::default());
    let catalog = Arc::new(CatalogService::from_entries(entries));
    let pipeline = Arc::new(test_pipeline());
    let cooldown = Arc::new(CooldownCache::from_config(&config.cooldown));
    let service = Arc::new(RecommendationService::new(
        catalog,
        pipeline,
        cooldown.clone(),
        config,
    ));

    (service, cooldown)
}

fn request(game_names: &[&str], user_id: Option<&str>) -> RecommendRequest {
    RecommendRequest {
        game_names: game_names.iter().map(|s| s.to_string()).collect(),
        user_id: user_id.map(str::to_string),
    }
}

fn action_heavy_catalog() -> Vec<CatalogEntry> {
    (0..12)
        .map(|i| {
            let features = match i % 3 {
                0 => "action action shooter",
                1 => "puzzle puzzle logic",
                _ => "strategy strategy base building",
            };
            entry(i, &format!("Game {}", i), features)
        })
        .collect()
}

#[tokio::test]
async fn test_returns_five_unique_unowned_games() {
    let (service, _) = build_service(action_heavy_catalog());

    let recommendations = service
        .recommend(&request(&["Game 0", "Game 1"], Some("tester")))
        .await
        .unwrap();

    assert_eq!(recommendations.len(), 5);

    let appids: HashSet<u32> = recommendations.iter().map(|r| r.appid).collect();
    assert_eq!(appids.len(), 5);
    assert!(!appids.contains(&0) && !appids.contains(&1));
}

#[tokio::test]
async fn test_small_pool_returns_everything_without_sampling() {
    let catalog = vec![
        entry(1, "Alpha", "action"),
        entry(2, "Beta", "action shooter"),
        entry(3, "Gamma", "puzzle"),
        entry(4, "Delta", "strategy"),
    ];
    let (service, _) = build_service(catalog);

    let recommendations = service
        .recommend(&request(&["Alpha"], Some("tester")))
        .await
        .unwrap();

    let appids: HashSet<u32> = recommendations.iter().map(|r| r.appid).collect();
    assert_eq!(appids, HashSet::from([2, 3, 4]));
}

#[tokio::test]
async fn test_no_matching_games_is_not_found_and_mutates_nothing() {
    let (service, cooldown) = build_service(action_heavy_catalog());

    let result = service
        .recommend(&request(&["Not In Catalog"], Some("tester")))
        .await;

    match result {
        Err(AppError::NotFound(message)) => assert!(message.contains("No matching games")),
        other => panic!("expected NotFound, got {:?}", other.map(|r| r.len())),
    }
    assert_eq!(cooldown.tracked_users(), 0);
}

#[tokio::test]
async fn test_owned_names_excluded_even_with_unknown_names_present() {
    let catalog = vec![
        entry(1, "Alpha", "action"),
        entry(2, "Beta", "action shooter"),
        entry(3, "Gamma", "puzzle"),
    ];
    let (service, _) = build_service(catalog);

    // "Mystery" matches nothing; the profile is built from "Alpha" alone.
    let recommendations = service
        .recommend(&request(&["Alpha", "Mystery"], None))
        .await
        .unwrap();

    let appids: HashSet<u32> = recommendations.iter().map(|r| r.appid).collect();
    assert!(appids.is_subset(&HashSet::from([2, 3])));
    assert!(!appids.contains(&1));
}

#[tokio::test]
async fn test_cooldown_prevents_repeats_across_calls() {
    let (service, _) = build_service(action_heavy_catalog());
    let req = request(&["Game 0"], Some("repeat-user"));

    let first = service.recommend(&req).await.unwrap();
    let first_ids: HashSet<u32> = first.iter().map(|r| r.appid).collect();
    assert_eq!(first_ids.len(), 5);

    let second = service.recommend(&req).await.unwrap();
    let second_ids: HashSet<u32> = second.iter().map(|r| r.appid).collect();

    assert!(first_ids.is_disjoint(&second_ids));
}

#[tokio::test]
async fn test_anonymous_users_share_cooldown_state_by_library() {
    let (service, cooldown) = build_service(action_heavy_catalog());

    // Same library in different orders, no explicit id: one cache entry.
    service
        .recommend(&request(&["Game 0", "Game 1"], None))
        .await
        .unwrap();
    service
        .recommend(&request(&["Game 1", "Game 0"], None))
        .await
        .unwrap();

    assert_eq!(cooldown.tracked_users(), 1);
}

#[tokio::test]
async fn test_response_shape_carries_no_scores() {
    let (service, _) = build_service(action_heavy_catalog());

    let recommendations = service
        .recommend(&request(&["Game 0"], Some("tester")))
        .await
        .unwrap();

    let value = serde_json::to_value(&recommendations[0]).unwrap();
    let object = value.as_object().unwrap();
    assert!(object.contains_key("name"));
    assert!(object.contains_key("short_description"));
    assert!(object.contains_key("header_image"));
    assert!(object.contains_key("appid"));
    assert!(!object.contains_key("similarity"));
}

#[test]
fn test_error_status_codes() {
    let not_found = AppError::NotFound("No matching games found in catalog".to_string());
    assert_eq!(not_found.into_response().status(), 404);

    let invalid = AppError::InvalidInput("bad".to_string());
    assert_eq!(invalid.into_response().status(), 400);

    let internal = AppError::Internal(anyhow::anyhow!("boom"));
    assert_eq!(internal.into_response().status(), 500);
}
