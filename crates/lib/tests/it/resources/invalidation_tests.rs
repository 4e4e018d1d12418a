//! Cache invalidation law: any successful mutation forces the next list to refetch.

use std::sync::Arc;

use mentora::{
    ApiTransport,
    resources::{ResourceClient, Skill, SkillDraft, SkillLevel, SkillPatch},
};

use crate::helpers::{ApiState, StubApi, skill, spawn_stub};

async fn skills_stub() -> (StubApi, Arc<ApiTransport>, ResourceClient<Skill>) {
    let stub = spawn_stub(ApiState {
        skills: vec![
            skill(7, "Rust", "advanced"),
            skill(8, "SQL", "intermediate"),
        ],
        next_skill_id: 9,
        ..Default::default()
    })
    .await;
    stub.state
        .lock()
        .unwrap()
        .valid_tokens
        .insert("t1".to_string());

    let transport = Arc::new(ApiTransport::new(&stub.base_url).unwrap());
    transport.set_authorization(Some("t1"));
    let client = ResourceClient::<Skill>::new(transport.clone());
    (stub, transport, client)
}

#[tokio::test]
async fn list_is_cached_until_invalidated() {
    let (stub, _transport, client) = skills_stub().await;

    let first = client.list().await.unwrap();
    let second = client.list().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);

    // Two reads, one remote fetch
    assert_eq!(stub.count_calls("skills_list"), 1);

    client.invalidate().await;
    client.list().await.unwrap();
    assert_eq!(stub.count_calls("skills_list"), 2);
}

#[tokio::test]
async fn create_invalidates_without_splicing() {
    let (stub, _transport, client) = skills_stub().await;

    client.list().await.unwrap();
    let created = client
        .create(&SkillDraft {
            name: "Go".to_string(),
            level: SkillLevel::Beginner,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 9);

    // The created item arrives via a fresh fetch, not a cache splice
    let listed = client.list().await.unwrap();
    assert!(listed.iter().any(|s| s.id == 9));
    assert_eq!(stub.count_calls("skills_list"), 2);
}

#[tokio::test]
async fn update_invalidates_and_surfaces_not_found() {
    let (stub, _transport, client) = skills_stub().await;

    client.list().await.unwrap();
    let updated = client
        .update(
            7,
            &SkillPatch {
                level: Some(SkillLevel::Expert),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.level, SkillLevel::Expert);

    let listed = client.list().await.unwrap();
    assert_eq!(stub.count_calls("skills_list"), 2);
    assert_eq!(
        listed.iter().find(|s| s.id == 7).unwrap().level,
        SkillLevel::Expert
    );

    // Missing id: surfaced, not retried, cache untouched
    let err = client
        .update(999, &SkillPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    client.list().await.unwrap();
    assert_eq!(stub.count_calls("skills_list"), 2);
}

#[tokio::test]
async fn delete_then_list_refetches_exactly_once_after_the_delete() {
    let (stub, _transport, client) = skills_stub().await;

    client.list().await.unwrap();
    client.delete(7).await.unwrap();
    let listed = client.list().await.unwrap();

    assert!(!listed.iter().any(|s| s.id == 7));

    // Call order: exactly one list fetch, strictly after the delete response
    let calls = stub.calls();
    let delete_pos = calls
        .iter()
        .position(|c| c == "skills_delete 7")
        .expect("delete call logged");
    let fetches_after: Vec<_> = calls[delete_pos..]
        .iter()
        .filter(|c| c.as_str() == "skills_list")
        .collect();
    assert_eq!(fetches_after.len(), 1);
    assert_eq!(stub.count_calls("skills_list"), 2);
}

#[tokio::test]
async fn double_delete_surfaces_not_found() {
    let (_stub, _transport, client) = skills_stub().await;

    client.delete(8).await.unwrap();
    let err = client.delete(8).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn failed_mutation_keeps_cache_fresh() {
    let (stub, _transport, client) = skills_stub().await;

    client.list().await.unwrap();
    let _ = client.delete(999).await.unwrap_err();

    // The collection was not touched, so the cached copy is still trusted
    client.list().await.unwrap();
    assert_eq!(stub.count_calls("skills_list"), 1);
}

#[tokio::test]
async fn concurrent_lists_coalesce_into_one_fetch() {
    let (stub, _transport, client) = skills_stub().await;
    let client = Arc::new(client);

    let a = {
        let client = client.clone();
        tokio::spawn(async move { client.list().await.unwrap().len() })
    };
    let b = {
        let client = client.clone();
        tokio::spawn(async move { client.list().await.unwrap().len() })
    };

    assert_eq!(a.await.unwrap(), 2);
    assert_eq!(b.await.unwrap(), 2);
    assert_eq!(stub.count_calls("skills_list"), 1);
}
