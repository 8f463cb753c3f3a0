use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::store::StoreError;
use crate::testing::{
    document, titles, FakeIdentityProvider, RecordingSurface, ScriptedStore, SurfaceEvent,
};

struct Harness {
    store: Arc<ScriptedStore>,
    surface: Arc<RecordingSurface>,
    identity: Arc<FakeIdentityProvider>,
    sync: NoteListSynchronizer,
    user: UserId,
}

fn harness() -> Harness {
    let store = Arc::new(ScriptedStore::default());
    let surface = Arc::new(RecordingSurface::default());
    let identity = Arc::new(FakeIdentityProvider::signed_in("alice"));
    let sync = NoteListSynchronizer::new(identity.clone(), store.clone(), surface.clone())
        .with_clock(Arc::new(|| 5_i64));
    Harness {
        store,
        surface,
        identity,
        sync,
        user: UserId::new("alice"),
    }
}

/// Seeds A(t=3) and B(t=1), which receive ids "1" and "2".
fn seed_a_b(harness: &Harness) {
    harness.store.inner.seed("alice", document("A", 3)).unwrap();
    harness.store.inner.seed("alice", document("B", 1)).unwrap();
}

#[tokio::test]
async fn starts_uninitialized() {
    let harness = harness();
    assert_eq!(harness.sync.snapshot().await, ListScreen::default());
}

#[tokio::test]
async fn refresh_replaces_list_newest_first() {
    let harness = harness();
    seed_a_b(&harness);

    let notes = harness.sync.refresh(&harness.user).await.unwrap();

    assert_eq!(titles(&notes), vec!["A", "B"]);
    let screen = harness.sync.snapshot().await;
    assert_eq!(screen.phase, ScreenPhase::Populated);
    assert_eq!(screen.notes, notes);
    assert_eq!(
        harness.surface.events(),
        vec![
            SurfaceEvent::Loading,
            SurfaceEvent::Render(vec!["A".to_string(), "B".to_string()]),
        ]
    );
}

#[tokio::test]
async fn empty_fetch_is_populated() {
    let harness = harness();
    let notes = harness.sync.refresh(&harness.user).await.unwrap();
    assert!(notes.is_empty());
    assert_eq!(harness.sync.snapshot().await.phase, ScreenPhase::Populated);
}

#[tokio::test]
async fn save_new_note_then_refresh_shows_it_first() {
    let harness = harness();
    seed_a_b(&harness);
    harness.sync.refresh(&harness.user).await.unwrap();

    let id = harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap();
    assert_eq!(id.as_str(), "3");
    assert_eq!(titles(&harness.sync.notes().await), vec!["A", "B"]);

    harness
        .sync
        .on_completion(CompletionSignal::Added(id.clone()))
        .await
        .unwrap();
    let notes = harness.sync.notes().await;
    assert_eq!(titles(&notes), vec!["C", "A", "B"]);
    assert_eq!(notes[0].id.as_ref(), Some(&id));
    assert_eq!(notes[0].timestamp, 5);
}

#[tokio::test]
async fn save_existing_note_overwrites_every_field() {
    let harness = harness();
    seed_a_b(&harness);
    let mut notes = harness.sync.refresh(&harness.user).await.unwrap();

    let mut edited = notes.remove(1);
    edited.title = "  B2  ".to_string();
    edited.description = "details".to_string();
    let id = harness.sync.save(&harness.user, &edited).await.unwrap();
    assert_eq!(Some(&id), edited.id.as_ref());

    let refreshed = harness.sync.on_visible().await.unwrap();
    assert_eq!(titles(&refreshed), vec!["B2", "A"]);
    assert_eq!(refreshed[0].description, "details");
    assert_eq!(refreshed[0].timestamp, 5);
    assert_eq!(harness.store.inner.document_count("alice"), 2);
}

#[tokio::test]
async fn save_with_empty_title_never_reaches_store() {
    let harness = harness();

    let error = harness
        .sync
        .save(&harness.user, &Note::draft("   ", "body"))
        .await
        .unwrap_err();

    assert_eq!(error, SaveError::EmptyTitle);
    assert_eq!(harness.store.inner.request_count(), 0);
    assert_eq!(harness.surface.messages(), vec!["Title cannot be empty"]);
}

#[tokio::test]
async fn empty_title_is_reported_even_when_signed_out() {
    let harness = harness();
    harness.identity.set_current(None);

    let error = harness
        .sync
        .save(&harness.user, &Note::draft("", ""))
        .await
        .unwrap_err();
    assert_eq!(error, SaveError::EmptyTitle);
}

#[tokio::test]
async fn unauthenticated_save_creates_nothing() {
    let harness = harness();
    harness.identity.set_current(None);

    let error = harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap_err();

    assert_eq!(error, SaveError::NotAuthenticated);
    assert_eq!(harness.store.inner.document_count("alice"), 0);
    assert_eq!(harness.store.inner.request_count(), 0);
}

#[tokio::test]
async fn save_failure_is_reported_and_list_untouched() {
    let harness = harness();
    seed_a_b(&harness);
    harness.sync.refresh(&harness.user).await.unwrap();
    harness
        .store
        .fail_next_save(StoreError::Network("offline".to_string()));

    let error = harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap_err();

    assert_eq!(error, SaveError::Network("offline".to_string()));
    assert_eq!(titles(&harness.sync.notes().await), vec!["A", "B"]);
    assert_eq!(
        harness.surface.messages().last().map(String::as_str),
        Some("Network error: offline")
    );
}

#[tokio::test]
async fn repeated_refresh_without_remote_change_is_stable() {
    let harness = harness();
    seed_a_b(&harness);

    let first = harness.sync.refresh(&harness.user).await.unwrap();
    let second = harness.sync.refresh(&harness.user).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.sync.notes().await, second);
}

#[tokio::test]
async fn failed_refresh_keeps_stale_list() {
    let harness = harness();
    seed_a_b(&harness);
    let before = harness.sync.refresh(&harness.user).await.unwrap();
    harness
        .store
        .fail_next_list(StoreError::PermissionDenied("JWT expired (401)".to_string()));

    let error = harness.sync.refresh(&harness.user).await.unwrap_err();

    assert_eq!(
        error,
        FetchError::PermissionDenied("JWT expired (401)".to_string())
    );
    let screen = harness.sync.snapshot().await;
    assert_eq!(screen.notes, before);
    assert_eq!(
        screen.phase,
        ScreenPhase::Error("Permission denied: JWT expired (401)".to_string())
    );
    assert_eq!(
        harness.surface.messages(),
        vec!["Error loading notes: Permission denied: JWT expired (401)"]
    );
}

#[tokio::test]
async fn refresh_recovers_after_error() {
    let harness = harness();
    seed_a_b(&harness);
    harness
        .store
        .fail_next_list(StoreError::Network("timeout".to_string()));
    harness.sync.refresh(&harness.user).await.unwrap_err();
    assert!(matches!(
        harness.sync.snapshot().await.phase,
        ScreenPhase::Error(_)
    ));

    harness.sync.refresh(&harness.user).await.unwrap();
    assert_eq!(harness.sync.snapshot().await.phase, ScreenPhase::Populated);
}

#[tokio::test]
async fn refresh_for_other_user_is_denied_without_fetch() {
    let harness = harness();

    let error = harness
        .sync
        .refresh(&UserId::new("mallory"))
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::PermissionDenied(_)));
    assert_eq!(harness.store.inner.request_count(), 0);
}

#[tokio::test]
async fn delete_failure_leaves_list_unchanged() {
    let harness = harness();
    seed_a_b(&harness);
    let id = harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap();
    let before = harness.sync.refresh(&harness.user).await.unwrap();
    assert_eq!(titles(&before), vec!["C", "A", "B"]);
    harness
        .store
        .fail_next_delete(StoreError::Network("connection reset".to_string()));

    let error = harness.sync.delete(&harness.user, &id, 0).await.unwrap_err();

    assert_eq!(error, DeleteError::Network("connection reset".to_string()));
    assert_eq!(harness.sync.notes().await, before);
    assert!(!harness
        .surface
        .events()
        .iter()
        .any(|event| matches!(event, SurfaceEvent::RemoveAt(_))));
}

#[tokio::test]
async fn delete_success_removes_exactly_position() {
    let harness = harness();
    seed_a_b(&harness);
    harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap();
    let before = harness.sync.refresh(&harness.user).await.unwrap();
    let target = before[1].id.clone().unwrap();

    harness.sync.delete(&harness.user, &target, 1).await.unwrap();

    let after = harness.sync.notes().await;
    assert_eq!(after, vec![before[0].clone(), before[2].clone()]);
    assert_eq!(harness.store.inner.document_count("alice"), 2);
    let events = harness.surface.events();
    assert!(events.contains(&SurfaceEvent::RemoveAt(1)));
    assert_eq!(harness.surface.messages().last().map(String::as_str), Some("Note deleted"));
}

#[tokio::test]
async fn delete_after_reorder_removes_the_deleted_note() {
    let harness = harness();
    seed_a_b(&harness);
    let before = harness.sync.refresh(&harness.user).await.unwrap();
    let b = before[1].id.clone().unwrap();
    harness.store.inner.seed("alice", document("Z", 9)).unwrap();
    harness.sync.refresh(&harness.user).await.unwrap();

    harness.sync.delete(&harness.user, &b, 1).await.unwrap();

    assert_eq!(titles(&harness.sync.notes().await), vec!["Z", "A"]);
}

#[tokio::test]
async fn unauthenticated_delete_is_rejected() {
    let harness = harness();
    seed_a_b(&harness);
    let before = harness.sync.refresh(&harness.user).await.unwrap();
    harness.identity.set_current(None);

    let id = before[0].id.clone().unwrap();
    let error = harness.sync.delete(&harness.user, &id, 0).await.unwrap_err();

    assert_eq!(error, DeleteError::NotAuthenticated);
    assert_eq!(harness.sync.notes().await, before);
    assert_eq!(harness.store.inner.document_count("alice"), 2);
}

#[tokio::test]
async fn triggers_without_identity_report_permission_denied() {
    let harness = harness();
    harness.identity.set_current(None);

    let error = harness.sync.on_visible().await.unwrap_err();

    assert!(matches!(error, FetchError::PermissionDenied(_)));
    assert_eq!(
        harness.surface.messages(),
        vec!["Error loading notes: Permission denied: User not logged in"]
    );
}

#[tokio::test]
async fn visible_and_completion_triggers_both_refetch() {
    let harness = harness();
    seed_a_b(&harness);
    let id = harness
        .sync
        .save(&harness.user, &Note::draft("C", ""))
        .await
        .unwrap();
    let requests_before = harness.store.inner.request_count();

    let from_signal = harness
        .sync
        .on_completion(CompletionSignal::Added(id))
        .await
        .unwrap();
    let from_visible = harness.sync.on_visible().await.unwrap();

    assert_eq!(from_signal, from_visible);
    assert_eq!(harness.store.inner.request_count(), requests_before + 2);
}

#[tokio::test]
async fn late_refresh_after_detach_is_discarded() {
    let harness = harness();
    seed_a_b(&harness);
    harness.store.hold_lists();

    let sync = harness.sync.clone();
    let user = harness.user.clone();
    let task = tokio::spawn(async move { sync.refresh(&user).await });
    harness.store.wait_for_held_lists(1).await;

    harness.sync.detach().await;
    harness.store.release_list(0);
    let fetched = task.await.unwrap().unwrap();

    assert_eq!(titles(&fetched), vec!["A", "B"]);
    let screen = harness.sync.snapshot().await;
    assert!(screen.notes.is_empty());
    assert_eq!(screen.phase, ScreenPhase::Loading);
    assert_eq!(harness.surface.events(), vec![SurfaceEvent::Loading]);
    assert!(!harness.sync.surface_handle().is_attached());
}

#[tokio::test]
async fn detached_synchronizer_ignores_failures_too() {
    let harness = harness();
    harness.sync.surface_handle().detach();
    harness
        .store
        .fail_next_list(StoreError::Network("offline".to_string()));

    harness.sync.refresh(&harness.user).await.unwrap_err();

    assert_eq!(harness.sync.snapshot().await, ListScreen::default());
    assert!(harness.surface.events().is_empty());
}

#[tokio::test]
async fn last_completed_refresh_wins() {
    let harness = harness();
    seed_a_b(&harness);
    harness.store.hold_lists();

    let older = {
        let sync = harness.sync.clone();
        let user = harness.user.clone();
        tokio::spawn(async move { sync.refresh(&user).await })
    };
    harness.store.wait_for_held_lists(1).await;
    harness.store.inner.seed("alice", document("C", 5)).unwrap();
    let newer = {
        let sync = harness.sync.clone();
        let user = harness.user.clone();
        tokio::spawn(async move { sync.refresh(&user).await })
    };
    harness.store.wait_for_held_lists(2).await;

    harness.store.release_list(1);
    newer.await.unwrap().unwrap();
    assert_eq!(titles(&harness.sync.notes().await), vec!["C", "A", "B"]);

    harness.store.release_list(0);
    older.await.unwrap().unwrap();
    assert_eq!(titles(&harness.sync.notes().await), vec!["A", "B"]);
}

#[test]
fn remove_confirmed_ignores_unknown_note() {
    let mut notes = vec![document("A", 1).into_note(NoteId::new("1").unwrap())];
    let missing = NoteId::new("9").unwrap();
    assert_eq!(remove_confirmed(&mut notes, &missing, 5), None);
    assert_eq!(notes.len(), 1);
}

#[test]
fn completion_signal_exposes_note_id() {
    let id = NoteId::new("7").unwrap();
    assert_eq!(CompletionSignal::Updated(id.clone()).note_id(), &id);
}
