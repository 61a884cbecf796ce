use super::{Endpoint, Store};
use crate::error::RoteiroError;
use crate::model::EntityKind;
use crate::relation::diff;
use crate::shape::{clean, WriteData};
use serde_json::json;

fn store() -> Store {
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    store
}

fn write(args: serde_json::Value, user_id: &str) -> WriteData {
    clean(args).unwrap().owned_by(user_id)
}

#[test]
fn test_init_schema_is_idempotent() {
    let store = store();
    store.init_schema().unwrap();
}

#[test]
fn test_open_on_disk_persists_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roteiro.db");

    let user_id = {
        let store = Store::open(&path).unwrap();
        store.init_schema().unwrap();
        store.create_user("a@b.com", "hash").unwrap().id
    };

    let reopened = Store::open(&path).unwrap();
    let user = reopened.user_by_email("a@b.com").unwrap().unwrap();
    assert_eq!(user.id, user_id);
}

#[test]
fn test_duplicate_email_is_email_in_use() {
    let store = store();
    store.create_user("a@b.com", "h1").unwrap();
    let err = store.create_user("a@b.com", "h2").unwrap_err();
    assert!(matches!(err, RoteiroError::EmailInUse));
}

#[test]
fn test_set_password_replaces_hash() {
    let store = store();
    let user = store.create_user("a@b.com", "old").unwrap();
    store.set_password(&user.id, "new").unwrap();
    assert_eq!(store.user_by_id(&user.id).unwrap().unwrap().password, "new");
    assert!(store.set_password("missing", "x").is_err());
}

#[test]
fn test_rows_are_scoped_by_user() {
    let store = store();
    let alice = store.create_user("alice@example.com", "h").unwrap();
    let bob = store.create_user("bob@example.com", "h").unwrap();

    let pos = store
        .create_position(&write(json!({ "name": "Closed guard" }), &alice.id))
        .unwrap();

    assert_eq!(store.positions(&alice.id).unwrap().len(), 1);
    assert!(store.positions(&bob.id).unwrap().is_empty());
    assert!(store.position(&pos.id, &bob.id).unwrap().is_none());
    assert!(store.exists(EntityKind::Position, &pos.id, &alice.id).unwrap());
    assert!(!store.exists(EntityKind::Position, &pos.id, &bob.id).unwrap());
}

#[test]
fn test_update_is_partial() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let topic = store
        .create_topic(&write(
            json!({ "name": "Escapes", "notes": ["hips out"] }),
            &user.id,
        ))
        .unwrap();

    let updated = store
        .update_topic(&topic.id, &clean(json!({ "id": topic.id, "name": "Escapes 2" })).unwrap())
        .unwrap();
    assert_eq!(updated.name, "Escapes 2");
    assert_eq!(updated.notes, vec!["hips out"]);
    assert!(updated.updated_at >= topic.updated_at);

    let updated = store
        .update_topic(&topic.id, &clean(json!({ "notes": [] })).unwrap())
        .unwrap();
    assert_eq!(updated.name, "Escapes 2");
    assert!(updated.notes.is_empty());
}

#[test]
fn test_submission_tags_follow_diff() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let pos = store
        .create_position(&write(json!({ "name": "Mount" }), &user.id))
        .unwrap();
    let t1 = store.create_tag(&write(json!({ "name": "gi" }), &user.id)).unwrap();
    let t2 = store.create_tag(&write(json!({ "name": "nogi" }), &user.id)).unwrap();
    let t3 = store.create_tag(&write(json!({ "name": "fav" }), &user.id)).unwrap();

    let sub = store
        .create_submission(&write(
            json!({
                "name": "Armbar",
                "steps": ["isolate arm", "hips up"],
                "position": pos.id,
                "tags": [t1.id, t2.id],
            }),
            &user.id,
        ))
        .unwrap();

    let mut expected = vec![t1.id.clone(), t2.id.clone()];
    expected.sort();
    assert_eq!(store.submission_tag_ids(&sub.id).unwrap(), expected);

    let current = store.submission_tag_ids(&sub.id).unwrap();
    let data = clean(json!({}))
        .unwrap()
        .with_tag_diff(diff(current, [t2.id.clone(), t3.id.clone()]));
    store.update_submission(&sub.id, &data).unwrap();

    let mut expected = vec![t2.id.clone(), t3.id.clone()];
    expected.sort();
    assert_eq!(store.submission_tag_ids(&sub.id).unwrap(), expected);

    let names: Vec<_> = store
        .tags_for_submission(&sub.id, &user.id)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["fav", "nogi"]);
    assert_eq!(store.submissions_for_tag(&t3.id, &user.id).unwrap().len(), 1);
    assert!(store.submissions_for_tag(&t1.id, &user.id).unwrap().is_empty());
}

#[test]
fn test_tag_set_is_diffed_against_links_at_write_time() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let pos = store
        .create_position(&write(json!({ "name": "Mount" }), &user.id))
        .unwrap();
    let t1 = store.create_tag(&write(json!({ "name": "gi" }), &user.id)).unwrap();
    let t2 = store.create_tag(&write(json!({ "name": "nogi" }), &user.id)).unwrap();
    let t3 = store.create_tag(&write(json!({ "name": "fav" }), &user.id)).unwrap();
    let sub = store
        .create_submission(&write(
            json!({ "name": "Armbar", "position": pos.id, "tags": [t1.id] }),
            &user.id,
        ))
        .unwrap();

    // Both requests are shaped while the links are still {t1}.
    let first = clean(json!({})).unwrap().with_tag_set(vec![t2.id.clone()]);
    let second = clean(json!({}))
        .unwrap()
        .with_tag_set(vec![t1.id.clone(), t3.id.clone()]);

    store.update_submission(&sub.id, &second).unwrap();
    store.update_submission(&sub.id, &first).unwrap();
    assert_eq!(store.submission_tag_ids(&sub.id).unwrap(), vec![t2.id.clone()]);

    store.update_submission(&sub.id, &second).unwrap();
    let mut expected = vec![t1.id.clone(), t3.id.clone()];
    expected.sort();
    assert_eq!(store.submission_tag_ids(&sub.id).unwrap(), expected);

    let clear = clean(json!({})).unwrap().with_tag_set(Vec::new());
    store.update_submission(&sub.id, &clear).unwrap();
    assert!(store.submission_tag_ids(&sub.id).unwrap().is_empty());
}

#[test]
fn test_transition_tag_set_interleaved() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let a = store
        .create_position(&write(json!({ "name": "Guard" }), &user.id))
        .unwrap();
    let b = store
        .create_position(&write(json!({ "name": "Mount" }), &user.id))
        .unwrap();
    let t1 = store.create_tag(&write(json!({ "name": "gi" }), &user.id)).unwrap();
    let t2 = store.create_tag(&write(json!({ "name": "nogi" }), &user.id)).unwrap();
    let t3 = store.create_tag(&write(json!({ "name": "fav" }), &user.id)).unwrap();
    let tr = store
        .create_transition(&write(
            json!({
                "name": "Sweep",
                "startPosition": a.id,
                "endPosition": b.id,
                "tags": [t1.id],
            }),
            &user.id,
        ))
        .unwrap();

    let first = clean(json!({})).unwrap().with_tag_set(vec![t2.id.clone()]);
    let second = clean(json!({}))
        .unwrap()
        .with_tag_set(vec![t1.id.clone(), t3.id.clone()]);
    store.update_transition(&tr.id, &second).unwrap();
    store.update_transition(&tr.id, &first).unwrap();

    assert_eq!(store.transition_tag_ids(&tr.id).unwrap(), vec![t2.id.clone()]);
}

#[test]
fn test_concurrent_tag_sets_leave_one_winner() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let pos = store
        .create_position(&write(json!({ "name": "Mount" }), &user.id))
        .unwrap();
    let tags: Vec<String> = ["gi", "nogi", "fav", "comp"]
        .iter()
        .map(|name| {
            store
                .create_tag(&write(json!({ "name": name }), &user.id))
                .unwrap()
                .id
        })
        .collect();
    let sub = store
        .create_submission(&write(
            json!({ "name": "Armbar", "position": pos.id, "tags": [tags[0]] }),
            &user.id,
        ))
        .unwrap();

    let mut left = vec![tags[1].clone()];
    let mut right = vec![tags[0].clone(), tags[2].clone(), tags[3].clone()];
    left.sort();
    right.sort();

    std::thread::scope(|scope| {
        for desired in [left.clone(), right.clone()] {
            let store = store.clone();
            let id = sub.id.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let data = clean(json!({})).unwrap().with_tag_set(desired.clone());
                    store.update_submission(&id, &data).unwrap();
                }
            });
        }
    });

    let last = store.submission_tag_ids(&sub.id).unwrap();
    assert!(last == left || last == right, "mixed tag set: {:?}", last);
}

#[test]
fn test_transition_endpoints_and_cascade() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let guard = store
        .create_position(&write(json!({ "name": "Guard" }), &user.id))
        .unwrap();
    let mount = store
        .create_position(&write(json!({ "name": "Mount" }), &user.id))
        .unwrap();
    let tag = store.create_tag(&write(json!({ "name": "sweep" }), &user.id)).unwrap();

    let tr = store
        .create_transition(&write(
            json!({
                "name": "Flower sweep",
                "startPosition": guard.id,
                "endPosition": mount.id,
                "tags": [tag.id],
            }),
            &user.id,
        ))
        .unwrap();
    store
        .create_submission(&write(
            json!({ "name": "Triangle", "position": guard.id }),
            &user.id,
        ))
        .unwrap();

    assert_eq!(
        store.transitions_at(&guard.id, Endpoint::Start, &user.id).unwrap()[0].id,
        tr.id
    );
    assert_eq!(
        store.transitions_at(&mount.id, Endpoint::End, &user.id).unwrap()[0].id,
        tr.id
    );
    assert!(store
        .transitions_at(&guard.id, Endpoint::End, &user.id)
        .unwrap()
        .is_empty());
    assert_eq!(store.transitions_for_tag(&tag.id, &user.id).unwrap().len(), 1);

    store.delete(EntityKind::Position, &guard.id).unwrap();
    assert!(store.transitions(&user.id).unwrap().is_empty());
    assert!(store.submissions(&user.id).unwrap().is_empty());
    assert_eq!(store.tags(&user.id).unwrap().len(), 1);
}

#[test]
fn test_deleting_tag_unlinks_it() {
    let store = store();
    let user = store.create_user("a@b.com", "h").unwrap();
    let pos = store
        .create_position(&write(json!({ "name": "Back" }), &user.id))
        .unwrap();
    let tag = store.create_tag(&write(json!({ "name": "choke" }), &user.id)).unwrap();
    let sub = store
        .create_submission(&write(
            json!({ "name": "RNC", "position": pos.id, "tags": [tag.id] }),
            &user.id,
        ))
        .unwrap();

    assert_eq!(store.delete(EntityKind::Tag, &tag.id).unwrap(), tag.id);
    assert!(store.submission_tag_ids(&sub.id).unwrap().is_empty());
    assert!(store.submission(&sub.id, &user.id).unwrap().is_some());
}

#[test]
fn test_delete_missing_row_is_forbidden() {
    let store = store();
    let err = store.delete(EntityKind::Topic, "nope").unwrap_err();
    assert!(matches!(err, RoteiroError::Forbidden));
}

#[test]
fn test_create_requires_owner_and_name() {
    let store = store();
    assert!(store
        .create_tag(&clean(json!({ "name": "orphan" })).unwrap())
        .is_err());
    let user = store.create_user("a@b.com", "h").unwrap();
    assert!(store
        .create_tag(&clean(json!({})).unwrap().owned_by(&user.id))
        .is_err());
}
