//! Ownership checks run before every update/delete.

use crate::error::{RoteiroError, RoteiroResult};
use crate::model::EntityKind;
use crate::shape::WriteData;
use crate::storage::Store;

/// Fails with `Forbidden` unless `id` names a `kind` row owned by `user_id`.
///
/// A missing row and somebody else's row are reported the same way.
pub fn assert_owner(
    store: &Store,
    kind: EntityKind,
    id: &str,
    user_id: &str,
) -> RoteiroResult<()> {
    if store.exists(kind, id, user_id)? {
        Ok(())
    } else {
        tracing::info!(kind = %kind, id, user_id, "ownership check failed");
        Err(RoteiroError::Forbidden)
    }
}

/// Every record a write would connect to must also belong to the caller.
pub fn assert_refs_owned(store: &Store, data: &WriteData, user_id: &str) -> RoteiroResult<()> {
    for (kind, id) in data.references() {
        assert_owner(store, kind, id, user_id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::clean;
    use serde_json::json;

    fn setup() -> (Store, String, String) {
        let store = Store::memory().unwrap();
        store.init_schema().unwrap();
        let alice = store.create_user("alice@example.com", "h").unwrap().id;
        let bob = store.create_user("bob@example.com", "h").unwrap().id;
        (store, alice, bob)
    }

    #[test]
    fn owner_is_allowed_and_others_are_denied() {
        let (store, alice, bob) = setup();
        let owned = |args: serde_json::Value| clean(args).unwrap().owned_by(&alice);

        let start = store.create_position(&owned(json!({ "name": "Guard" }))).unwrap();
        let end = store.create_position(&owned(json!({ "name": "Mount" }))).unwrap();
        let tag = store.create_tag(&owned(json!({ "name": "gi" }))).unwrap();
        let topic = store.create_topic(&owned(json!({ "name": "Pressure" }))).unwrap();
        let submission = store
            .create_submission(&owned(json!({
                "name": "Armbar",
                "position": start.id,
                "tags": [tag.id],
            })))
            .unwrap();
        let transition = store
            .create_transition(&owned(json!({
                "name": "Sweep",
                "startPosition": start.id,
                "endPosition": end.id,
            })))
            .unwrap();

        for kind in EntityKind::ALL {
            let id = match kind {
                EntityKind::Position => &start.id,
                EntityKind::Submission => &submission.id,
                EntityKind::Transition => &transition.id,
                EntityKind::Tag => &tag.id,
                EntityKind::Topic => &topic.id,
            };
            assert!(assert_owner(&store, kind, id, &alice).is_ok(), "{}", kind);
            assert!(
                matches!(
                    assert_owner(&store, kind, id, &bob),
                    Err(RoteiroError::Forbidden)
                ),
                "{}",
                kind
            );
        }
    }

    #[test]
    fn missing_record_is_forbidden() {
        let (store, alice, _) = setup();
        let err = assert_owner(&store, EntityKind::Submission, "ghost", &alice).unwrap_err();
        assert!(matches!(err, RoteiroError::Forbidden));
    }

    #[test]
    fn foreign_references_are_rejected() {
        let (store, alice, bob) = setup();
        let bobs_position = store
            .create_position(&clean(json!({ "name": "bob's" })).unwrap().owned_by(&bob))
            .unwrap();
        let alices_tag = store
            .create_tag(&clean(json!({ "name": "mine" })).unwrap().owned_by(&alice))
            .unwrap();

        let data = clean(json!({ "name": "x", "tags": [alices_tag.id] })).unwrap();
        assert!(assert_refs_owned(&store, &data, &alice).is_ok());

        let data = clean(json!({
            "name": "x",
            "position": bobs_position.id,
            "tags": [alices_tag.id],
        }))
        .unwrap();
        assert!(matches!(
            assert_refs_owned(&store, &data, &alice),
            Err(RoteiroError::Forbidden)
        ));
    }
}
