#[cfg(test)]
mod tests {
	use crate::{backend::InMemoryBackend, overlay::StateStore, StateBackend};
	use system::{account::Account, actor::ActorInstance, errors::EngineError, event::Event};

	fn test_store() -> StateStore {
		StateStore::new(Box::new(InMemoryBackend::new()))
	}

	#[test]
	fn test_writes_require_an_open_overlay() {
		let mut store = test_store();
		let result = store.storage_set(&[1u8; 20], b"key", b"value");
		assert!(matches!(result, Err(EngineError::InvalidOverlayState(_))));
	}

	#[test]
	fn test_overlay_write_read_fallthrough() {
		let mut store = test_store();
		let actor = [1u8; 20];

		let root = store.open_overlay();
		store.storage_set(&actor, b"counter", b"1").unwrap();

		let child = store.open_overlay();
		// Reads fall through the child layer to the parent.
		assert_eq!(store.storage_get(&actor, b"counter").unwrap(), Some(b"1".to_vec()));

		store.storage_set(&actor, b"counter", b"2").unwrap();
		assert_eq!(store.storage_get(&actor, b"counter").unwrap(), Some(b"2".to_vec()));

		store.commit(child).unwrap();
		assert_eq!(store.storage_get(&actor, b"counter").unwrap(), Some(b"2".to_vec()));

		store.commit(root).unwrap();
		assert_eq!(store.overlay_depth(), 0);
		assert_eq!(store.storage_get(&actor, b"counter").unwrap(), Some(b"2".to_vec()));
	}

	#[test]
	fn test_discard_erases_all_changes() {
		let mut store = test_store();
		let actor = [1u8; 20];

		let root = store.open_overlay();
		store.storage_set(&actor, b"keep", b"yes").unwrap();

		let child = store.open_overlay();
		store.storage_set(&actor, b"keep", b"no").unwrap();
		store.storage_set(&actor, b"drop", b"x").unwrap();
		store.mint(&actor, 100).unwrap();
		store.append_event(Event::new("dropped")).unwrap();
		store.discard(child).unwrap();

		assert_eq!(store.storage_get(&actor, b"keep").unwrap(), Some(b"yes".to_vec()));
		assert_eq!(store.storage_get(&actor, b"drop").unwrap(), None);
		assert_eq!(store.balance(&actor).unwrap(), 0);
		assert!(store.layer_events(root).unwrap().is_empty());
	}

	#[test]
	fn test_removal_shadows_parent_value() {
		let mut store = test_store();
		let actor = [1u8; 20];

		let root = store.open_overlay();
		store.storage_set(&actor, b"key", b"value").unwrap();

		let child = store.open_overlay();
		store.storage_remove(&actor, b"key").unwrap();
		assert_eq!(store.storage_get(&actor, b"key").unwrap(), None);

		store.commit(child).unwrap();
		assert_eq!(store.storage_get(&actor, b"key").unwrap(), None);

		store.commit(root).unwrap();
		assert_eq!(store.storage_get(&actor, b"key").unwrap(), None);
		assert_eq!(store.backend().storage_get(&actor, b"key").unwrap(), None);
	}

	#[test]
	fn test_commit_out_of_order_is_invalid() {
		let mut store = test_store();
		let root = store.open_overlay();
		let _child = store.open_overlay();

		// The root can't commit while the child is still open.
		let result = store.commit(root);
		assert!(matches!(result, Err(EngineError::InvalidOverlayState(_))));
	}

	#[test]
	fn test_commit_after_discard_is_invalid() {
		let mut store = test_store();
		let root = store.open_overlay();
		let child = store.open_overlay();

		store.discard(root).unwrap_err();
		store.discard(child).unwrap();
		store.discard(root).unwrap();

		// Both layers are gone; committing the stale child is a scheduler
		// bug, not a contract failure.
		let result = store.commit(child);
		assert!(matches!(result, Err(EngineError::InvalidOverlayState(_))));
	}

	#[test]
	fn test_events_merge_in_order() {
		let mut store = test_store();

		let root = store.open_overlay();
		store.append_event(Event::new("parent")).unwrap();

		let child = store.open_overlay();
		store.append_event(Event::new("child")).unwrap();
		store.commit(child).unwrap();

		store.append_event(Event::new("reply")).unwrap();

		let events = store.layer_events(root).unwrap();
		let kinds = events.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>();
		assert_eq!(kinds, vec!["parent", "child", "reply"]);
	}

	#[test]
	fn test_transfer() {
		let mut store = test_store();
		let from = [1u8; 20];
		let to = [2u8; 20];

		let root = store.open_overlay();
		store.mint(&from, 100).unwrap();

		store.transfer(&from, &to, 30).unwrap();
		assert_eq!(store.balance(&from).unwrap(), 70);
		assert_eq!(store.balance(&to).unwrap(), 30);

		let result = store.transfer(&from, &to, 100);
		assert!(matches!(result, Err(EngineError::InsufficientBalance { .. })));
		assert_eq!(store.balance(&from).unwrap(), 70);

		// Self-transfer only checks the balance.
		store.transfer(&from, &from, 50).unwrap();
		assert_eq!(store.balance(&from).unwrap(), 70);

		store.commit(root).unwrap();
		assert_eq!(store.balance(&to).unwrap(), 30);
	}

	#[test]
	fn test_transfer_from_unknown_account() {
		let mut store = test_store();
		let _root = store.open_overlay();
		let result = store.transfer(&[1u8; 20], &[2u8; 20], 1);
		assert!(matches!(result, Err(EngineError::InsufficientBalance { balance: 0, .. })));
	}

	#[test]
	fn test_nonce_and_account_creation() {
		let mut store = test_store();
		let address = [1u8; 20];

		let root = store.open_overlay();
		assert_eq!(store.get_nonce(&address).unwrap(), 0);

		store.increment_nonce(&address).unwrap();
		store.increment_nonce(&address).unwrap();
		assert_eq!(store.get_nonce(&address).unwrap(), 2);

		let result = store.create_account(&Account::new(address));
		assert!(matches!(result, Err(EngineError::AddressCollision(_))));

		store.commit(root).unwrap();
		assert_eq!(store.get_nonce(&address).unwrap(), 2);
	}

	#[test]
	fn test_actor_instance_records() {
		let mut store = test_store();
		let instance = ActorInstance {
			instance_address: [7u8; 20],
			code_id: 1,
			creator_address: [1u8; 20],
		};

		let root = store.open_overlay();
		store.create_actor_instance(&instance).unwrap();
		assert_eq!(store.get_instance(&instance.instance_address).unwrap(), Some(instance.clone()));

		let result = store.create_actor_instance(&instance);
		assert!(matches!(result, Err(EngineError::AddressCollision(_))));

		// Migration repoints the record in place.
		let migrated = ActorInstance { code_id: 2, ..instance.clone() };
		store.put_instance(&migrated).unwrap();
		store.commit(root).unwrap();

		assert_eq!(store.get_instance(&instance.instance_address).unwrap().unwrap().code_id, 2);
	}

	#[test]
	fn test_backend_snapshot_roundtrip() {
		let mut backend = InMemoryBackend::new();
		let actor = [3u8; 20];
		backend
			.apply(crate::CommitBatch {
				accounts: vec![Account { address: actor, balance: 42, nonce: 0, account_type: system::account::AccountType::User }],
				instances: vec![ActorInstance { instance_address: actor, code_id: 1, creator_address: [1u8; 20] }],
				storage: vec![(actor, b"key".to_vec(), Some(b"value".to_vec()))],
				events: vec![Event::new("committed")],
			})
			.unwrap();

		let snapshot = backend.snapshot().unwrap();
		let restored = InMemoryBackend::restore(&snapshot).unwrap();

		assert_eq!(restored.storage_get(&actor, b"key").unwrap(), Some(b"value".to_vec()));
		assert_eq!(restored.get_account(&actor).unwrap().unwrap().balance, 42);
		assert_eq!(restored.get_instance(&actor).unwrap().unwrap().code_id, 1);
		assert_eq!(restored.committed_events().len(), 1);
	}
}
