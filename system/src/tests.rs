#[cfg(test)]
mod tests {
	use crate::{
		account::Account,
		errors::EngineError,
		event::Event,
		message::{CallRequest, Message, MessageKind, ReplyOn, SubCall},
		response::CallResponse,
	};
	use serde::{Deserialize, Serialize};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	#[serde(rename_all = "snake_case")]
	enum SamplePayload {
		AddMembers { members: Vec<String> },
		Leave {},
	}

	#[test]
	fn test_payload_encoding_is_single_field_object() {
		let payload = SamplePayload::AddMembers { members: vec!["alice".to_owned()] };
		let encoded = serde_json::to_string(&payload).unwrap();
		assert_eq!(encoded, r#"{"add_members":{"members":["alice"]}}"#);

		// A variant without fields still serializes as an object, not a
		// bare string, so every payload has the same shape.
		let payload = SamplePayload::Leave {};
		let encoded = serde_json::to_string(&payload).unwrap();
		assert_eq!(encoded, r#"{"leave":{}}"#);

		let decoded: SamplePayload = serde_json::from_str(r#"{"leave":{}}"#).unwrap();
		assert_eq!(decoded, SamplePayload::Leave {});
	}

	#[test]
	fn test_message_kind() {
		let message = Message::Execute { payload: b"{}".to_vec() };
		assert_eq!(message.kind(), MessageKind::Execute);
		assert_eq!(message.kind().as_str(), "execute");
		assert_eq!(message.payload_len(), 2);

		let message = Message::Migrate { new_code_id: 3, payload: vec![] };
		assert_eq!(message.kind(), MessageKind::Migrate);
	}

	#[test]
	fn test_sub_call_constructors() {
		let request = CallRequest::Transfer { to: [9u8; 20], amount: 10 };

		let sub_call = SubCall::new(request.clone());
		assert_eq!(sub_call.reply_on, ReplyOn::Never);
		assert!(!sub_call.reply_on.on_success());
		assert!(!sub_call.reply_on.on_error());

		let sub_call = SubCall::reply_always(7, request);
		assert_eq!(sub_call.id, 7);
		assert!(sub_call.reply_on.on_success());
		assert!(sub_call.reply_on.on_error());
	}

	#[test]
	fn test_response_builder() {
		let response = CallResponse::new()
			.add_attribute("action", "donate")
			.add_event(Event::new("donation").add_attribute("amount", "5"))
			.set_data(b"done".to_vec());

		assert_eq!(response.attributes.len(), 1);
		assert_eq!(response.events[0].kind, "donation");
		assert_eq!(response.data, Some(b"done".to_vec()));
		assert!(response.sub_calls.is_empty());
	}

	#[test]
	fn test_actor_address_is_deterministic() {
		let creator = [1u8; 20];
		let first = Account::actor_address(&creator, 1, 0);
		let again = Account::actor_address(&creator, 1, 0);
		let next_nonce = Account::actor_address(&creator, 1, 1);
		let other_code = Account::actor_address(&creator, 2, 0);

		assert_eq!(first, again);
		assert_ne!(first, next_nonce);
		assert_ne!(first, other_code);
	}

	#[test]
	fn test_fatal_errors() {
		assert!(EngineError::InvalidOverlayState("commit after discard".to_owned()).is_fatal());
		assert!(EngineError::CallDepthExceeded(15).is_fatal());
		assert!(!EngineError::Handler("boom".to_owned()).is_fatal());
		assert!(!EngineError::NoSuchActor(hex::encode([0u8; 20])).is_fatal());
	}
}
