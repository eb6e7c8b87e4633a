#[cfg(test)]
mod tests {
	use crate::admin_group::{
		AdminGroupActor, AdminsListResp, ExecuteMsg, InstantiateMsg, JoinTimeResp, QueryMsg,
	};
	use execute::ActorRuntime;
	use primitives::*;
	use std::sync::Arc;

	const OWNER: Address = [0x01; 20];
	const ADMIN1: Address = [0xd1; 20];
	const ADMIN2: Address = [0xd2; 20];
	const ADMIN3: Address = [0xd3; 20];
	const USER: Address = [0x99; 20];

	fn setup() -> (ActorRuntime, CodeId) {
		let _ = env_logger::builder().is_test(true).try_init();
		let mut runtime = ActorRuntime::new();
		let code_id = runtime.store_code(Arc::new(AdminGroupActor));
		(runtime, code_id)
	}

	fn instantiate_group(runtime: &mut ActorRuntime, code_id: CodeId, admins: Vec<Address>) -> Address {
		let payload = serde_json::to_vec(&InstantiateMsg { admins }).unwrap();
		let receipt = runtime.instantiate(&OWNER, code_id, payload, 0);
		assert!(receipt.is_success(), "instantiate failed: {:?}", receipt.error);
		receipt.instantiated_address().unwrap()
	}

	fn query_admins(runtime: &ActorRuntime, group: &Address) -> Vec<Address> {
		let payload = serde_json::to_vec(&QueryMsg::AdminsList {}).unwrap();
		let resp: AdminsListResp = serde_json::from_slice(&runtime.query(group, &payload).unwrap()).unwrap();
		resp.admins
	}

	fn query_join_time(runtime: &ActorRuntime, group: &Address, admin: Address) -> Result<BlockNumber, String> {
		let payload = serde_json::to_vec(&QueryMsg::JoinTime { admin }).unwrap();
		match runtime.query(group, &payload) {
			Ok(raw) => {
				let resp: JoinTimeResp = serde_json::from_slice(&raw).unwrap();
				Ok(resp.joined)
			},
			Err(error) => Err(error.to_string()),
		}
	}

	fn execute_msg(
		runtime: &mut ActorRuntime,
		caller: &Address,
		group: &Address,
		msg: &ExecuteMsg,
		funds: Balance,
	) -> system::receipt::CallReceipt {
		runtime.execute(caller, group, serde_json::to_vec(msg).unwrap(), funds)
	}

	#[test]
	fn instantiation() {
		let (mut runtime, code_id) = setup();

		// An empty admin list is rejected.
		let payload = serde_json::to_vec(&InstantiateMsg { admins: vec![] }).unwrap();
		let receipt = runtime.instantiate(&OWNER, code_id, payload, 0);
		assert!(!receipt.is_success());
		assert!(receipt.error_message().contains("at least one admin"));

		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1, ADMIN2]);
		assert_eq!(query_admins(&runtime, &group), vec![ADMIN1, ADMIN2]);

		let block = runtime.block_info();
		assert_eq!(query_join_time(&runtime, &group, ADMIN1).unwrap(), block.block_number);
		assert_eq!(query_join_time(&runtime, &group, ADMIN2).unwrap(), block.block_number);

		let error = query_join_time(&runtime, &group, ADMIN3).unwrap_err();
		assert!(error.contains("is not a group admin"));
	}

	#[test]
	fn donations() {
		let (mut runtime, code_id) = setup();
		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1, ADMIN2]);
		runtime.mint(&USER, 5).unwrap();

		let receipt = execute_msg(&mut runtime, &USER, &group, &ExecuteMsg::Donate {}, 5);
		assert!(receipt.is_success(), "donate failed: {:?}", receipt.error);

		assert_eq!(runtime.balance(&USER).unwrap(), 0);
		// The indivisible remainder stays with the group.
		assert_eq!(runtime.balance(&group).unwrap(), 1);
		assert_eq!(runtime.balance(&ADMIN1).unwrap(), 2);
		assert_eq!(runtime.balance(&ADMIN2).unwrap(), 2);

		let kinds = receipt.events.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>();
		assert_eq!(kinds, vec!["execute", "transfer", "transfer"]);
	}

	#[test]
	fn add_members() {
		let (mut runtime, code_id) = setup();
		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1]);
		runtime.advance_block();

		let receipt = execute_msg(
			&mut runtime,
			&ADMIN1,
			&group,
			&ExecuteMsg::AddMembers { admins: vec![ADMIN2, ADMIN1] },
			0,
		);
		assert!(receipt.is_success());
		assert_eq!(query_admins(&runtime, &group), vec![ADMIN1, ADMIN2]);

		// Only the genuinely new member was added, at the current block.
		assert_eq!(receipt.events[0].attributes[1].value, "1");
		assert_eq!(query_join_time(&runtime, &group, ADMIN1).unwrap(), 1);
		assert_eq!(query_join_time(&runtime, &group, ADMIN2).unwrap(), 2);
	}

	#[test]
	fn add_members_unauthorized() {
		let (mut runtime, code_id) = setup();
		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1]);

		let receipt = execute_msg(
			&mut runtime,
			&USER,
			&group,
			&ExecuteMsg::AddMembers { admins: vec![ADMIN2] },
			0,
		);
		assert!(!receipt.is_success());
		assert!(receipt.error_message().contains("is not a group admin"));
		assert_eq!(query_admins(&runtime, &group), vec![ADMIN1]);
	}

	#[test]
	fn leave_and_donate_to_remaining_admin() {
		let (mut runtime, code_id) = setup();
		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1, ADMIN2]);

		let receipt = execute_msg(&mut runtime, &ADMIN1, &group, &ExecuteMsg::Leave {}, 0);
		assert!(receipt.is_success());
		assert_eq!(query_admins(&runtime, &group), vec![ADMIN2]);

		runtime.mint(&USER, 5).unwrap();
		let receipt = execute_msg(&mut runtime, &USER, &group, &ExecuteMsg::Donate {}, 5);
		assert!(receipt.is_success());
		assert_eq!(runtime.balance(&ADMIN2).unwrap(), 5);
		assert_eq!(runtime.balance(&group).unwrap(), 0);
	}

	#[test]
	fn donation_to_empty_group_rolls_back_funds() {
		let (mut runtime, code_id) = setup();
		let group = instantiate_group(&mut runtime, code_id, vec![ADMIN1]);
		execute_msg(&mut runtime, &ADMIN1, &group, &ExecuteMsg::Leave {}, 0);
		assert!(query_admins(&runtime, &group).is_empty());

		runtime.mint(&USER, 5).unwrap();
		let receipt = execute_msg(&mut runtime, &USER, &group, &ExecuteMsg::Donate {}, 5);
		assert!(!receipt.is_success());
		assert!(receipt.error_message().contains("no admins to donate to"));

		// The attached donation moved with the frame and rolled back with it.
		assert_eq!(runtime.balance(&USER).unwrap(), 5);
		assert_eq!(runtime.balance(&group).unwrap(), 0);
	}
}
