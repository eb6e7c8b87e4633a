//! Spawns admin groups through instantiate sub-calls and learns each new
//! group's address from the success reply.

use crate::admin_group::InstantiateMsg as GroupInstantiateMsg;
use anyhow::{anyhow, Error};
use primitives::*;
use serde::{Deserialize, Serialize};
use system::{
	context::CallContext,
	message::{CallRequest, SubCall},
	reply::{ReplyOutcome, SubCallResult},
	response::CallResponse,
};
use traits::{ActorLogic, CallHost, QueryHost};

const GROUP_CODE_ID_KEY: &[u8] = b"group_code_id";
const GROUPS_KEY: &[u8] = b"groups";

const CREATE_GROUP_REPLY_ID: ReplyId = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantiateMsg {
	pub group_code_id: CodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
	CreateGroup { admins: Vec<Address> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
	Groups {},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupsResp {
	pub groups: Vec<Address>,
}

fn load_groups<H: QueryHost + ?Sized>(host: &H) -> Result<Vec<Address>, Error> {
	match host.storage_get(GROUPS_KEY)? {
		Some(raw) => Ok(serde_json::from_slice(&raw)?),
		None => Ok(Vec::new()),
	}
}

#[derive(Debug)]
pub struct GroupFactoryActor;

impl ActorLogic for GroupFactoryActor {
	fn instantiate(
		&self,
		host: &mut dyn CallHost,
		_ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		let msg: InstantiateMsg = serde_json::from_slice(payload)?;
		host.storage_set(GROUP_CODE_ID_KEY, &msg.group_code_id.to_be_bytes())?;
		host.storage_set(GROUPS_KEY, &serde_json::to_vec(&Vec::<Address>::new())?)?;
		Ok(CallResponse::new())
	}

	fn execute(
		&self,
		host: &mut dyn CallHost,
		_ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		match serde_json::from_slice(payload)? {
			ExecuteMsg::CreateGroup { admins } => {
				let raw = host
					.storage_get(GROUP_CODE_ID_KEY)?
					.ok_or_else(|| anyhow!("factory is not configured"))?;
				let group_code_id = CodeId::from_be_bytes(
					raw.as_slice().try_into().map_err(|_| anyhow!("corrupted group code id"))?,
				);

				let payload = serde_json::to_vec(&GroupInstantiateMsg { admins })?;
				let resp = CallResponse::new()
					.add_attribute("action", "create_group")
					.add_sub_call(SubCall::reply_on_success(
						CREATE_GROUP_REPLY_ID,
						CallRequest::Instantiate { code_id: group_code_id, payload, funds: 0 },
					));
				Ok(resp)
			},
		}
	}

	fn reply(
		&self,
		host: &mut dyn CallHost,
		_ctx: &CallContext,
		outcome: &ReplyOutcome,
	) -> Result<CallResponse, Error> {
		if outcome.id != CREATE_GROUP_REPLY_ID {
			return Err(anyhow!("unknown reply id: {}", outcome.id));
		}
		let group_address = match &outcome.result {
			SubCallResult::Success(success) => success
				.instantiated
				.ok_or_else(|| anyhow!("group instantiation reported no address"))?,
			SubCallResult::Failure { error } =>
				return Err(anyhow!("group instantiation failed: {}", error)),
		};

		let mut groups = load_groups(host)?;
		groups.push(group_address);
		host.storage_set(GROUPS_KEY, &serde_json::to_vec(&groups)?)?;

		let resp = CallResponse::new()
			.add_attribute("group", hex::encode(group_address))
			.set_data(group_address.to_vec());
		Ok(resp)
	}

	fn query(
		&self,
		host: &dyn QueryHost,
		_ctx: &CallContext,
		payload: &Payload,
	) -> Result<ReturnData, Error> {
		match serde_json::from_slice(payload)? {
			QueryMsg::Groups {} => {
				let resp = GroupsResp { groups: load_groups(host)? };
				Ok(serde_json::to_vec(&resp)?)
			},
		}
	}
}
