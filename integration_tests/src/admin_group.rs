//! A group-membership actor: a list of admins who can extend the group,
//! leave it, and receive donated native tokens split evenly between them.

use anyhow::Error;
use primitives::*;
use serde::{Deserialize, Serialize};
use system::{
	context::CallContext,
	message::{CallRequest, SubCall},
	response::CallResponse,
};
use traits::{ActorLogic, CallHost, QueryHost};

const ADMINS_KEY: &[u8] = b"admins";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantiateMsg {
	pub admins: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
	AddMembers { admins: Vec<Address> },
	Leave {},
	Donate {},
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
	AdminsList {},
	JoinTime { admin: Address },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminsListResp {
	pub admins: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinTimeResp {
	pub joined: BlockNumber,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ContractError {
	#[error("{sender} is not a group admin")]
	Unauthorized { sender: String },
	#[error("a group needs at least one admin")]
	EmptyAdminList,
	#[error("the group has no admins to donate to")]
	NoAdmins,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdminRecord {
	address: Address,
	joined: BlockNumber,
}

fn load_admins<H: QueryHost + ?Sized>(host: &H) -> Result<Vec<AdminRecord>, Error> {
	match host.storage_get(ADMINS_KEY)? {
		Some(raw) => Ok(serde_json::from_slice(&raw)?),
		None => Ok(Vec::new()),
	}
}

fn save_admins(host: &mut dyn CallHost, admins: &[AdminRecord]) -> Result<(), Error> {
	host.storage_set(ADMINS_KEY, &serde_json::to_vec(admins)?)
}

#[derive(Debug)]
pub struct AdminGroupActor;

impl ActorLogic for AdminGroupActor {
	fn instantiate(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		let msg: InstantiateMsg = serde_json::from_slice(payload)?;
		if msg.admins.is_empty() {
			return Err(ContractError::EmptyAdminList.into());
		}

		let admins = msg
			.admins
			.into_iter()
			.map(|address| AdminRecord { address, joined: ctx.block.block_number })
			.collect::<Vec<_>>();
		save_admins(host, &admins)?;

		Ok(CallResponse::new())
	}

	fn execute(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		match serde_json::from_slice(payload)? {
			ExecuteMsg::AddMembers { admins } => exec::add_members(host, ctx, admins),
			ExecuteMsg::Leave {} => exec::leave(host, ctx),
			ExecuteMsg::Donate {} => exec::donate(host, ctx),
		}
	}

	fn query(
		&self,
		host: &dyn QueryHost,
		_ctx: &CallContext,
		payload: &Payload,
	) -> Result<ReturnData, Error> {
		match serde_json::from_slice(payload)? {
			QueryMsg::AdminsList {} => {
				let admins = load_admins(host)?;
				let resp = AdminsListResp {
					admins: admins.iter().map(|record| record.address).collect(),
				};
				Ok(serde_json::to_vec(&resp)?)
			},
			QueryMsg::JoinTime { admin } => {
				let admins = load_admins(host)?;
				let record = admins
					.iter()
					.find(|record| record.address == admin)
					.ok_or(ContractError::Unauthorized { sender: hex::encode(admin) })?;
				Ok(serde_json::to_vec(&JoinTimeResp { joined: record.joined })?)
			},
		}
	}
}

mod exec {
	use super::*;

	pub fn add_members(
		host: &mut dyn CallHost,
		ctx: &CallContext,
		new_admins: Vec<Address>,
	) -> Result<CallResponse, Error> {
		let mut admins = load_admins(host)?;
		if !admins.iter().any(|record| record.address == ctx.caller) {
			return Err(ContractError::Unauthorized { sender: hex::encode(ctx.caller) }.into());
		}

		let mut added = 0u32;
		for address in new_admins {
			if !admins.iter().any(|record| record.address == address) {
				admins.push(AdminRecord { address, joined: ctx.block.block_number });
				added += 1;
			}
		}
		save_admins(host, &admins)?;

		let resp = CallResponse::new()
			.add_attribute("action", "add_members")
			.add_attribute("added", added.to_string());
		Ok(resp)
	}

	pub fn leave(host: &mut dyn CallHost, ctx: &CallContext) -> Result<CallResponse, Error> {
		let mut admins = load_admins(host)?;
		admins.retain(|record| record.address != ctx.caller);
		save_admins(host, &admins)?;

		let resp = CallResponse::new()
			.add_attribute("action", "leave")
			.add_attribute("sender", hex::encode(ctx.caller));
		Ok(resp)
	}

	pub fn donate(host: &mut dyn CallHost, ctx: &CallContext) -> Result<CallResponse, Error> {
		let admins = load_admins(host)?;
		if admins.is_empty() {
			return Err(ContractError::NoAdmins.into());
		}

		let donation = ctx.funds;
		let donation_per_admin = donation / (admins.len() as Balance);

		let mut resp = CallResponse::new()
			.add_attribute("action", "donate")
			.add_attribute("amount", donation.to_string())
			.add_attribute("per_admin", donation_per_admin.to_string());

		if donation_per_admin > 0 {
			for record in admins {
				resp = resp.add_sub_call(SubCall::new(CallRequest::Transfer {
					to: record.address,
					amount: donation_per_admin,
				}));
			}
		}

		Ok(resp)
	}
}
