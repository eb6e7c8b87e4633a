//! Scriptable fixture actors for the engine tests: a plan-driven actor
//! whose payload tells it what to write, emit, schedule and whether to
//! fail, plus a couple of minimal actors for migration and routing cases.

use crate::ActorRuntime;
use anyhow::{anyhow, Error};
use primitives::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use system::{
	context::CallContext,
	message::{CallRequest, ReplyOn, SubCall},
	reply::{ReplyOutcome, SubCallResult},
	response::CallResponse,
};
use traits::{ActorLogic, CallHost, QueryHost};

pub const ALICE: Address = [0xa1; 20];
pub const BOB: Address = [0xb0; 20];

/// Fresh runtime with the scripted actor registered.
pub fn scripted_runtime() -> (ActorRuntime, CodeId) {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut runtime = ActorRuntime::new();
	let code_id = runtime.store_code(Arc::new(ScriptedActor));
	(runtime, code_id)
}

/// Instantiates a scripted actor with an empty plan.
pub fn spawn_scripted(runtime: &mut ActorRuntime, code_id: CodeId) -> Address {
	let receipt = runtime.instantiate(&ALICE, code_id, Plan::new().payload(), 0);
	assert!(receipt.is_success(), "instantiate failed: {:?}", receipt.error);
	receipt.instantiated_address().unwrap()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
	#[serde(default)]
	pub attributes: Vec<(String, String)>,
	#[serde(default)]
	pub writes: Vec<(String, String)>,
	#[serde(default)]
	pub data: Option<String>,
	#[serde(default)]
	pub sub_calls: Vec<PlanSubCall>,
	#[serde(default)]
	pub fail: Option<String>,
	/// Schedule one more execution of this same plan against self.
	#[serde(default)]
	pub recurse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSubCall {
	pub id: ReplyId,
	pub reply_on: ReplyOn,
	pub request: PlanRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanRequest {
	Execute { actor: Address, plan: Box<Plan>, funds: Balance },
	Instantiate { code_id: CodeId, plan: Box<Plan>, funds: Balance },
	Transfer { to: Address, amount: Balance },
}

impl Plan {
	pub fn new() -> Plan {
		Plan::default()
	}

	pub fn attr(mut self, key: &str, value: &str) -> Plan {
		self.attributes.push((key.to_owned(), value.to_owned()));
		self
	}

	pub fn write(mut self, key: &str, value: &str) -> Plan {
		self.writes.push((key.to_owned(), value.to_owned()));
		self
	}

	pub fn data(mut self, data: &str) -> Plan {
		self.data = Some(data.to_owned());
		self
	}

	pub fn fail(mut self, message: &str) -> Plan {
		self.fail = Some(message.to_owned());
		self
	}

	pub fn sub_call(mut self, id: ReplyId, reply_on: ReplyOn, request: PlanRequest) -> Plan {
		self.sub_calls.push(PlanSubCall { id, reply_on, request });
		self
	}

	pub fn recurse(mut self) -> Plan {
		self.recurse = true;
		self
	}

	/// Stores a continuation the reply handler picks up for this id.
	pub fn reply_plan(self, id: ReplyId, plan: &Plan) -> Plan {
		let value = serde_json::to_string(plan).expect("plan serializes");
		self.write(&format!("reply_plan_{}", id), &value)
	}

	pub fn payload(&self) -> Payload {
		serde_json::to_vec(self).expect("plan serializes")
	}
}

pub fn exec_plan(actor: Address, plan: Plan) -> PlanRequest {
	PlanRequest::Execute { actor, plan: Box::new(plan), funds: 0 }
}

pub fn exec_plan_funded(actor: Address, plan: Plan, funds: Balance) -> PlanRequest {
	PlanRequest::Execute { actor, plan: Box::new(plan), funds }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanQuery {
	Get { key: String },
	BalanceOf { address: Address },
	Relay { target: Address, query: Box<PlanQuery> },
}

impl PlanQuery {
	pub fn payload(&self) -> Payload {
		serde_json::to_vec(self).expect("query serializes")
	}
}

#[derive(Debug)]
pub struct ScriptedActor;

impl ScriptedActor {
	fn apply(plan: &Plan, host: &mut dyn CallHost, ctx: &CallContext) -> Result<CallResponse, Error> {
		for (key, value) in &plan.writes {
			host.storage_set(key.as_bytes(), value.as_bytes())?;
		}
		if let Some(message) = &plan.fail {
			return Err(anyhow!("{}", message));
		}

		let mut response = CallResponse::new();
		for (key, value) in &plan.attributes {
			response = response.add_attribute(key.clone(), value.clone());
		}
		for sub_call in &plan.sub_calls {
			response = response.add_sub_call(SubCall {
				id: sub_call.id,
				reply_on: sub_call.reply_on,
				request: resolve_request(&sub_call.request),
			});
		}
		if plan.recurse {
			response = response.add_sub_call(SubCall::new(CallRequest::Execute {
				actor: ctx.actor_address,
				payload: plan.payload(),
				funds: 0,
			}));
		}
		if let Some(data) = &plan.data {
			response = response.set_data(data.clone().into_bytes());
		}
		Ok(response)
	}
}

fn resolve_request(request: &PlanRequest) -> CallRequest {
	match request {
		PlanRequest::Execute { actor, plan, funds } =>
			CallRequest::Execute { actor: *actor, payload: plan.payload(), funds: *funds },
		PlanRequest::Instantiate { code_id, plan, funds } =>
			CallRequest::Instantiate { code_id: *code_id, payload: plan.payload(), funds: *funds },
		PlanRequest::Transfer { to, amount } =>
			CallRequest::Transfer { to: *to, amount: *amount },
	}
}

impl ActorLogic for ScriptedActor {
	fn instantiate(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		let plan: Plan = serde_json::from_slice(payload)?;
		ScriptedActor::apply(&plan, host, ctx)
	}

	fn execute(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		let plan: Plan = serde_json::from_slice(payload)?;
		ScriptedActor::apply(&plan, host, ctx)
	}

	fn sudo(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		payload: &Payload,
	) -> Result<CallResponse, Error> {
		let plan: Plan = serde_json::from_slice(payload)?;
		ScriptedActor::apply(&plan, host, ctx)
	}

	fn reply(
		&self,
		host: &mut dyn CallHost,
		ctx: &CallContext,
		outcome: &ReplyOutcome,
	) -> Result<CallResponse, Error> {
		let marker = match &outcome.result {
			SubCallResult::Success(_) => "success",
			SubCallResult::Failure { .. } => "error",
		};
		host.storage_set(format!("reply_seen_{}", outcome.id).as_bytes(), marker.as_bytes())?;

		let plan_key = format!("reply_plan_{}", outcome.id);
		let mut response = match host.storage_get(plan_key.as_bytes())? {
			Some(raw) => {
				let plan: Plan = serde_json::from_slice(&raw)?;
				ScriptedActor::apply(&plan, host, ctx)?
			},
			None => CallResponse::new(),
		};
		response = response.add_attribute("replied", outcome.id.to_string());
		Ok(response)
	}

	fn query(
		&self,
		host: &dyn QueryHost,
		_ctx: &CallContext,
		payload: &Payload,
	) -> Result<ReturnData, Error> {
		match serde_json::from_slice(payload)? {
			PlanQuery::Get { key } => {
				let value = host
					.storage_get(key.as_bytes())?
					.map(|value| String::from_utf8_lossy(&value).to_string());
				Ok(serde_json::to_vec(&value)?)
			},
			PlanQuery::BalanceOf { address } =>
				Ok(serde_json::to_vec(&host.balance_of(&address)?.to_string())?),
			PlanQuery::Relay { target, query } => host.query(&target, &query.payload()),
		}
	}
}

/// Replacement code for migration tests.
#[derive(Debug)]
pub struct UpgradedActor;

impl ActorLogic for UpgradedActor {
	fn instantiate(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Ok(CallResponse::new())
	}

	fn migrate(
		&self,
		host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		host.storage_set(b"migrated", b"true")?;
		Ok(CallResponse::new().add_attribute("action", "migrate"))
	}

	fn execute(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Ok(CallResponse::new().set_data(b"upgraded".to_vec()))
	}
}

/// Registers nothing beyond instantiate; routing tests hit the missing
/// handlers.
#[derive(Debug)]
pub struct InstantiateOnlyActor;

impl ActorLogic for InstantiateOnlyActor {
	fn instantiate(
		&self,
		_host: &mut dyn CallHost,
		_ctx: &CallContext,
		_payload: &Payload,
	) -> Result<CallResponse, Error> {
		Ok(CallResponse::new())
	}
}
