//! In-memory chain hosting a registry contract, for tests.
//!
//! Answers EIP-1193 requests the way a wallet in front of a node would,
//! decoding calldata with the crate's own codec.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use super::contract;
use super::types::{PetId, PetRecord};
use crate::abi::{self, ParamType, Token};
use crate::chain::{
    format_quantity, parse_quantity, Address, Bytes, ChainError, ChainResult, Log, Receipt,
    RpcError, TxHash, WalletTransport, H256,
};

struct ChainState {
    wallet_present: bool,
    decline_accounts: bool,
    reject_signatures: bool,
    revert_writes: bool,
    refuse_switch: bool,
    accounts: Vec<Address>,
    chain_id: u64,
    known_chains: HashSet<u64>,
    pets: BTreeMap<u64, PetRecord>,
    next_id: u64,
    receipts: BTreeMap<String, Receipt>,
    pending_polls: u32,
    tx_count: u64,
    block: u64,
    now: u64,
    methods: Vec<String>,
}

pub struct SimulatedChain {
    contract: Address,
    state: RefCell<ChainState>,
}

fn revert(reason: &str) -> ChainError {
    ChainError::Rpc(RpcError::new(3, format!("execution reverted: {}", reason)))
}

fn param_address(params: &Value, field: &str) -> ChainResult<Address> {
    params[0][field]
        .as_str()
        .ok_or_else(|| ChainError::UnexpectedResponse(format!("missing {}", field)))?
        .parse()
}

fn param_data(params: &Value) -> ChainResult<Vec<u8>> {
    let data: Bytes = params[0]["data"]
        .as_str()
        .ok_or_else(|| ChainError::UnexpectedResponse("missing data".into()))?
        .parse()?;
    Ok(data.into_vec())
}

fn args(types: &[ParamType], data: &[u8]) -> ChainResult<Vec<Token>> {
    abi::decode(types, &data[4..]).map_err(|e| ChainError::UnexpectedResponse(e.to_string()))
}

fn uint_arg(token: &Token) -> u64 {
    match token {
        Token::Uint(v) => *v as u64,
        _ => panic!("expected uint"),
    }
}

fn string_arg(token: &Token) -> String {
    match token {
        Token::String(s) => s.clone(),
        _ => panic!("expected string"),
    }
}

fn address_arg(token: &Token) -> Address {
    match token {
        Token::Address(a) => *a,
        _ => panic!("expected address"),
    }
}

impl SimulatedChain {
    pub const CHAIN_ID: u64 = 31_337;

    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            state: RefCell::new(ChainState {
                wallet_present: true,
                decline_accounts: false,
                reject_signatures: false,
                revert_writes: false,
                refuse_switch: false,
                accounts: Vec::new(),
                chain_id: Self::CHAIN_ID,
                known_chains: HashSet::from([Self::CHAIN_ID]),
                pets: BTreeMap::new(),
                next_id: 1,
                receipts: BTreeMap::new(),
                pending_polls: 0,
                tx_count: 0,
                block: 100,
                now: 1_700_000_000,
                methods: Vec::new(),
            }),
        }
    }

    pub fn with_account(self, account: Address) -> Self {
        self.state.borrow_mut().accounts.push(account);
        self
    }

    pub fn on_chain(self, chain_id: u64) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.chain_id = chain_id;
            state.known_chains.insert(chain_id);
        }
        self
    }

    pub fn without_wallet(self) -> Self {
        self.state.borrow_mut().wallet_present = false;
        self
    }

    pub fn declining_accounts(self) -> Self {
        self.state.borrow_mut().decline_accounts = true;
        self
    }

    pub fn refusing_switch(self) -> Self {
        self.state.borrow_mut().refuse_switch = true;
        self
    }

    pub fn forgetting_chain(self, chain_id: u64) -> Self {
        self.state.borrow_mut().known_chains.remove(&chain_id);
        self
    }

    pub fn set_reject_signatures(&self, reject: bool) {
        self.state.borrow_mut().reject_signatures = reject;
    }

    pub fn set_revert_writes(&self, revert: bool) {
        self.state.borrow_mut().revert_writes = revert;
    }

    /// Answer `null` to the next `polls` receipt requests
    pub fn set_pending_polls(&self, polls: u32) {
        self.state.borrow_mut().pending_polls = polls;
    }

    pub fn current_chain(&self) -> u64 {
        self.state.borrow().chain_id
    }

    pub fn pet(&self, id: PetId) -> Option<PetRecord> {
        self.state.borrow().pets.get(&id.0).cloned()
    }

    pub fn methods(&self) -> Vec<String> {
        self.state.borrow().methods.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .methods
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }

    fn owned_by(state: &ChainState, owner: &Address) -> Vec<PetId> {
        state
            .pets
            .values()
            .filter(|p| p.owner == *owner)
            .map(|p| p.id)
            .collect()
    }

    fn handle_call(&self, params: &Value) -> ChainResult<Value> {
        let state = self.state.borrow();
        if param_address(params, "to")? != self.contract {
            return Ok(json!("0x"));
        }
        let data = param_data(params)?;
        let selector = &data[..4];

        let out = if selector == abi::selector(contract::GET_PET) {
            let id = uint_arg(&args(&[ParamType::Uint], &data)?[0]);
            let record = state.pets.get(&id).ok_or_else(|| revert("Pet does not exist"))?;
            contract::encode_pet(record)
        } else if selector == abi::selector(contract::GET_OWNER_PETS) {
            let owner = address_arg(&args(&[ParamType::Address], &data)?[0]);
            contract::encode_pet_ids(&Self::owned_by(&state, &owner))
        } else if selector == abi::selector(contract::GET_TOTAL_PETS) {
            abi::encode(&[Token::Uint(state.pets.len() as u128)])
        } else {
            return Err(revert("unknown selector"));
        };

        Ok(json!(Bytes(out).to_string()))
    }

    fn handle_send(&self, params: &Value) -> ChainResult<Value> {
        let mut state = self.state.borrow_mut();
        if state.reject_signatures {
            return Err(ChainError::Rpc(RpcError::new(
                4001,
                "User denied transaction signature.",
            )));
        }

        let from = param_address(params, "from")?;
        let data = param_data(params)?;
        state.tx_count += 1;
        state.block += 1;
        let tx = TxHash::from_bytes(abi::keccak256(state.tx_count.to_be_bytes()));

        let logs = if state.revert_writes {
            None
        } else {
            self.execute(&mut state, from, &data)?
        };

        let receipt = Receipt {
            transaction_hash: tx,
            block_number: Some(format_quantity(state.block)),
            status: Some(if logs.is_some() { "0x1" } else { "0x0" }.to_string()),
            logs: logs.unwrap_or_default(),
        };
        state.receipts.insert(tx.to_string(), receipt);
        Ok(json!(tx.to_string()))
    }

    /// Apply a write; `None` when the contract would revert
    fn execute(
        &self,
        state: &mut ChainState,
        from: Address,
        data: &[u8],
    ) -> ChainResult<Option<Vec<Log>>> {
        let selector = &data[..4];

        if selector == abi::selector(contract::REGISTER_PET) {
            let a = args(
                &[
                    ParamType::String,
                    ParamType::String,
                    ParamType::Uint,
                    ParamType::String,
                    ParamType::String,
                ],
                data,
            )?;
            let id = state.next_id;
            state.next_id += 1;
            let record = PetRecord {
                id: PetId(id),
                name: string_arg(&a[0]),
                breed: string_arg(&a[1]),
                birth_date: uint_arg(&a[2]),
                image_url: string_arg(&a[3]),
                description: string_arg(&a[4]),
                owner: from,
                registration_date: state.now,
                is_active: true,
            };
            let log = Log {
                address: self.contract,
                topics: vec![
                    abi::event_topic(contract::PET_REGISTERED),
                    contract::uint_topic(id),
                    contract::address_topic(&from),
                ],
                data: Bytes(abi::encode(&[Token::String(record.name.clone())])),
            };
            state.pets.insert(id, record);
            return Ok(Some(vec![log]));
        }

        if selector == abi::selector(contract::TRANSFER_OWNERSHIP) {
            let a = args(&[ParamType::Uint, ParamType::Address], data)?;
            let id = uint_arg(&a[0]);
            let new_owner = address_arg(&a[1]);
            let Some(record) = state.pets.get_mut(&id) else {
                return Ok(None);
            };
            if record.owner != from || new_owner.is_zero() {
                return Ok(None);
            }
            record.owner = new_owner;
            return Ok(Some(vec![Log {
                address: self.contract,
                topics: vec![
                    abi::event_topic(contract::OWNERSHIP_TRANSFERRED),
                    contract::uint_topic(id),
                    contract::address_topic(&from),
                    contract::address_topic(&new_owner),
                ],
                data: Bytes::default(),
            }]));
        }

        if selector == abi::selector(contract::UPDATE_PET_INFO) {
            let a = args(
                &[
                    ParamType::Uint,
                    ParamType::String,
                    ParamType::String,
                    ParamType::String,
                    ParamType::String,
                ],
                data,
            )?;
            let Some(record) = state.pets.get_mut(&uint_arg(&a[0])) else {
                return Ok(None);
            };
            if record.owner != from {
                return Ok(None);
            }
            record.name = string_arg(&a[1]);
            record.breed = string_arg(&a[2]);
            record.image_url = string_arg(&a[3]);
            record.description = string_arg(&a[4]);
            return Ok(Some(Vec::new()));
        }

        Ok(None)
    }

    fn handle_receipt(&self, params: &Value) -> ChainResult<Value> {
        let mut state = self.state.borrow_mut();
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            return Ok(Value::Null);
        }
        let hash: H256 = params[0]
            .as_str()
            .ok_or_else(|| ChainError::UnexpectedResponse("missing hash".into()))?
            .parse()?;
        match state.receipts.get(&hash.to_string()) {
            Some(receipt) => Ok(serde_json::to_value(receipt)?),
            None => Ok(Value::Null),
        }
    }

    fn handle_switch(&self, params: &Value) -> ChainResult<Value> {
        let mut state = self.state.borrow_mut();
        if state.refuse_switch {
            return Err(ChainError::Rpc(RpcError::new(4001, "User rejected the request.")));
        }
        let requested = parse_quantity(params[0]["chainId"].as_str().unwrap_or_default())?;
        if !state.known_chains.contains(&requested) {
            return Err(ChainError::Rpc(RpcError::new(
                4902,
                "Unrecognized chain ID. Try adding the chain using wallet_addEthereumChain first.",
            )));
        }
        state.chain_id = requested;
        Ok(Value::Null)
    }

    fn handle_add(&self, params: &Value) -> ChainResult<Value> {
        let mut state = self.state.borrow_mut();
        let requested = parse_quantity(params[0]["chainId"].as_str().unwrap_or_default())?;
        state.known_chains.insert(requested);
        state.chain_id = requested;
        Ok(Value::Null)
    }
}

#[async_trait(?Send)]
impl WalletTransport for SimulatedChain {
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        self.state.borrow_mut().methods.push(method.to_string());
        if !self.state.borrow().wallet_present {
            return Err(ChainError::ProviderUnavailable);
        }

        match method {
            "eth_requestAccounts" => {
                let state = self.state.borrow();
                if state.decline_accounts {
                    return Err(ChainError::Rpc(RpcError::new(
                        4001,
                        "User rejected the request.",
                    )));
                }
                Ok(json!(state.accounts))
            }
            "eth_accounts" => Ok(json!(self.state.borrow().accounts)),
            "eth_chainId" => Ok(json!(format_quantity(self.state.borrow().chain_id))),
            "wallet_switchEthereumChain" => self.handle_switch(&params),
            "wallet_addEthereumChain" => self.handle_add(&params),
            "eth_call" => self.handle_call(&params),
            "eth_sendTransaction" => self.handle_send(&params),
            "eth_getTransactionReceipt" => self.handle_receipt(&params),
            other => Err(ChainError::Rpc(RpcError::new(
                -32601,
                format!("Method {} not found", other),
            ))),
        }
    }

    async fn sleep(&self, _duration: Duration) {}
}
