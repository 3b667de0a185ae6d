//! Browser Wallet
//!
//! EIP-1193 transport over the `window.ethereum` object injected by browser
//! wallets, plus subscriptions to its account and chain events.

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect, JSON};
use serde_json::Value;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use pet_registry::chain::{
    parse_quantity, Address, ChainError, ChainResult, RpcError, WalletTransport,
};

/// `window.ethereum`, when a wallet injected one
fn ethereum() -> Option<JsValue> {
    let window = web_sys::window()?;
    let provider = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if provider.is_undefined() || provider.is_null() {
        None
    } else {
        Some(provider)
    }
}

fn to_js(value: &Value) -> ChainResult<JsValue> {
    let text = serde_json::to_string(value)?;
    JSON::parse(&text).map_err(|e| ChainError::Transport(format!("{:?}", e)))
}

fn from_js(value: &JsValue) -> ChainResult<Value> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text = JSON::stringify(value)
        .map_err(|e| ChainError::UnexpectedResponse(format!("{:?}", e)))?;
    Ok(serde_json::from_str(&String::from(text))?)
}

/// Provider errors carry `{ code, message }`; anything else is a transport
/// failure
fn provider_error(err: &JsValue) -> ChainError {
    let code = Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    match code {
        Some(code) => ChainError::Rpc(RpcError::new(code as i64, message)),
        None => ChainError::Transport(message),
    }
}

/// Transport backed by the injected browser wallet
#[derive(Clone, Copy, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    pub fn is_available() -> bool {
        ethereum().is_some()
    }
}

#[async_trait(?Send)]
impl WalletTransport for BrowserTransport {
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        let provider = ethereum().ok_or(ChainError::ProviderUnavailable)?;
        let request: Function = Reflect::get(&provider, &JsValue::from_str("request"))
            .map_err(|e| provider_error(&e))?
            .dyn_into()
            .map_err(|_| ChainError::ProviderUnavailable)?;

        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| provider_error(&e))?;
        Reflect::set(&args, &JsValue::from_str("params"), &to_js(&params)?)
            .map_err(|e| provider_error(&e))?;

        let promise: Promise = request
            .call1(&provider, &args)
            .map_err(|e| provider_error(&e))?
            .dyn_into()
            .map_err(|_| {
                ChainError::UnexpectedResponse(format!("{} did not return a promise", method))
            })?;

        let result = JsFuture::from(promise)
            .await
            .map_err(|e| provider_error(&e))?;
        from_js(&result)
    }

    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}

/// Register `handler` for a provider event. Returns false without a wallet.
fn on_provider_event(event: &str, handler: impl FnMut(JsValue) + 'static) -> bool {
    let Some(provider) = ethereum() else {
        return false;
    };
    let on = match Reflect::get(&provider, &JsValue::from_str("on")) {
        Ok(on) => on,
        Err(_) => return false,
    };
    let Ok(on) = on.dyn_into::<Function>() else {
        return false;
    };

    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue)>);
    let registered = on
        .call2(&provider, &JsValue::from_str(event), closure.as_ref().unchecked_ref())
        .is_ok();
    closure.forget();
    registered
}

/// Call `handler` with the new account list on `accountsChanged`
pub fn on_accounts_changed(mut handler: impl FnMut(Vec<Address>) + 'static) -> bool {
    on_provider_event("accountsChanged", move |value| {
        let accounts = from_js(&value)
            .and_then(|v| serde_json::from_value::<Vec<Address>>(v).map_err(ChainError::from));
        match accounts {
            Ok(accounts) => handler(accounts),
            Err(e) => web_sys::console::error_1(
                &format!("Unreadable accountsChanged payload: {}", e).into(),
            ),
        }
    })
}

/// Call `handler` with the new chain id on `chainChanged`
pub fn on_chain_changed(mut handler: impl FnMut(u64) + 'static) -> bool {
    on_provider_event("chainChanged", move |value| {
        match value.as_string().map(|id| parse_quantity(&id)) {
            Some(Ok(chain_id)) => handler(chain_id),
            _ => web_sys::console::error_1(
                &format!("Unreadable chainChanged payload: {:?}", value).into(),
            ),
        }
    })
}
