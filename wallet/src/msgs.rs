/// Chain message envelopes the store assembles before handing them to a broadcaster
///
/// Messages are kept as their amino-JSON payload plus a type url. The SDK
/// owns protobuf encoding; the store only wraps messages and builds grants.
use crate::errors::{WalletError, WalletResult};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const MSG_TYPE_URL_MSG_EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
pub const MSG_TYPE_URL_MSG_EXEC: &str = "/cosmos.authz.v1beta1.MsgExec";
pub const MSG_TYPE_URL_MSG_GRANT: &str = "/cosmos.authz.v1beta1.MsgGrant";
pub const GENERIC_AUTHORIZATION_TYPE_URL: &str = "/cosmos.authz.v1beta1.GenericAuthorization";
pub const CONTRACT_EXECUTION_AUTHORIZATION_TYPE_URL: &str =
    "/cosmwasm.wasm.v1.ContractExecutionAuthorization";

const TYPE_KEY: &str = "@type";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Msg {
    pub type_url: String,
    pub value: Value,
}

impl Msg {
    pub fn new(type_url: impl Into<String>, value: Value) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Flatten into the `{"@type": ..., ...fields}` form.
    pub fn to_json(&self) -> Value {
        let mut object = match &self.value {
            Value::Object(fields) => fields.clone(),
            Value::Null => Map::new(),
            other => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), other.clone());
                fields
            }
        };
        object.insert(TYPE_KEY.to_string(), Value::String(self.type_url.clone()));
        Value::Object(object)
    }

    /// Inverse of [`Msg::to_json`].
    pub fn from_json(value: &Value) -> WalletResult<Self> {
        let mut fields = value
            .as_object()
            .cloned()
            .ok_or_else(|| WalletError::ValidationError("Message must be an object".into()))?;
        let type_url = match fields.remove(TYPE_KEY) {
            Some(Value::String(type_url)) => type_url,
            _ => {
                return Err(WalletError::ValidationError(
                    "Message is missing '@type'".to_string(),
                ))
            }
        };
        Ok(Self::new(type_url, Value::Object(fields)))
    }

    pub fn is_execute_contract(&self) -> bool {
        self.type_url == MSG_TYPE_URL_MSG_EXECUTE_CONTRACT
    }

    /// Authorization-execution envelope letting `grantee` run `msgs`.
    pub fn exec(grantee: &str, msgs: &[Msg]) -> Self {
        Self::new(
            MSG_TYPE_URL_MSG_EXEC,
            json!({
                "grantee": grantee,
                "msgs": msgs.iter().map(Msg::to_json).collect::<Vec<_>>(),
            }),
        )
    }

    /// Grant `grantee` permission to send `message_type` on behalf of `granter`.
    pub fn grant_generic(
        granter: &str,
        grantee: &str,
        message_type: &str,
        expiration: i64,
    ) -> WalletResult<Self> {
        Self::grant(
            granter,
            grantee,
            generic_authorization(message_type),
            expiration,
        )
    }

    pub fn grant_contract_execution(
        granter: &str,
        grantee: &str,
        authorization: &ContractExecutionCompatAuthz,
        expiration: i64,
    ) -> WalletResult<Self> {
        Self::grant(granter, grantee, authorization.to_authorization(), expiration)
    }

    fn grant(
        granter: &str,
        grantee: &str,
        authorization: Value,
        expiration: i64,
    ) -> WalletResult<Self> {
        let expiration = Utc
            .timestamp_opt(expiration, 0)
            .single()
            .ok_or_else(|| {
                WalletError::ValidationError(format!("Invalid grant expiration {}", expiration))
            })?;

        Ok(Self::new(
            MSG_TYPE_URL_MSG_GRANT,
            json!({
                "granter": granter,
                "grantee": grantee,
                "grant": {
                    "authorization": authorization,
                    "expiration": expiration.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                },
            }),
        ))
    }
}

/// Wrap `msgs` in a single [`Msg::exec`] when a grantee is given.
pub fn msgs_or_msg_exec_msgs(msgs: &[Msg], grantee: &str) -> Vec<Msg> {
    if grantee.is_empty() {
        return msgs.to_vec();
    }

    vec![Msg::exec(grantee, msgs)]
}

pub fn generic_authorization(message_type: &str) -> Value {
    json!({
        TYPE_KEY: GENERIC_AUTHORIZATION_TYPE_URL,
        "msg": message_type,
    })
}

/// Contract-scoped authorization used where a generic grant for
/// `MsgExecuteContract` would be too broad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractExecutionCompatAuthz {
    pub contract: String,
    pub max_calls: u64,
    #[serde(default)]
    pub allowed_message_keys: Vec<String>,
}

impl ContractExecutionCompatAuthz {
    pub fn to_authorization(&self) -> Value {
        let filter = if self.allowed_message_keys.is_empty() {
            json!({ TYPE_KEY: "/cosmwasm.wasm.v1.AllowAllMessagesFilter" })
        } else {
            json!({
                TYPE_KEY: "/cosmwasm.wasm.v1.AcceptedMessageKeysFilter",
                "keys": self.allowed_message_keys,
            })
        };

        json!({
            TYPE_KEY: CONTRACT_EXECUTION_AUTHORIZATION_TYPE_URL,
            "grants": [{
                "contract": self.contract,
                "limit": {
                    TYPE_KEY: "/cosmwasm.wasm.v1.MaxCallsLimit",
                    "remaining": self.max_calls.to_string(),
                },
                "filter": filter,
            }],
        })
    }
}
