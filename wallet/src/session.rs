use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use zeroize::Zeroizing;

use crate::crypto::PrivateKey;
use crate::errors::WalletResult;
use crate::general_error;
use crate::msgs::{ContractExecutionCompatAuthz, Msg};
use crate::state::AutoSign;

/// Source of unix time for session expiry decisions.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// What an auto-sign key may do on the granter's behalf.
#[derive(Debug, Clone, Copy)]
pub struct GrantScope<'a> {
    pub msg_types: &'a [String],
    pub contract_authz: &'a [ContractExecutionCompatAuthz],
}

impl<'a> GrantScope<'a> {
    pub fn new(msg_types: &'a [String], contract_authz: &'a [ContractExecutionCompatAuthz]) -> Self {
        Self {
            msg_types,
            contract_authz,
        }
    }

    pub fn ensure_not_empty(&self) -> WalletResult<()> {
        if self.msg_types.is_empty() && self.contract_authz.is_empty() {
            return Err(general_error!("No messages provided"));
        }
        Ok(())
    }

    /// Generic grants first, then contract-execution grants.
    pub fn grant_msgs(&self, granter: &str, grantee: &str, expiration: i64) -> WalletResult<Vec<Msg>> {
        let mut msgs = Vec::with_capacity(self.msg_types.len() + self.contract_authz.len());
        for message_type in self.msg_types {
            msgs.push(Msg::grant_generic(granter, grantee, message_type, expiration)?);
        }
        for authorization in self.contract_authz {
            msgs.push(Msg::grant_contract_execution(
                granter,
                grantee,
                authorization,
                expiration,
            )?);
        }
        Ok(msgs)
    }
}

/// A freshly generated auto-sign key together with the grants that
/// empower it. Nothing is stored until the grants are broadcast.
#[derive(Debug)]
pub struct PendingAutoSign {
    pub auto_sign: AutoSign,
    pub grants: Vec<Msg>,
}

impl PendingAutoSign {
    pub fn generate(
        granter: &str,
        scope: GrantScope<'_>,
        now: i64,
        duration: i64,
    ) -> WalletResult<Self> {
        scope.ensure_not_empty()?;

        let key = PrivateKey::generate();
        let injective_address = key.to_bech32()?;
        let private_key: Zeroizing<String> = key.to_private_key_hex();
        let expiration = now + duration;

        let grants = scope.grant_msgs(granter, &injective_address, expiration)?;
        Ok(Self {
            auto_sign: AutoSign {
                private_key: private_key.as_str().to_string(),
                injective_address,
                expiration,
                duration,
            },
            grants,
        })
    }

    /// Re-grant an expired session to the same key. `None` while the
    /// current grant is still live.
    pub fn renew(
        current: &AutoSign,
        granter: &str,
        scope: GrantScope<'_>,
        now: i64,
        fallback_duration: i64,
    ) -> WalletResult<Option<Self>> {
        scope.ensure_not_empty()?;

        if !current.is_expired_at(now) {
            return Ok(None);
        }

        let duration = if current.duration > 0 {
            current.duration
        } else {
            fallback_duration
        };
        let expiration = now + duration;
        let grants = scope.grant_msgs(granter, &current.injective_address, expiration)?;

        Ok(Some(Self {
            auto_sign: AutoSign {
                expiration,
                duration,
                ..current.clone()
            },
            grants,
        }))
    }
}
