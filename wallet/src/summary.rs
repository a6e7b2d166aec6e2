//! Human-readable summaries of decoded on-chain messages.
//!
//! Summaries carry `{{kind:value}}` placeholders (`account`, `denom`,
//! `market`, ...) that the activity feed later resolves into links and
//! formatted amounts. A message whose type is unknown, or whose payload is
//! missing a field its template needs, summarizes to nothing.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::network::network_from_address;

const AUCTION_POOL_SUBACCOUNT_ID: &str =
    "0x1111111111111111111111111111111111111111111111111111111111111111";

const NOTIFICATION_CHARACTER_LIMIT: usize = 60;

/// A decoded message as the explorer API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub type_url: String,
    pub message: Value,
}

impl Message {
    pub fn new(type_url: impl Into<String>, message: Value) -> Self {
        Self {
            type_url: type_url.into(),
            message,
        }
    }
}

type Formatter = fn(&Value) -> Option<Vec<String>>;

static SUMMARY_FORMATTERS: Lazy<HashMap<&'static str, Formatter>> = Lazy::new(|| {
    let entries: [(&'static str, Formatter); 43] = [
        // bank
        ("cosmos.bank.v1beta1.MsgSend", msg_send),
        ("cosmos.bank.v1beta1.MsgMultiSend", msg_multi_send),
        // ibc
        ("ibc.applications.transfer.v1.MsgTransfer", msg_transfer),
        ("ibc.core.channel.v1.MsgRecvPacket", msg_recv_packet),
        // exchange
        ("injective.exchange.v1beta1.MsgDeposit", msg_deposit),
        ("injective.exchange.v1beta1.MsgWithdraw", msg_withdraw),
        ("injective.exchange.v1beta1.MsgSubaccountTransfer", msg_subaccount_transfer),
        ("injective.exchange.v1beta1.MsgExternalTransfer", msg_external_transfer),
        ("injective.exchange.v1beta1.MsgInstantSpotMarketLaunch", msg_instant_spot_market_launch),
        ("injective.exchange.v1beta1.MsgCreateSpotMarketOrder", msg_create_spot_market_order),
        ("injective.exchange.v1beta1.MsgCreateSpotLimitOrder", msg_create_spot_limit_order),
        ("injective.exchange.v1beta1.MsgCreateDerivativeMarketOrder", msg_create_derivative_market_order),
        ("injective.exchange.v1beta1.MsgCreateDerivativeLimitOrder", msg_create_derivative_limit_order),
        ("injective.exchange.v1beta1.MsgCancelSpotOrder", msg_cancel_spot_order),
        ("injective.exchange.v1beta1.MsgBatchCancelSpotOrders", msg_batch_cancel_spot_orders),
        ("injective.exchange.v1beta1.MsgBatchCreateSpotLimitOrders", msg_batch_create_spot_limit_orders),
        ("injective.exchange.v1beta1.MsgCancelDerivativeOrder", msg_cancel_derivative_order),
        ("injective.exchange.v1beta1.MsgBatchCancelDerivativeOrders", msg_batch_cancel_derivative_orders),
        ("injective.exchange.v1beta1.MsgBatchCreateDerivativeLimitOrders", msg_batch_create_derivative_limit_orders),
        ("injective.exchange.v1beta1.MsgBatchUpdateOrders", msg_batch_update_orders),
        ("injective.exchange.v1beta1.MsgIncreasePositionMargin", msg_increase_position_margin),
        ("injective.exchange.v1beta1.MsgLiquidatePosition", msg_liquidate_position),
        // staking
        ("cosmos.staking.v1beta1.MsgDelegate", msg_delegate),
        ("cosmos.staking.v1beta1.MsgUndelegate", msg_undelegate),
        ("cosmos.staking.v1beta1.MsgBeginRedelegate", msg_begin_redelegate),
        ("cosmos.staking.v1beta1.MsgCreateValidator", msg_create_validator),
        ("cosmos.staking.v1beta1.MsgEditValidator", msg_edit_validator),
        ("cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward", msg_withdraw_delegator_reward),
        ("cosmos.slashing.v1beta1.MsgUnjail", msg_unjail),
        // insurance
        ("injective.insurance.v1beta1.MsgCreateInsuranceFund", msg_create_insurance_fund),
        ("injective.insurance.v1beta1.MsgRequestRedemption", msg_request_redemption),
        ("injective.insurance.v1beta1.MsgUnderwrite", msg_underwrite),
        // peggy
        ("injective.peggy.v1.MsgConfirmBatch", msg_confirm_batch),
        ("injective.peggy.v1.MsgRequestBatch", msg_request_batch),
        ("injective.peggy.v1.MsgValsetConfirm", msg_valset_confirm),
        ("injective.peggy.v1.MsgSetOrchestratorAddresses", msg_set_orchestrator_addresses),
        ("injective.peggy.v1.MsgSendToEth", msg_send_to_eth),
        ("injective.peggy.v1.MsgDepositClaim", msg_deposit_claim),
        // gov
        ("cosmos.gov.v1beta1.MsgDeposit", msg_gov_deposit),
        ("cosmos.gov.v1beta1.MsgVote", msg_vote),
        ("cosmos.gov.v1beta1.MsgSubmitProposal", msg_submit_proposal),
        // auction
        ("injective.auction.v1beta1.MsgBid", msg_bid),
        // authz
        ("cosmos.authz.v1beta1.MsgExec", msg_exec),
    ];

    entries.into_iter().collect()
});

/// Summary lines for `value`. Unknown types yield an empty list.
pub fn get_human_readable_message(value: &Message) -> Vec<String> {
    let msg_type = value
        .type_url
        .strip_prefix('/')
        .unwrap_or(&value.type_url);

    SUMMARY_FORMATTERS
        .get(msg_type)
        .and_then(|formatter| formatter(&value.message))
        .unwrap_or_default()
}

/// Whether a summary exists for `type_url`, with or without the leading `/`.
pub fn is_supported_message_type(type_url: &str) -> bool {
    SUMMARY_FORMATTERS.contains_key(type_url.strip_prefix('/').unwrap_or(type_url))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDescription {
    pub description: String,
    /// Full text when `description` was shortened, otherwise empty.
    pub tooltip: String,
}

/// Shorten `description` for a toast, keeping the full text as tooltip.
pub fn format_notification_description(description: &str) -> NotificationDescription {
    if description.chars().count() <= NOTIFICATION_CHARACTER_LIMIT {
        return NotificationDescription {
            description: description.to_string(),
            tooltip: String::new(),
        };
    }

    let truncated: String = description
        .chars()
        .take(NOTIFICATION_CHARACTER_LIMIT)
        .collect();
    NotificationDescription {
        description: format!("{} ...", truncated),
        tooltip: description.to_string(),
    }
}

// ----- payload access -----

/// Scalar at `key` rendered as text.
fn field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.is_empty())
}

/// `(denom, amount)` of a coin object.
fn coin(value: &Value) -> Option<(String, String)> {
    Some((field(value, "denom")?, field(value, "amount")?))
}

/// The first coin of a coin list.
fn first_coin(value: &Value) -> Option<(String, String)> {
    coin(value.as_array()?.first()?)
}

fn items<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value.get(key)?.as_array()
}

/// Client order id when set, otherwise the order hash.
fn order_reference(value: &Value) -> Option<String> {
    non_empty(field(value, "cid")).or_else(|| field(value, "order_hash"))
}

fn denom_placeholder((denom, amount): (String, String)) -> String {
    format!("{{{{denom:{}-{}}}}}", denom, amount)
}

// ----- orders -----

#[derive(Debug, Clone, Copy)]
enum MarketKind {
    Spot,
    Derivative,
}

impl MarketKind {
    fn quantity_tag(self) -> &'static str {
        match self {
            MarketKind::Spot => "spotQuantity",
            MarketKind::Derivative => "derivativeQuantity",
        }
    }

    fn price_tag(self) -> &'static str {
        match self {
            MarketKind::Spot => "spotPrice",
            MarketKind::Derivative => "derivativePrice",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MarketKind::Spot => "Spot",
            MarketKind::Derivative => "Derivative",
        }
    }
}

/// `{{spotQuantity:..}} at {{spotPrice:..}} in the {{market:..}} Spot Market`
fn order_terms(order: &Value, kind: MarketKind) -> Option<String> {
    let market_id = field(order, "market_id")?;
    let order_info = order.get("order_info")?;
    let quantity = field(order_info, "quantity")?;
    let price = field(order_info, "price")?;

    Some(format!(
        "{{{{{}:{}-{}}}}} at {{{{{}:{}-{}}}}} in the {{{{market:{}}}}} {} Market",
        kind.quantity_tag(),
        market_id,
        quantity,
        kind.price_tag(),
        market_id,
        price,
        market_id,
        kind.label()
    ))
}

fn created_order(sender: &str, order: &Value, mode: &str, kind: MarketKind) -> Option<String> {
    let order_type = field(order, "order_type")?;
    Some(format!(
        "{{{{account:{}}}}} created a {} {} order for {}",
        sender,
        mode,
        order_type,
        order_terms(order, kind)?
    ))
}

fn cancelled_order(sender: &str, order: &Value, kind: MarketKind, spacer: &str) -> Option<String> {
    Some(format!(
        "{{{{account:{}}}}} cancelled order{}{} in the {{{{market:{}}}}} {} Market",
        sender,
        spacer,
        order_reference(order)?,
        field(order, "market_id")?,
        kind.label()
    ))
}

fn create_single_order(value: &Value, mode: &str, kind: MarketKind) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    Some(vec![created_order(&sender, value.get("order")?, mode, kind)?])
}

fn msg_create_spot_market_order(value: &Value) -> Option<Vec<String>> {
    create_single_order(value, "MARKET", MarketKind::Spot)
}

fn msg_create_spot_limit_order(value: &Value) -> Option<Vec<String>> {
    create_single_order(value, "LIMIT", MarketKind::Spot)
}

fn msg_create_derivative_market_order(value: &Value) -> Option<Vec<String>> {
    create_single_order(value, "MARKET", MarketKind::Derivative)
}

fn msg_create_derivative_limit_order(value: &Value) -> Option<Vec<String>> {
    create_single_order(value, "LIMIT", MarketKind::Derivative)
}

fn msg_cancel_spot_order(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    Some(vec![cancelled_order(&sender, value, MarketKind::Spot, " ")?])
}

fn msg_cancel_derivative_order(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    Some(vec![cancelled_order(&sender, value, MarketKind::Derivative, " ")?])
}

fn msg_batch_cancel_spot_orders(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    let mut lines = vec![format!(
        "{{{{account:{}}}}} cancelled all spot orders in:",
        sender
    )];
    for order in items(value, "data")? {
        lines.push(format!(
            "• {{{{market:{}}}}} with the following order hash: {}",
            field(order, "market_id")?,
            field(order, "order_hash")?
        ));
    }
    Some(lines)
}

fn msg_batch_cancel_derivative_orders(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    let mut lines = vec![format!(
        "{{{{account:{}}}}} cancelled all derivative orders in:",
        sender
    )];
    // Explorer payloads have carried both casings for these entries.
    let orders = items(value, "orders").or_else(|| items(value, "data"))?;
    for order in orders {
        let market_id = field(order, "market_id").or_else(|| field(order, "marketId"))?;
        let order_hash = field(order, "order_hash").or_else(|| field(order, "orderHash"))?;
        lines.push(format!(
            "• {{{{market:{}}}}} with the following order hash: {}",
            market_id, order_hash
        ));
    }
    Some(lines)
}

fn batch_create_limit_orders(value: &Value, kind: MarketKind) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    let noun = match kind {
        MarketKind::Spot => "spot",
        MarketKind::Derivative => "derivative",
    };
    let mut lines = vec![format!(
        "{{{{account:{}}}}} created a batch of {} limit orders:",
        sender, noun
    )];
    for order in items(value, "orders")? {
        lines.push(format!("• {}", order_terms(order, kind)?));
    }
    Some(lines)
}

fn msg_batch_create_spot_limit_orders(value: &Value) -> Option<Vec<String>> {
    batch_create_limit_orders(value, MarketKind::Spot)
}

fn msg_batch_create_derivative_limit_orders(value: &Value) -> Option<Vec<String>> {
    batch_create_limit_orders(value, MarketKind::Derivative)
}

/// Creations and cancellations only. Binary-options legs and the
/// cancel-all market lists are not summarized.
fn msg_batch_update_orders(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    let list = |key: &str| -> Vec<Value> { items(value, key).cloned().unwrap_or_default() };

    let mut lines = Vec::new();
    for order in list("derivative_orders_to_create") {
        lines.push(created_order(&sender, &order, "LIMIT", MarketKind::Derivative)?);
    }
    for order in list("spot_orders_to_create") {
        lines.push(created_order(&sender, &order, "LIMIT", MarketKind::Spot)?);
    }
    for order in list("spot_orders_to_cancel") {
        lines.push(cancelled_order(&sender, &order, MarketKind::Spot, "  ")?);
    }
    for order in list("derivative_orders_to_cancel") {
        lines.push(cancelled_order(&sender, &order, MarketKind::Derivative, " ")?);
    }
    Some(lines)
}

// ----- exchange -----

fn msg_deposit(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} deposited {} to subaccount {{{{subaccount:{}}}}}",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "subaccount_id")?
    )])
}

fn msg_withdraw(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} withdrew {} from subaccount {{{{subaccount:{}}}}}",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "subaccount_id")?
    )])
}

fn msg_subaccount_transfer(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} transferred {} from subaccount {{{{subaccount:{}}}}} to subaccount {{{{subaccount:{}}}}}",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "source_subaccount_id")?,
        field(value, "destination_subaccount_id")?
    )])
}

fn msg_external_transfer(value: &Value) -> Option<Vec<String>> {
    let destination = field(value, "destination_subaccount_id")?;
    let suffix = if destination == AUCTION_POOL_SUBACCOUNT_ID {
        " as a contribution to the next auction pool"
    } else {
        ""
    };

    Some(vec![format!(
        "{{{{account:{}}}}} transferred {} from {{{{subaccount:{}}}}} to subaccount {{{{subaccount:{}}}}}{}",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "source_subaccount_id")?,
        destination,
        suffix
    )])
}

fn msg_instant_spot_market_launch(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} instant launched the {} Spot Market",
        field(value, "sender")?,
        field(value, "ticker")?
    )])
}

fn msg_increase_position_margin(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} increased position margin by {} for the {{{{market:{}}}}} from subaccount {{{{subaccount:{}}}}} to subaccount {{{{subaccount:{}}}}}",
        field(value, "sender")?,
        field(value, "amount")?,
        field(value, "market_id")?,
        field(value, "source_subaccount_id")?,
        field(value, "destination_subaccount_id")?
    )])
}

fn msg_liquidate_position(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} liquidated a position in the {{{{market:{}}}}} market that belonged to the subaccount {{{{subaccount:{}}}}}",
        field(value, "sender")?,
        field(value, "market_id")?,
        field(value, "subaccount_id")?
    )])
}

// ----- staking -----

fn msg_delegate(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} staked {} to {{{{validator:{}}}}}",
        field(value, "delegator_address")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "validator_address")?
    )])
}

fn msg_undelegate(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} unstaked {} from {{{{validator:{}}}}}",
        field(value, "delegator_address")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "validator_address")?
    )])
}

fn msg_begin_redelegate(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} redelegated {} from {{{{validator:{}}}}} to {{{{validator:{}}}}}",
        field(value, "delegator_address")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "validator_src_address")?,
        field(value, "validator_dst_address")?
    )])
}

fn msg_withdraw_delegator_reward(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} claimed rewards from {{{{validator:{}}}}}",
        field(value, "delegator_address")?,
        field(value, "validator_address")?
    )])
}

fn msg_create_validator(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "Validator {} has been created with the address {{{{account:{}}}}}",
        field(value.get("description")?, "moniker")?,
        field(value, "validator_address")?
    )])
}

fn msg_edit_validator(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{validator:{}}}}} modified {} validator details",
        field(value, "validator_address")?,
        field(value.get("description")?, "moniker")?
    )])
}

fn msg_unjail(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{validator:{}}}}} sent an unjail message",
        field(value, "validator_addr")?
    )])
}

// ----- insurance -----

fn msg_create_insurance_fund(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} created an insurance fund with an initial deposit of {} for the {} market",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("initial_deposit")?)?),
        field(value, "ticker")?
    )])
}

fn msg_request_redemption(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} requested a redemption of {} from the {{{{market:{}}}}} Insurance Fund",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "market_id")?
    )])
}

fn msg_underwrite(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} underwrote {} in the {{{{market:{}}}}} insurance fund",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("deposit")?)?),
        field(value, "market_id")?
    )])
}

// ----- peggy -----

fn msg_confirm_batch(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{} confirmed a batch request",
        field(value, "orchestrator")?
    )])
}

fn msg_request_batch(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{} sent a batch request",
        field(value, "orchestrator")?
    )])
}

fn msg_valset_confirm(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{} confirmed the Valset",
        field(value, "orchestrator")?
    )])
}

fn msg_set_orchestrator_addresses(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} set the orchestrator address to {{{{account:{}}}}}",
        field(value, "sender")?,
        field(value, "orchestrator")?
    )])
}

fn msg_send_to_eth(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} withdrew {} to {{{{externalAccount:{}}}}} on Ethereum",
        field(value, "sender")?,
        denom_placeholder(coin(value.get("amount")?)?),
        field(value, "eth_dest")?
    )])
}

fn msg_deposit_claim(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{externalAccount:{}}}}} deposited {{{{denom:{}-{}}}}} to {{{{account:{}}}}} on Injective",
        field(value, "ethereum_sender")?,
        field(value, "token_contract")?,
        field(value, "amount")?,
        field(value, "cosmos_receiver")?
    )])
}

// ----- gov -----

fn msg_gov_deposit(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} deposited {} to proposal {{{{proposal:{}}}}}",
        field(value, "depositor")?,
        denom_placeholder(first_coin(value.get("amount")?)?),
        field(value, "proposal_id")?
    )])
}

fn vote_option(raw: &str) -> &'static str {
    match raw {
        "VOTE_OPTION_YES" => "yes",
        "VOTE_OPTION_ABSTAIN" => "abstain",
        "VOTE_OPTION_NO" => "no",
        _ => "noWithVeto",
    }
}

fn msg_vote(value: &Value) -> Option<Vec<String>> {
    let option = field(value, "option").unwrap_or_default();
    Some(vec![format!(
        "{{{{account:{}}}}} voted {} for {{{{proposal:{}}}}}",
        field(value, "voter")?,
        vote_option(&option),
        field(value, "proposal_id")?
    )])
}

fn msg_submit_proposal(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} submitted a proposal with an initial deposit of {}",
        field(value, "proposer")?,
        denom_placeholder(first_coin(value.get("initial_deposit")?)?)
    )])
}

// ----- bank, ibc, auction, authz -----

fn msg_send(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} sent {} to {{{{account:{}}}}}",
        field(value, "from_address")?,
        denom_placeholder(first_coin(value.get("amount")?)?),
        field(value, "to_address")?
    )])
}

fn multi_send_side(entries: &[Value], verb: &str) -> Option<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            let coins = entry
                .get("coins")?
                .as_array()?
                .iter()
                .map(|value| coin(value).map(|c| format!("{} {}", verb, denom_placeholder(c))))
                .collect::<Option<Vec<_>>>()?;
            Some(format!(
                "{{{{account:{}}}}} {}",
                field(entry, "address")?,
                coins.join(", ")
            ))
        })
        .collect()
}

fn msg_multi_send(value: &Value) -> Option<Vec<String>> {
    let mut lines = multi_send_side(items(value, "inputs")?, "sent")?;
    lines.extend(multi_send_side(items(value, "outputs")?, "received")?);
    Some(lines)
}

fn msg_transfer(value: &Value) -> Option<Vec<String>> {
    let sender = field(value, "sender")?;
    Some(vec![format!(
        "{{{{account:{}}}}} withdrew {} to {{{{account:{}}}}} from {{{{network:{}}}}}",
        sender,
        denom_placeholder(coin(value.get("token")?)?),
        field(value, "receiver")?,
        network_from_address(&sender)
    )])
}

/// Inbound IBC transfer. The fungible-token packet arrives as base64 JSON.
fn msg_recv_packet(value: &Value) -> Option<Vec<String>> {
    let encoded = value.get("packet")?.get("data")?.as_str()?;
    let decoded = BASE64_STANDARD.decode(encoded).ok()?;
    let packet: Value = serde_json::from_slice(&decoded).ok()?;

    let amount = non_empty(field(&packet, "amount"));
    let denom = non_empty(field(&packet, "denom"));
    let sender = non_empty(field(&packet, "sender"));
    let receiver = non_empty(field(&packet, "receiver"));

    if amount.is_none() && denom.is_none() && sender.is_none() && receiver.is_none() {
        return Some(Vec::new());
    }

    let (amount, denom, sender, receiver) = (amount?, denom?, sender?, receiver?);
    let base_denom = denom.rsplit('/').next().unwrap_or(&denom);

    Some(vec![format!(
        "{{{{externalAccount:{}}}}} deposited {{{{denom:{}-{}}}}} to {{{{account:{}}}}} from {}",
        sender,
        base_denom,
        amount,
        receiver,
        network_from_address(&sender)
    )])
}

fn msg_bid(value: &Value) -> Option<Vec<String>> {
    Some(vec![format!(
        "{{{{account:{}}}}} submitted a bid of {{{{denom:{}-{}}}}} in round {}",
        field(value, "sender")?,
        field(value, "bid_amount")?,
        field(value, "amount")?,
        field(value, "round")?
    )])
}

/// Summaries of every wrapped message, in order.
fn msg_exec(value: &Value) -> Option<Vec<String>> {
    let lines = items(value, "msgs")?
        .iter()
        .flat_map(|inner| {
            let type_url = inner
                .get("@type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            get_human_readable_message(&Message::new(type_url, inner.clone()))
        })
        .collect();
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SENDER: &str = "inj1hkhdaj2a2clmq5jq6mspsggqs32vynpk228q3r";
    const MARKET: &str = "0xmarket";
    const SUBACCOUNT: &str = "0xaf79152ac5df276d9a8e1e2e22822f9713474902000000000000000000000000";

    fn summarize(type_url: &str, message: Value) -> Vec<String> {
        get_human_readable_message(&Message::new(type_url, message))
    }

    fn order(order_type: &str) -> Value {
        json!({
            "market_id": MARKET,
            "order_type": order_type,
            "order_info": { "quantity": "2", "price": "10.5" }
        })
    }

    #[test]
    fn bank_send() {
        let lines = summarize(
            "/cosmos.bank.v1beta1.MsgSend",
            json!({
                "from_address": SENDER,
                "to_address": "inj1receiver",
                "amount": [{ "denom": "inj", "amount": "1000" }]
            }),
        );
        assert_eq!(
            lines,
            vec![format!(
                "{{{{account:{}}}}} sent {{{{denom:inj-1000}}}} to {{{{account:inj1receiver}}}}",
                SENDER
            )]
        );
    }

    #[test]
    fn leading_slash_is_optional() {
        let message = json!({
            "sender": SENDER,
            "amount": { "denom": "peggy0xusdt", "amount": "5" },
            "subaccount_id": SUBACCOUNT
        });
        let with_slash = summarize("/injective.exchange.v1beta1.MsgDeposit", message.clone());
        let without = summarize("injective.exchange.v1beta1.MsgDeposit", message);
        assert_eq!(with_slash, without);
        assert_eq!(
            with_slash[0],
            format!(
                "{{{{account:{}}}}} deposited {{{{denom:peggy0xusdt-5}}}} to subaccount {{{{subaccount:{}}}}}",
                SENDER, SUBACCOUNT
            )
        );
    }

    #[test]
    fn unknown_type_yields_nothing() {
        assert!(summarize("/ibc.core.channel.v1.MsgTimeout", json!({})).is_empty());
        assert!(summarize("cosmos.bank.v1beta1.MsgBurn", json!({})).is_empty());
        assert!(!is_supported_message_type("/ibc.core.channel.v1.MsgTimeout"));
        assert!(is_supported_message_type("/cosmos.authz.v1beta1.MsgExec"));
    }

    #[test]
    fn malformed_payload_yields_nothing() {
        assert!(summarize("/cosmos.bank.v1beta1.MsgSend", json!({ "from_address": SENDER })).is_empty());
    }

    #[test]
    fn gov_and_exchange_deposits_are_distinct() {
        let gov = summarize(
            "/cosmos.gov.v1beta1.MsgDeposit",
            json!({
                "depositor": SENDER,
                "proposal_id": 42,
                "amount": [{ "denom": "inj", "amount": "7" }]
            }),
        );
        assert_eq!(
            gov,
            vec![format!(
                "{{{{account:{}}}}} deposited {{{{denom:inj-7}}}} to proposal {{{{proposal:42}}}}",
                SENDER
            )]
        );
    }

    #[test]
    fn spot_limit_order_template() {
        let lines = summarize(
            "/injective.exchange.v1beta1.MsgCreateSpotLimitOrder",
            json!({ "sender": SENDER, "order": order("BUY") }),
        );
        assert_eq!(
            lines,
            vec![format!(
                "{{{{account:{}}}}} created a LIMIT BUY order for {{{{spotQuantity:{m}-2}}}} at {{{{spotPrice:{m}-10.5}}}} in the {{{{market:{m}}}}} Spot Market",
                SENDER,
                m = MARKET
            )]
        );
    }

    #[test]
    fn cancel_prefers_cid() {
        let lines = summarize(
            "/injective.exchange.v1beta1.MsgCancelDerivativeOrder",
            json!({ "sender": SENDER, "market_id": MARKET, "order_hash": "0xhash", "cid": "my-cid" }),
        );
        assert!(lines[0].contains("cancelled order my-cid in the"));

        let lines = summarize(
            "/injective.exchange.v1beta1.MsgCancelDerivativeOrder",
            json!({ "sender": SENDER, "market_id": MARKET, "order_hash": "0xhash", "cid": "" }),
        );
        assert!(lines[0].contains("cancelled order 0xhash in the"));
        assert!(lines[0].ends_with("Derivative Market"));
    }

    #[test]
    fn batch_update_orders_groups_by_leg() {
        let lines = summarize(
            "/injective.exchange.v1beta1.MsgBatchUpdateOrders",
            json!({
                "sender": SENDER,
                "spot_orders_to_cancel": [{ "market_id": MARKET, "order_hash": "0xspot" }],
                "spot_orders_to_create": [order("SELL")],
                "derivative_orders_to_cancel": [{ "market_id": MARKET, "order_hash": "0xderiv" }],
                "derivative_orders_to_create": [order("BUY")]
            }),
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("derivativeQuantity"));
        assert!(lines[1].contains("spotQuantity"));
        assert!(lines[2].contains("cancelled order  0xspot"));
        assert!(lines[3].contains("cancelled order 0xderiv"));
    }

    #[test]
    fn batch_create_lists_each_order() {
        let lines = summarize(
            "/injective.exchange.v1beta1.MsgBatchCreateDerivativeLimitOrders",
            json!({ "sender": SENDER, "orders": [order("BUY"), order("SELL")] }),
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("created a batch of derivative limit orders:"));
        assert!(lines[1].starts_with("• {{derivativeQuantity:"));
    }

    #[test]
    fn external_transfer_to_auction_pool() {
        let lines = summarize(
            "/injective.exchange.v1beta1.MsgExternalTransfer",
            json!({
                "sender": SENDER,
                "amount": { "denom": "inj", "amount": "1" },
                "source_subaccount_id": SUBACCOUNT,
                "destination_subaccount_id": AUCTION_POOL_SUBACCOUNT_ID
            }),
        );
        assert!(lines[0].ends_with(" as a contribution to the next auction pool"));
    }

    #[test]
    fn vote_options() {
        let vote = |option: &str| {
            summarize(
                "/cosmos.gov.v1beta1.MsgVote",
                json!({ "voter": SENDER, "option": option, "proposal_id": "3" }),
            )
        };
        assert!(vote("VOTE_OPTION_YES")[0].contains(" voted yes for "));
        assert!(vote("VOTE_OPTION_NO")[0].contains(" voted no for "));
        assert!(vote("VOTE_OPTION_ABSTAIN")[0].contains(" voted abstain for "));
        assert!(vote("VOTE_OPTION_NO_WITH_VETO")[0].contains(" voted noWithVeto for "));
    }

    #[test]
    fn recv_packet_decodes_transfer_data() {
        let data = json!({
            "amount": "250",
            "denom": "transfer/channel-8/uatom",
            "sender": "cosmos1hkhdaj2a2clmq5jq6mspsggqs32vynpkflpeux",
            "receiver": SENDER
        });
        let encoded = BASE64_STANDARD.encode(data.to_string());
        let lines = summarize(
            "/ibc.core.channel.v1.MsgRecvPacket",
            json!({ "packet": { "data": encoded } }),
        );
        assert_eq!(
            lines,
            vec![format!(
                "{{{{externalAccount:cosmos1hkhdaj2a2clmq5jq6mspsggqs32vynpkflpeux}}}} deposited {{{{denom:uatom-250}}}} to {{{{account:{}}}}} from Cosmos Hub",
                SENDER
            )]
        );

        let empty = BASE64_STANDARD.encode(json!({}).to_string());
        assert!(summarize(
            "/ibc.core.channel.v1.MsgRecvPacket",
            json!({ "packet": { "data": empty } })
        )
        .is_empty());
    }

    #[test]
    fn ibc_transfer_names_source_network() {
        let lines = summarize(
            "/ibc.applications.transfer.v1.MsgTransfer",
            json!({
                "sender": SENDER,
                "receiver": "osmo1receiver",
                "token": { "denom": "inj", "amount": "9" }
            }),
        );
        assert!(lines[0].ends_with("from {{network:Injective}}"));
    }

    #[test]
    fn exec_expands_inner_messages() {
        let lines = summarize(
            "/cosmos.authz.v1beta1.MsgExec",
            json!({
                "grantee": "inj1grantee",
                "msgs": [
                    {
                        "@type": "/injective.exchange.v1beta1.MsgCreateSpotMarketOrder",
                        "sender": SENDER,
                        "order": order("BUY")
                    },
                    { "@type": "/cosmos.bank.v1beta1.MsgBurn" },
                    {
                        "@type": "/cosmos.staking.v1beta1.MsgDelegate",
                        "delegator_address": SENDER,
                        "validator_address": "injvaloper1abc",
                        "amount": { "denom": "inj", "amount": "3" }
                    }
                ]
            }),
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("created a MARKET BUY order"));
        assert!(lines[1].contains("staked {{denom:inj-3}} to {{validator:injvaloper1abc}}"));
    }

    #[test]
    fn multi_send_lists_inputs_then_outputs() {
        let lines = summarize(
            "/cosmos.bank.v1beta1.MsgMultiSend",
            json!({
                "inputs": [{ "address": SENDER, "coins": [
                    { "denom": "inj", "amount": "2" },
                    { "denom": "uatom", "amount": "4" }
                ]}],
                "outputs": [{ "address": "inj1receiver", "coins": [{ "denom": "inj", "amount": "2" }] }]
            }),
        );
        assert_eq!(
            lines[0],
            format!(
                "{{{{account:{}}}}} sent {{{{denom:inj-2}}}}, sent {{{{denom:uatom-4}}}}",
                SENDER
            )
        );
        assert_eq!(
            lines[1],
            "{{account:inj1receiver}} received {{denom:inj-2}}"
        );
    }

    #[test]
    fn every_table_entry_handles_its_sample() {
        let coin = json!({ "denom": "inj", "amount": "1" });
        let samples: Vec<(&str, Value)> = vec![
            ("injective.exchange.v1beta1.MsgWithdraw", json!({ "sender": SENDER, "amount": coin, "subaccount_id": SUBACCOUNT })),
            ("injective.exchange.v1beta1.MsgSubaccountTransfer", json!({ "sender": SENDER, "amount": coin, "source_subaccount_id": SUBACCOUNT, "destination_subaccount_id": SUBACCOUNT })),
            ("injective.exchange.v1beta1.MsgInstantSpotMarketLaunch", json!({ "sender": SENDER, "ticker": "INJ/USDT" })),
            ("injective.exchange.v1beta1.MsgCreateDerivativeMarketOrder", json!({ "sender": SENDER, "order": order("SELL") })),
            ("injective.exchange.v1beta1.MsgCreateDerivativeLimitOrder", json!({ "sender": SENDER, "order": order("SELL") })),
            ("injective.exchange.v1beta1.MsgCancelSpotOrder", json!({ "sender": SENDER, "market_id": MARKET, "order_hash": "0xh" })),
            ("injective.exchange.v1beta1.MsgBatchCancelSpotOrders", json!({ "sender": SENDER, "data": [{ "market_id": MARKET, "order_hash": "0xh" }] })),
            ("injective.exchange.v1beta1.MsgBatchCreateSpotLimitOrders", json!({ "sender": SENDER, "orders": [order("BUY")] })),
            ("injective.exchange.v1beta1.MsgBatchCancelDerivativeOrders", json!({ "sender": SENDER, "orders": [{ "marketId": MARKET, "orderHash": "0xh" }] })),
            ("injective.exchange.v1beta1.MsgIncreasePositionMargin", json!({ "sender": SENDER, "amount": "10", "market_id": MARKET, "source_subaccount_id": SUBACCOUNT, "destination_subaccount_id": SUBACCOUNT })),
            ("injective.exchange.v1beta1.MsgLiquidatePosition", json!({ "sender": SENDER, "market_id": MARKET, "subaccount_id": SUBACCOUNT })),
            ("cosmos.staking.v1beta1.MsgUndelegate", json!({ "delegator_address": SENDER, "validator_address": "injvaloper1v", "amount": coin })),
            ("cosmos.staking.v1beta1.MsgBeginRedelegate", json!({ "delegator_address": SENDER, "validator_src_address": "injvaloper1a", "validator_dst_address": "injvaloper1b", "amount": coin })),
            ("cosmos.staking.v1beta1.MsgCreateValidator", json!({ "validator_address": "injvaloper1v", "description": { "moniker": "node" } })),
            ("cosmos.staking.v1beta1.MsgEditValidator", json!({ "validator_address": "injvaloper1v", "description": { "moniker": "node" } })),
            ("cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward", json!({ "delegator_address": SENDER, "validator_address": "injvaloper1v" })),
            ("cosmos.slashing.v1beta1.MsgUnjail", json!({ "validator_addr": "injvaloper1v" })),
            ("injective.insurance.v1beta1.MsgCreateInsuranceFund", json!({ "sender": SENDER, "ticker": "INJ/USDT PERP", "initial_deposit": coin })),
            ("injective.insurance.v1beta1.MsgRequestRedemption", json!({ "sender": SENDER, "market_id": MARKET, "amount": coin })),
            ("injective.insurance.v1beta1.MsgUnderwrite", json!({ "sender": SENDER, "market_id": MARKET, "deposit": coin })),
            ("injective.peggy.v1.MsgConfirmBatch", json!({ "orchestrator": SENDER })),
            ("injective.peggy.v1.MsgRequestBatch", json!({ "orchestrator": SENDER })),
            ("injective.peggy.v1.MsgValsetConfirm", json!({ "orchestrator": SENDER })),
            ("injective.peggy.v1.MsgSetOrchestratorAddresses", json!({ "sender": SENDER, "orchestrator": "inj1orch" })),
            ("injective.peggy.v1.MsgSendToEth", json!({ "sender": SENDER, "eth_dest": "0xdest", "amount": coin })),
            ("injective.peggy.v1.MsgDepositClaim", json!({ "ethereum_sender": "0xsrc", "cosmos_receiver": SENDER, "token_contract": "0xtoken", "amount": "5" })),
            ("cosmos.gov.v1beta1.MsgSubmitProposal", json!({ "proposer": SENDER, "initial_deposit": [coin] })),
            ("injective.auction.v1beta1.MsgBid", json!({ "sender": SENDER, "bid_amount": "inj", "amount": "100", "round": 12 })),
        ];

        for (type_url, message) in samples {
            assert!(is_supported_message_type(type_url), "{} not registered", type_url);
            let lines = summarize(type_url, message);
            assert!(!lines.is_empty(), "{} produced no summary", type_url);
            assert!(lines.iter().all(|line| !line.is_empty()));
        }
    }

    #[test]
    fn notification_description_truncates_long_text() {
        let short = format_notification_description("Order placed");
        assert_eq!(short.description, "Order placed");
        assert_eq!(short.tooltip, "");

        let exact = "a".repeat(60);
        assert_eq!(format_notification_description(&exact).description, exact);

        let long = "b".repeat(61);
        let formatted = format_notification_description(&long);
        assert_eq!(formatted.description, format!("{} ...", "b".repeat(60)));
        assert_eq!(formatted.tooltip, long);
    }

    #[test]
    fn notification_description_counts_characters() {
        let text = "é".repeat(61);
        let formatted = format_notification_description(&text);
        assert_eq!(formatted.description.chars().count(), 64);
    }
}
