//! Pure resolver mapping wallet/Lightning/order snapshots to the ordered
//! list of suggestion cards, with a single "lightning lifecycle" slot.

use serde::{Deserialize, Serialize};

use super::shapes::{
    Todo, TodoId, BACKUP_SEED_PHRASE_TODO, BT_FAILED_TODO, BUY_BITCOIN_TODO, INVITE_TODO,
    LIGHTNING_READY_TODO, LIGHTNING_SETTING_UP_TODO, LIGHTNING_TODO, PIN_TODO,
    SLASHTAGS_PROFILE_TODO, SUPPORT_TODO, TRANSFER_CLOSING_CHANNEL_TODO, TRANSFER_PENDING_TODO,
};
use super::TodosState;

const WEEK_MS: u64 = 7 * 24 * 60 * 60 * 1000;
/// Confirmations after which a transfer to savings is considered settled
const SAVINGS_CONFIRMATIONS: u32 = 6;
/// Rough block interval used for user-facing duration estimates
const MINUTES_PER_CONFIRMATION: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: String,
    pub confirmations: u32,
    pub confirmations_required: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferType {
    Open,
    CoopClose,
    ForceClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub tx_id: String,
    pub transfer_type: TransferType,
    pub status: TransferStatus,
    pub confirmations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderState {
    Created,
    Paid,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidOrder {
    pub id: String,
    pub state: OrderState,
    /// Expiry timestamp, epoch milliseconds
    pub expires_at: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingStep {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

/// Read-only snapshot of every subsystem the resolver consults.
///
/// `now` is injected so the resolver stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoInputs {
    pub todos: TodosState,
    pub backup_verified: bool,
    pub pin_set: bool,
    pub onboarding_step: OnboardingStep,
    pub open_channels: Vec<Channel>,
    pub closed_channels: Vec<Channel>,
    /// Non-zero once a cooperative close has been initiated
    pub start_coop_close_timestamp: u64,
    pub paid_orders: Vec<PaidOrder>,
    pub transfers: Vec<Transfer>,
    /// Current time, epoch milliseconds
    pub now: u64,
}

impl Default for TodoInputs {
    fn default() -> Self {
        Self {
            todos: TodosState::default(),
            backup_verified: false,
            pin_set: false,
            onboarding_step: OnboardingStep::default(),
            open_channels: Vec::new(),
            closed_channels: Vec::new(),
            start_coop_close_timestamp: 0,
            paid_orders: Vec::new(),
            transfers: Vec::new(),
            now: 0,
        }
    }
}

/// Open channels that should trigger a "ready" notification: confirmed
/// recently enough and not yet notified.
pub fn new_channel_notifications(inputs: &TodoInputs) -> Vec<&Channel> {
    inputs
        .open_channels
        .iter()
        .filter(|c| {
            c.confirmations <= c.confirmations_required.unwrap_or(1).max(1)
                && !inputs
                    .todos
                    .new_channels_notifications
                    .contains_key(&c.channel_id)
        })
        .collect()
}

fn confirms_in(confirmations: u32) -> u32 {
    SAVINGS_CONFIRMATIONS.saturating_sub(confirmations) * MINUTES_PER_CONFIRMATION
}

/// Ordered suggestion list. At most one lightning-lifecycle card is emitted,
/// chosen by priority; the dismissable cards follow in a fixed sequence.
pub fn todos_full(inputs: &TodoInputs) -> Vec<Todo> {
    let hide = &inputs.todos.hide;
    let mut res: Vec<Todo> = Vec::new();

    if !hide.contains_key(&TodoId::BackupSeedPhrase) && !inputs.backup_verified {
        res.push(BACKUP_SEED_PHRASE_TODO);
    }

    let new_channels = new_channel_notifications(inputs);

    let show_failed_order = inputs.paid_orders.iter().any(|order| {
        if order.state != OrderState::Expired {
            return false;
        }
        // ignore orders older than 1 week
        if inputs.now.saturating_sub(order.expires_at) > WEEK_MS {
            return false;
        }
        match hide.get(&TodoId::BtFailed) {
            None => true,
            // re-show if the order expired after the card was dismissed
            Some(&hidden_at) => order.expires_at > hidden_at,
        }
    });

    let transfer_to_spending = inputs
        .transfers
        .iter()
        .find(|t| t.transfer_type == TransferType::Open && t.status == TransferStatus::Pending);

    let transfer_to_savings = inputs.transfers.iter().find(|t| {
        t.transfer_type != TransferType::Open && t.confirmations < SAVINGS_CONFIRMATIONS
    });

    let has_transferred = !inputs.open_channels.is_empty() || !inputs.closed_channels.is_empty();

    // lightning lifecycle slot, first match wins
    if !new_channels.is_empty() {
        res.push(LIGHTNING_READY_TODO);
    } else if show_failed_order {
        res.push(BT_FAILED_TODO);
    } else if transfer_to_spending.is_some() {
        res.push(LIGHTNING_SETTING_UP_TODO);
    } else if !has_transferred {
        if let Some(transfer) = transfer_to_savings {
            res.push(TRANSFER_PENDING_TODO.with_duration(confirms_in(transfer.confirmations)));
        } else if !hide.contains_key(&TodoId::Lightning) {
            res.push(LIGHTNING_TODO);
        }
    } else if inputs.start_coop_close_timestamp > 0 {
        res.push(TRANSFER_CLOSING_CHANNEL_TODO);
    } else if let Some(transfer) = transfer_to_savings {
        res.push(TRANSFER_PENDING_TODO.with_duration(confirms_in(transfer.confirmations)));
    }

    if !hide.contains_key(&TodoId::Pin) && !inputs.pin_set {
        res.push(PIN_TODO);
    }
    if !hide.contains_key(&TodoId::SlashtagsProfile) && inputs.onboarding_step != OnboardingStep::Done
    {
        res.push(SLASHTAGS_PROFILE_TODO);
    }
    if !hide.contains_key(&TodoId::BuyBitcoin) {
        res.push(BUY_BITCOIN_TODO);
    }
    if !hide.contains_key(&TodoId::Support) {
        res.push(SUPPORT_TODO);
    }
    if !hide.contains_key(&TodoId::Invite) {
        res.push(INVITE_TODO);
    }

    res
}

/// Explicit memoized view over `todos_full`: recomputes only when the input
/// snapshot differs from the last one seen.
#[derive(Default)]
pub struct TodoView {
    cached: Option<(TodoInputs, Vec<Todo>)>,
}

impl TodoView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, inputs: &TodoInputs) -> &[Todo] {
        let stale = match &self.cached {
            Some((last, _)) => last != inputs,
            None => true,
        };
        if stale {
            let todos = todos_full(inputs);
            self.cached = Some((inputs.clone(), todos));
        }
        match &self.cached {
            Some((_, todos)) => todos,
            None => &[],
        }
    }
}
