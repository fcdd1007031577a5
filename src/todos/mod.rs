//! Suggestion cards ("todos"): static catalog, per-wallet visibility
//! state, and the pure priority resolver.

mod resolver;
mod shapes;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use resolver::{
    new_channel_notifications, todos_full, Channel, OnboardingStep, OrderState, PaidOrder,
    TodoInputs, TodoView, Transfer, TransferStatus, TransferType,
};
pub use shapes::{
    Todo, TodoId, BACKUP_SEED_PHRASE_TODO, BT_FAILED_TODO, BUY_BITCOIN_TODO, INVITE_TODO,
    LIGHTNING_READY_TODO, LIGHTNING_SETTING_UP_TODO, LIGHTNING_TODO, PIN_TODO,
    SLASHTAGS_PROFILE_TODO, SUPPORT_TODO, TRANSFER_CLOSING_CHANNEL_TODO, TRANSFER_PENDING_TODO,
};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Per-wallet visibility state: dismissed cards and already-surfaced
/// channel-ready notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodosState {
    /// Dismissal timestamps (epoch ms) per card
    pub hide: BTreeMap<TodoId, u64>,
    /// Notification timestamps (epoch ms) per channel id, pruned to 24h
    pub new_channels_notifications: BTreeMap<String, u64>,
}

impl TodosState {
    pub fn hide_todo(&mut self, id: TodoId, now_ms: u64) {
        self.hide.insert(id, now_ms);
    }

    pub fn is_hidden(&self, id: TodoId) -> bool {
        self.hide.contains_key(&id)
    }

    pub fn reset_hidden(&mut self) {
        self.hide.clear();
    }

    /// Record that "ready" notifications were surfaced for `channel_ids`.
    ///
    /// Every write prunes entries older than 24 hours, whether or not they
    /// belong to the current batch (sliding-window de-duplication).
    pub fn mark_channels_notified<I, S>(&mut self, channel_ids: I, now_ms: u64)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.new_channels_notifications
            .retain(|_, ts| now_ms.saturating_sub(*ts) < DAY_MS);
        for id in channel_ids {
            self.new_channels_notifications
                .insert(id.as_ref().to_string(), now_ms);
        }
    }
}
