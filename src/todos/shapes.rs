//! Static catalog of suggestion cards

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TodoId {
    BackupSeedPhrase,
    Lightning,
    LightningSettingUp,
    LightningReady,
    TransferPending,
    TransferClosingChannel,
    Pin,
    SlashtagsProfile,
    BuyBitcoin,
    BtFailed,
    Support,
    Invite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub color: &'static str,
    pub image: &'static str,
    pub dismissable: bool,
    /// Estimated minutes remaining, attached dynamically to time-based cards
    pub duration: Option<u32>,
}

impl Todo {
    pub const fn new(id: TodoId, color: &'static str, image: &'static str, dismissable: bool) -> Self {
        Self {
            id,
            color,
            image,
            dismissable,
            duration: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }
}

pub const BACKUP_SEED_PHRASE_TODO: Todo =
    Todo::new(TodoId::BackupSeedPhrase, "blue", "safe", true);
pub const LIGHTNING_TODO: Todo = Todo::new(TodoId::Lightning, "purple", "lightning", true);
pub const LIGHTNING_SETTING_UP_TODO: Todo =
    Todo::new(TodoId::LightningSettingUp, "purple", "lightning", false);
pub const LIGHTNING_READY_TODO: Todo =
    Todo::new(TodoId::LightningReady, "purple", "lightning", false);
pub const TRANSFER_PENDING_TODO: Todo =
    Todo::new(TodoId::TransferPending, "purple", "transfer", false);
pub const TRANSFER_CLOSING_CHANNEL_TODO: Todo =
    Todo::new(TodoId::TransferClosingChannel, "purple", "transfer", false);
pub const PIN_TODO: Todo = Todo::new(TodoId::Pin, "green", "shield", true);
pub const SLASHTAGS_PROFILE_TODO: Todo =
    Todo::new(TodoId::SlashtagsProfile, "brand", "crown", true);
pub const BUY_BITCOIN_TODO: Todo = Todo::new(TodoId::BuyBitcoin, "orange", "b-emboss", true);
pub const BT_FAILED_TODO: Todo = Todo::new(TodoId::BtFailed, "gray", "lightning", true);
pub const SUPPORT_TODO: Todo = Todo::new(TodoId::Support, "yellow", "lifebuoy", true);
pub const INVITE_TODO: Todo = Todo::new(TodoId::Invite, "blue", "group", true);
