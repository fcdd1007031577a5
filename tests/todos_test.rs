use wallet_sentinel::todos::{
    new_channel_notifications, todos_full, Channel, OnboardingStep, OrderState, PaidOrder, Todo,
    TodoId, TodoInputs, TodoView, TodosState, Transfer, TransferStatus, TransferType,
};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;
const WEEK_MS: u64 = 7 * DAY_MS;
// some arbitrary "current time" well past the epoch
const NOW: u64 = 1_700_000_000_000;

fn ids(todos: &[Todo]) -> Vec<TodoId> {
    todos.iter().map(|t| t.id).collect()
}

fn inputs() -> TodoInputs {
    TodoInputs {
        now: NOW,
        ..Default::default()
    }
}

fn channel(id: &str, confirmations: u32, required: Option<u32>) -> Channel {
    Channel {
        channel_id: id.to_string(),
        confirmations,
        confirmations_required: required,
    }
}

fn transfer(transfer_type: TransferType, status: TransferStatus, confirmations: u32) -> Transfer {
    Transfer {
        tx_id: "txid".to_string(),
        transfer_type,
        status,
        confirmations,
    }
}

fn expired_order(expires_at: u64) -> PaidOrder {
    PaidOrder {
        id: "order".to_string(),
        state: OrderState::Expired,
        expires_at,
    }
}

#[test]
fn test_default_state_shows_the_full_onboarding_sequence() {
    let todos = todos_full(&inputs());
    assert_eq!(
        ids(&todos),
        vec![
            TodoId::BackupSeedPhrase,
            TodoId::Lightning,
            TodoId::Pin,
            TodoId::SlashtagsProfile,
            TodoId::BuyBitcoin,
            TodoId::Support,
            TodoId::Invite,
        ]
    );
}

#[test]
fn test_every_card_dismissed_yields_nothing() {
    let mut input = inputs();
    for id in [
        TodoId::BackupSeedPhrase,
        TodoId::Lightning,
        TodoId::Pin,
        TodoId::SlashtagsProfile,
        TodoId::BuyBitcoin,
        TodoId::Support,
        TodoId::Invite,
    ] {
        input.todos.hide_todo(id, NOW);
    }
    assert!(todos_full(&input).is_empty());
}

#[test]
fn test_completed_setup_steps_drop_their_cards() {
    let mut input = inputs();
    input.backup_verified = true;
    input.pin_set = true;
    input.onboarding_step = OnboardingStep::Done;

    let todos = todos_full(&input);
    assert_eq!(
        ids(&todos),
        vec![
            TodoId::Lightning,
            TodoId::BuyBitcoin,
            TodoId::Support,
            TodoId::Invite,
        ]
    );
}

#[test]
fn test_in_progress_onboarding_still_shows_profile_card() {
    let mut input = inputs();
    input.onboarding_step = OnboardingStep::InProgress;
    assert!(ids(&todos_full(&input)).contains(&TodoId::SlashtagsProfile));
}

#[test]
fn test_freshly_confirmed_channel_shows_lightning_ready() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 1, Some(1))];

    let todo_ids = ids(&todos_full(&input));
    assert!(todo_ids.contains(&TodoId::LightningReady));
    assert!(!todo_ids.contains(&TodoId::Lightning));
}

#[test]
fn test_missing_confirmations_required_defaults_to_one() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 1, None)];
    assert_eq!(new_channel_notifications(&input).len(), 1);

    // two confirmations is past the default threshold
    input.open_channels = vec![channel("chan-1", 2, None)];
    assert!(new_channel_notifications(&input).is_empty());
}

#[test]
fn test_notified_channel_is_not_announced_again() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 1, Some(1))];
    input.todos.mark_channels_notified(["chan-1"], NOW - 1000);

    let todo_ids = ids(&todos_full(&input));
    assert!(!todo_ids.contains(&TodoId::LightningReady));
    // the wallet has a channel, so the base lightning card stays away too
    assert!(!todo_ids.contains(&TodoId::Lightning));
}

#[test]
fn test_notification_window_slides_after_a_day() {
    let mut state = TodosState::default();
    state.mark_channels_notified(["chan-1"], NOW - DAY_MS - 1);

    let mut input = inputs();
    input.open_channels = vec![channel("chan-2", 1, Some(1))];
    input.todos = state.clone();
    // stale entries survive until the next write
    assert_eq!(new_channel_notifications(&input).len(), 1);

    state.mark_channels_notified(["chan-2"], NOW);
    assert!(!state.new_channels_notifications.contains_key("chan-1"));
    assert!(state.new_channels_notifications.contains_key("chan-2"));
}

#[test]
fn test_recently_expired_order_shows_bt_failed() {
    let mut input = inputs();
    input.paid_orders = vec![expired_order(NOW - DAY_MS)];
    assert!(ids(&todos_full(&input)).contains(&TodoId::BtFailed));
}

#[test]
fn test_order_expired_over_a_week_ago_is_ignored() {
    let mut input = inputs();
    input.paid_orders = vec![expired_order(NOW - WEEK_MS - 1)];

    let todo_ids = ids(&todos_full(&input));
    assert!(!todo_ids.contains(&TodoId::BtFailed));
    // the slot falls through to the base lightning card
    assert!(todo_ids.contains(&TodoId::Lightning));
}

#[test]
fn test_dismissed_bt_failed_stays_hidden_for_older_orders() {
    let mut input = inputs();
    input.paid_orders = vec![expired_order(NOW - DAY_MS)];
    input.todos.hide_todo(TodoId::BtFailed, NOW - 1000);
    assert!(!ids(&todos_full(&input)).contains(&TodoId::BtFailed));
}

#[test]
fn test_order_expiring_after_dismissal_reshows_bt_failed() {
    let mut input = inputs();
    input.paid_orders = vec![expired_order(NOW - DAY_MS)];
    input.todos.hide_todo(TodoId::BtFailed, NOW - 2 * DAY_MS);
    assert!(ids(&todos_full(&input)).contains(&TodoId::BtFailed));
}

#[test]
fn test_pending_spending_transfer_shows_setting_up() {
    let mut input = inputs();
    input.transfers = vec![transfer(TransferType::Open, TransferStatus::Pending, 0)];
    assert!(ids(&todos_full(&input)).contains(&TodoId::LightningSettingUp));
}

#[test]
fn test_failed_order_outranks_setting_up() {
    let mut input = inputs();
    input.paid_orders = vec![expired_order(NOW - DAY_MS)];
    input.transfers = vec![transfer(TransferType::Open, TransferStatus::Pending, 0)];

    let todo_ids = ids(&todos_full(&input));
    assert!(todo_ids.contains(&TodoId::BtFailed));
    assert!(!todo_ids.contains(&TodoId::LightningSettingUp));
}

#[test]
fn test_new_channel_outranks_everything_in_the_slot() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 1, Some(1))];
    input.paid_orders = vec![expired_order(NOW - DAY_MS)];
    input.transfers = vec![transfer(TransferType::Open, TransferStatus::Pending, 0)];

    let todo_ids = ids(&todos_full(&input));
    assert!(todo_ids.contains(&TodoId::LightningReady));
    assert!(!todo_ids.contains(&TodoId::BtFailed));
    assert!(!todo_ids.contains(&TodoId::LightningSettingUp));
}

#[test]
fn test_savings_transfer_shows_pending_with_remaining_minutes() {
    let mut input = inputs();
    input.transfers = vec![transfer(TransferType::CoopClose, TransferStatus::Pending, 5)];

    let todos = todos_full(&input);
    let pending = todos
        .iter()
        .find(|t| t.id == TodoId::TransferPending)
        .expect("pending transfer card");
    // one confirmation left at ~10 minutes per block
    assert_eq!(pending.duration, Some(10));
    assert!(!ids(&todos).contains(&TodoId::Lightning));
}

#[test]
fn test_settled_savings_transfer_frees_the_slot() {
    let mut input = inputs();
    input.transfers = vec![transfer(TransferType::CoopClose, TransferStatus::Pending, 6)];

    let todo_ids = ids(&todos_full(&input));
    assert!(!todo_ids.contains(&TodoId::TransferPending));
    assert!(todo_ids.contains(&TodoId::Lightning));
}

#[test]
fn test_coop_close_with_channels_shows_closing_card() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 10, Some(1))];
    input.todos.mark_channels_notified(["chan-1"], NOW - 1000);
    input.start_coop_close_timestamp = NOW - 1000;

    assert!(ids(&todos_full(&input)).contains(&TodoId::TransferClosingChannel));
}

#[test]
fn test_savings_transfer_with_channels_shows_pending() {
    let mut input = inputs();
    input.open_channels = vec![channel("chan-1", 10, Some(1))];
    input.todos.mark_channels_notified(["chan-1"], NOW - 1000);
    input.transfers = vec![transfer(TransferType::ForceClose, TransferStatus::Pending, 2)];

    let todos = todos_full(&input);
    let pending = todos
        .iter()
        .find(|t| t.id == TodoId::TransferPending)
        .expect("pending transfer card");
    assert_eq!(pending.duration, Some(40));
}

#[test]
fn test_view_recomputes_only_on_input_change() {
    let mut view = TodoView::new();
    let input = inputs();

    let first = view.get(&input).to_vec();
    let second = view.get(&input).to_vec();
    assert_eq!(first, second);

    let mut changed = input.clone();
    changed.pin_set = true;
    let third = view.get(&changed).to_vec();
    assert!(!ids(&third).contains(&TodoId::Pin));
    assert_ne!(first, third);
}
