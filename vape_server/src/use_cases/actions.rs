// Submission workflow for the two player actions.

use crate::domain::eligibility::HitGate;
use crate::domain::{
    ChainContext, ChainError, ChainReader, Clock, ContractCall, FlowError, TxFlow, WalletProvider,
};
use crate::interface_adapters::protocol::Dialog;
use crate::use_cases::game_view::{dialog, hit_allowed};
use crate::use_cases::reads::{load_player, read_uint};
use crate::use_cases::types::{GameAction, GameSnapshot, RecentTransaction};
use alloy::primitives::{Address, TxHash};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

// Recent transactions kept per player.
pub const RECENT_TX_LIMIT: usize = 10;
// Players with a recent-transaction list; the stalest list is evicted past this.
pub const RECENT_PLAYER_LIMIT: usize = 1_000;

#[derive(Debug)]
pub enum ActionError {
    Paused,
    PriceUnavailable,
    NotEligible,
    NothingToClaim,
    InFlight,
    Flow(FlowError),
    // A precondition read failed.
    Chain(ChainError),
    // The feasibility check failed; the call would revert.
    NotPrepared(ChainError),
    Rejected(ChainError),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Paused => write!(f, "the game is paused"),
            ActionError::PriceUnavailable => write!(f, "ticket price is not available yet"),
            ActionError::NotEligible => write!(f, "not enough $ZOOMER to take a hit"),
            ActionError::NothingToClaim => write!(f, "no dividend to claim"),
            ActionError::InFlight => write!(f, "a submission is already in flight"),
            ActionError::Flow(err) => write!(f, "{err}"),
            ActionError::Chain(err) => write!(f, "{err}"),
            ActionError::NotPrepared(err) => write!(f, "call cannot be prepared: {err}"),
            ActionError::Rejected(err) => write!(f, "submission failed: {err}"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<FlowError> for ActionError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InFlight => ActionError::InFlight,
            other => ActionError::Flow(other),
        }
    }
}

#[derive(Debug, Default)]
struct DeskState {
    // Only busy flows and open dialogs are kept; a missing entry is idle.
    flows: HashMap<(Address, GameAction), TxFlow>,
    recent: HashMap<Address, VecDeque<RecentTransaction>>,
}

impl DeskState {
    fn forget_if_at_rest(&mut self, key: (Address, GameAction)) {
        if self.flows.get(&key).is_some_and(TxFlow::is_at_rest) {
            self.flows.remove(&key);
        }
    }

    fn record(&mut self, player: Address, tx: RecentTransaction) {
        let recent = self.recent.entry(player).or_default();
        recent.push_front(tx);
        recent.truncate(RECENT_TX_LIMIT);

        if self.recent.len() > RECENT_PLAYER_LIMIT {
            let stalest = self
                .recent
                .iter()
                .filter(|(address, _)| **address != player)
                .min_by_key(|(_, txs)| txs.front().map_or(0, |tx| tx.submitted_at))
                .map(|(address, _)| *address);
            if let Some(address) = stalest {
                self.recent.remove(&address);
            }
        }
    }
}

/// Per-player flow state for every action button, plus recent transactions.
#[derive(Debug, Default)]
pub struct ActionDesk {
    state: Mutex<DeskState>,
}

impl ActionDesk {
    // Every transition is applied whole under the lock, so a poisoned guard
    // still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, DeskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn flow(&self, player: Address, action: GameAction) -> TxFlow {
        self.lock()
            .flows
            .get(&(player, action))
            .cloned()
            .unwrap_or_default()
    }

    /// Marks the button busy. The returned guard must be resolved with
    /// `signed` or `fail`; dropping it releases the button instead.
    pub fn begin(&self, player: Address, action: GameAction) -> Result<Submission<'_>, FlowError> {
        let mut state = self.lock();
        let mut flow = state.flows.get(&(player, action)).cloned().unwrap_or_default();
        flow.begin()?;
        state.flows.insert((player, action), flow);

        Ok(Submission {
            desk: self,
            player,
            action,
            open: true,
        })
    }

    fn signed(
        &self,
        player: Address,
        action: GameAction,
        hash: TxHash,
        submitted_at: u64,
    ) -> Result<TxFlow, FlowError> {
        let mut state = self.lock();
        let flow = state
            .flows
            .get_mut(&(player, action))
            .ok_or_else(|| idle_transition("signed"))?;
        flow.signed(hash)?;
        let flow = flow.clone();

        state.record(
            player,
            RecentTransaction {
                hash,
                description: action.description(),
                submitted_at,
            },
        );

        Ok(flow)
    }

    // Error goes straight back to idle; the wallet already showed its own message.
    fn release(&self, player: Address, action: GameAction, reason: &str) -> Result<(), FlowError> {
        let mut state = self.lock();
        let key = (player, action);
        let flow = state
            .flows
            .get_mut(&key)
            .ok_or_else(|| idle_transition("fail"))?;
        flow.fail(reason)?;
        flow.reset();
        state.forget_if_at_rest(key);
        Ok(())
    }

    pub fn dismiss(&self, player: Address, action: GameAction) -> TxFlow {
        let mut state = self.lock();
        let key = (player, action);
        let Some(flow) = state.flows.get_mut(&key) else {
            return TxFlow::new();
        };
        flow.dismiss();
        let flow = flow.clone();
        state.forget_if_at_rest(key);
        flow
    }

    pub fn recent(&self, player: Address) -> Vec<RecentTransaction> {
        self.lock()
            .recent
            .get(&player)
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

fn idle_transition(event: &'static str) -> FlowError {
    FlowError::InvalidTransition {
        from: "idle",
        event,
    }
}

/// A submission waiting on the node and the wallet. Dropped unresolved (the
/// request was cancelled), it returns the button to idle.
#[must_use]
pub struct Submission<'a> {
    desk: &'a ActionDesk,
    player: Address,
    action: GameAction,
    open: bool,
}

impl Submission<'_> {
    pub fn signed(mut self, hash: TxHash, submitted_at: u64) -> Result<TxFlow, FlowError> {
        self.open = false;
        self.desk.signed(self.player, self.action, hash, submitted_at)
    }

    pub fn fail(mut self, reason: &str) -> Result<(), FlowError> {
        self.open = false;
        self.desk.release(self.player, self.action, reason)
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        tracing::warn!(
            player = %self.player,
            action = %self.action,
            "submission abandoned before the wallet answered"
        );
        if let Err(err) = self.desk.release(self.player, self.action, "abandoned") {
            tracing::debug!(error = %err, "abandoned submission already resolved");
        }
    }
}

// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReceipt {
    pub action: GameAction,
    pub hash: TxHash,
    pub flow: TxFlow,
    pub dialog: Option<Dialog>,
}

pub struct SubmitActionUseCase<'a> {
    pub reader: &'a dyn ChainReader,
    pub wallet: &'a dyn WalletProvider,
    pub clock: &'a dyn Clock,
    pub desk: &'a ActionDesk,
    pub chain: &'a ChainContext,
    pub gate: HitGate,
}

impl SubmitActionUseCase<'_> {
    pub async fn execute(
        &self,
        player: Address,
        action: GameAction,
        snapshot: &GameSnapshot,
    ) -> Result<ActionReceipt, ActionError> {
        let call = self.build_call(player, action, snapshot).await?;

        let submission = self.desk.begin(player, action)?;

        let prepared = match self.reader.prepare(player, &call).await {
            Ok(prepared) => prepared,
            Err(err) => {
                tracing::warn!(%player, %action, error = %err, "call cannot be prepared");
                submission.fail(&err.to_string())?;
                return Err(ActionError::NotPrepared(err));
            }
        };

        match self.wallet.send_transaction(prepared).await {
            Ok(hash) => {
                let flow = submission.signed(hash, self.clock.now_epoch_seconds())?;
                tracing::info!(%player, %action, %hash, "transaction submitted");
                Ok(ActionReceipt {
                    action,
                    hash,
                    dialog: dialog(action, &flow, self.chain),
                    flow,
                })
            }
            Err(err) => {
                tracing::warn!(%player, %action, error = %err, "transaction not submitted");
                submission.fail(&err.to_string())?;
                Err(ActionError::Rejected(err))
            }
        }
    }

    async fn build_call(
        &self,
        player: Address,
        action: GameAction,
        snapshot: &GameSnapshot,
    ) -> Result<ContractCall, ActionError> {
        match action {
            GameAction::TakeAHit => {
                if snapshot.paused() {
                    return Err(ActionError::Paused);
                }
                let price = snapshot
                    .ticket_price()
                    .ok_or(ActionError::PriceUnavailable)?;
                let player_snapshot = load_player(self.reader, player).await;
                if !hit_allowed(&self.gate, &player_snapshot) {
                    return Err(ActionError::NotEligible);
                }
                Ok(ContractCall::game(action.function()).with_value(price))
            }
            GameAction::ClaimDividend => {
                let dividend = read_uint(
                    self.reader,
                    ContractCall::game("getMyDividend").address_arg(player),
                )
                .await
                .map_err(ActionError::Chain)?;
                if dividend.is_zero() {
                    return Err(ActionError::NothingToClaim);
                }
                Ok(ContractCall::game(action.function()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::token_units;
    use crate::domain::eligibility::MIN_ZOOMER_UNITS;
    use crate::domain::{ContractKind, ReadState, TxPhase};
    use crate::use_cases::test_support::{
        FixedClock, ScriptedChain, ScriptedWallet, SilentWallet, test_chain,
    };
    use alloy::primitives::U256;
    use std::time::Duration;

    const PLAYER: Address = Address::repeat_byte(0x01);

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            min_invest: ReadState::Ready(U256::from(10_000_000_000_000_000u128)),
            is_paused: ReadState::Ready(false),
            ..GameSnapshot::default()
        }
    }

    fn eligible_chain() -> ScriptedChain {
        ScriptedChain::new()
            .with_uint(ContractKind::Token, "balanceOf", token_units(MIN_ZOOMER_UNITS))
            .with_uint(ContractKind::Game, "getMyDividend", U256::from(7u64))
    }

    async fn submit(
        chain: &ScriptedChain,
        wallet: &dyn WalletProvider,
        desk: &ActionDesk,
        action: GameAction,
        snapshot: &GameSnapshot,
    ) -> Result<ActionReceipt, ActionError> {
        let ctx = test_chain();
        let use_case = SubmitActionUseCase {
            reader: chain,
            wallet,
            clock: &FixedClock(1_700_000_000),
            desk,
            chain: &ctx,
            gate: HitGate::default(),
        };
        use_case.execute(PLAYER, action, snapshot).await
    }

    #[tokio::test]
    async fn when_wallet_signs_hit_then_dialog_opens_with_explorer_link() {
        let chain = eligible_chain();
        let hash = TxHash::repeat_byte(0xee);
        let wallet = ScriptedWallet::approving(hash);
        let desk = ActionDesk::default();

        let receipt = submit(&chain, &wallet, &desk, GameAction::TakeAHit, &snapshot())
            .await
            .expect("expected submission to succeed");

        let dialog = receipt.dialog.expect("dialog should open");
        assert_eq!(dialog.title, "YOU TOOK A FAT HIT");
        assert_eq!(dialog.explorer_link.href, test_chain().tx_link(hash));
        assert!(dialog.explorer_link.href.ends_with(&hash.to_string()));
        assert_eq!(receipt.flow.phase(), &TxPhase::Confirming { hash });
    }

    #[tokio::test]
    async fn when_hit_is_submitted_then_ticket_price_is_attached() {
        let chain = eligible_chain();
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();

        submit(&chain, &wallet, &desk, GameAction::TakeAHit, &snapshot())
            .await
            .expect("expected submission to succeed");

        let sent = wallet.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].value, U256::from(10_000_000_000_000_000u128));
        assert_eq!(sent[0].from, PLAYER);
        assert_eq!(chain.prepared_calls()[0].function, "takeAVapeHit");
    }

    #[tokio::test]
    async fn when_wallet_rejects_then_button_re_enabled_and_no_dialog() {
        let chain = eligible_chain();
        let wallet = ScriptedWallet::rejecting();
        let desk = ActionDesk::default();

        let result = submit(&chain, &wallet, &desk, GameAction::TakeAHit, &snapshot()).await;

        assert!(matches!(result, Err(ActionError::Rejected(ChainError::Rejected(_)))));
        let flow = desk.flow(PLAYER, GameAction::TakeAHit);
        assert_eq!(flow.phase(), &TxPhase::Idle);
        assert!(flow.can_submit());
        assert_eq!(flow.dialog_hash(), None);
        assert!(desk.recent(PLAYER).is_empty());
        assert!(desk.lock().flows.is_empty());
    }

    #[tokio::test]
    async fn when_request_is_cancelled_while_wallet_is_signing_then_button_is_released() {
        let chain = eligible_chain();
        let desk = ActionDesk::default();

        let cut_off = tokio::time::timeout(
            Duration::from_millis(20),
            submit(
                &chain,
                &SilentWallet,
                &desk,
                GameAction::ClaimDividend,
                &snapshot(),
            ),
        )
        .await;

        assert!(cut_off.is_err());
        assert_eq!(
            desk.flow(PLAYER, GameAction::ClaimDividend).phase(),
            &TxPhase::Idle
        );

        let hash = TxHash::repeat_byte(0x5a);
        let wallet = ScriptedWallet::approving(hash);
        let receipt = submit(&chain, &wallet, &desk, GameAction::ClaimDividend, &snapshot())
            .await
            .expect("expected resubmission to succeed");
        assert_eq!(receipt.hash, hash);
    }

    #[tokio::test]
    async fn when_game_is_paused_then_hit_is_refused_before_wallet() {
        let chain = eligible_chain();
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();
        let paused = GameSnapshot {
            is_paused: ReadState::Ready(true),
            ..snapshot()
        };

        let result = submit(&chain, &wallet, &desk, GameAction::TakeAHit, &paused).await;

        assert!(matches!(result, Err(ActionError::Paused)));
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn when_balance_is_below_threshold_then_hit_is_not_eligible() {
        let chain = ScriptedChain::new().with_uint(
            ContractKind::Token,
            "balanceOf",
            token_units(MIN_ZOOMER_UNITS) - U256::from(1u64),
        );
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();

        let result = submit(&chain, &wallet, &desk, GameAction::TakeAHit, &snapshot()).await;

        assert!(matches!(result, Err(ActionError::NotEligible)));
    }

    #[tokio::test]
    async fn when_ticket_price_unknown_then_hit_is_refused() {
        let chain = eligible_chain();
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();

        let result = submit(
            &chain,
            &wallet,
            &desk,
            GameAction::TakeAHit,
            &GameSnapshot::default(),
        )
        .await;

        assert!(matches!(result, Err(ActionError::PriceUnavailable)));
    }

    #[tokio::test]
    async fn when_dividend_is_zero_then_claim_is_refused() {
        let chain = ScriptedChain::new().with_uint(ContractKind::Game, "getMyDividend", U256::ZERO);
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();

        let result = submit(&chain, &wallet, &desk, GameAction::ClaimDividend, &snapshot()).await;

        assert!(matches!(result, Err(ActionError::NothingToClaim)));
    }

    #[tokio::test]
    async fn when_prepare_fails_then_flow_returns_to_idle() {
        let chain = eligible_chain().with_prepare_failure(
            "payMyDividend",
            ChainError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            },
        );
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();

        let result = submit(&chain, &wallet, &desk, GameAction::ClaimDividend, &snapshot()).await;

        assert!(matches!(result, Err(ActionError::NotPrepared(_))));
        assert_eq!(
            desk.flow(PLAYER, GameAction::ClaimDividend).phase(),
            &TxPhase::Idle
        );
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn when_submission_in_flight_then_second_submit_is_refused() {
        let chain = eligible_chain();
        let wallet = ScriptedWallet::approving(TxHash::repeat_byte(1));
        let desk = ActionDesk::default();
        let _pending = desk
            .begin(PLAYER, GameAction::ClaimDividend)
            .expect("begin");

        let result = submit(&chain, &wallet, &desk, GameAction::ClaimDividend, &snapshot()).await;

        assert!(matches!(result, Err(ActionError::InFlight)));
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn when_claim_succeeds_then_recent_transaction_is_recorded() {
        let chain = eligible_chain();
        let hash = TxHash::repeat_byte(0x42);
        let wallet = ScriptedWallet::approving(hash);
        let desk = ActionDesk::default();

        submit(&chain, &wallet, &desk, GameAction::ClaimDividend, &snapshot())
            .await
            .expect("expected claim to succeed");

        let recent = desk.recent(PLAYER);
        assert_eq!(
            recent,
            vec![RecentTransaction {
                hash,
                description: "Get My Dividend",
                submitted_at: 1_700_000_000,
            }]
        );
    }

    #[test]
    fn when_dialog_is_dismissed_then_flow_settles() {
        let desk = ActionDesk::default();
        let hash = TxHash::repeat_byte(3);
        desk.begin(PLAYER, GameAction::TakeAHit)
            .expect("begin")
            .signed(hash, 0)
            .expect("signed");

        let flow = desk.dismiss(PLAYER, GameAction::TakeAHit);

        assert_eq!(flow.phase(), &TxPhase::Settled { hash });
        assert_eq!(desk.flow(PLAYER, GameAction::TakeAHit).phase(), &TxPhase::Idle);
        assert!(desk.lock().flows.is_empty());
    }

    #[test]
    fn when_unknown_players_dismiss_then_nothing_is_tracked() {
        let desk = ActionDesk::default();

        for n in 0..=u8::MAX {
            let flow = desk.dismiss(Address::repeat_byte(n), GameAction::TakeAHit);
            assert_eq!(flow.phase(), &TxPhase::Idle);
        }

        assert!(desk.lock().flows.is_empty());
        assert!(desk.lock().recent.is_empty());
    }

    #[test]
    fn when_dialog_is_open_then_dismiss_of_other_action_keeps_it() {
        let desk = ActionDesk::default();
        let hash = TxHash::repeat_byte(9);
        desk.begin(PLAYER, GameAction::TakeAHit)
            .expect("begin")
            .signed(hash, 0)
            .expect("signed");

        desk.dismiss(PLAYER, GameAction::ClaimDividend);

        assert_eq!(
            desk.flow(PLAYER, GameAction::TakeAHit).dialog_hash(),
            Some(hash)
        );
    }

    #[test]
    fn when_many_players_submit_then_stalest_recent_list_is_evicted() {
        let desk = ActionDesk::default();
        let player = |n: usize| {
            let mut bytes = [0u8; 20];
            bytes[12..].copy_from_slice(&(n as u64).to_be_bytes());
            Address::from(bytes)
        };

        for n in 0..=RECENT_PLAYER_LIMIT {
            desk.begin(player(n), GameAction::ClaimDividend)
                .expect("begin")
                .signed(TxHash::repeat_byte(1), n as u64 + 1)
                .expect("signed");
        }

        let state = desk.lock();
        assert_eq!(state.recent.len(), RECENT_PLAYER_LIMIT);
        assert!(!state.recent.contains_key(&player(0)));
        assert!(state.recent.contains_key(&player(RECENT_PLAYER_LIMIT)));
    }

    #[test]
    fn when_many_transactions_then_recent_list_is_capped() {
        let desk = ActionDesk::default();
        for n in 0..(RECENT_TX_LIMIT as u8 + 3) {
            desk.begin(PLAYER, GameAction::TakeAHit)
                .expect("begin")
                .signed(TxHash::repeat_byte(n), n as u64)
                .expect("signed");
            desk.dismiss(PLAYER, GameAction::TakeAHit);
        }

        let recent = desk.recent(PLAYER);

        assert_eq!(recent.len(), RECENT_TX_LIMIT);
        assert_eq!(recent[0].submitted_at, RECENT_TX_LIMIT as u64 + 2);
    }
}
