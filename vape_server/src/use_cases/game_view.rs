// Renders contract state into the page's widgets.

use crate::domain::amount::{eth_display, format_ether};
use crate::domain::countdown::RoundTimer;
use crate::domain::eligibility::HitGate;
use crate::domain::{ChainContext, ChainReader, ContractCall, ReadState, TxFlow};
use crate::interface_adapters::protocol::{
    ActionButton, ChainSummary, Dialog, GameView, HitControl, Link, PlayerView, Shortfall, Stat,
};
use crate::use_cases::actions::ActionDesk;
use crate::use_cases::reads::load_player;
use crate::use_cases::types::{GameAction, GameSnapshot, PlayerSnapshot};
use alloy::primitives::Address;

pub const BUY_ZOOMER_LINK: &str =
    "https://app.uniswap.org/#/tokens/ethereum/0x0d505c03d30e65f6e9b4ef88855a47a89e4b7676";

const TITLE: &str = "$VAPE";
const TAGLINE: &str = "we str8 vapin belee dat";
const CONNECT_PROMPT: &str = "CONNECT YOUR WALLET TO PLAY";
const EXPLORER_LINK_LABEL: &str = "Peep Game";
const RULES: [&str; 7] = [
    "1. Hit the $VAPE for your chance to win the Bussin Oil",
    "2. The earlier you hit the vape the more $VAPE you get",
    "3. All $VAPE holders get a share of all new hits after them (the earlier you hit the more you get).",
    "4. With every Hit, the Battery resets and the Hit price increases.",
    "5. The last person to take a hit b4 the battery resets wins the Bussin Oil",
    "6. The first 50 buys require 10000 $ZOOMER, buy it here!",
    "you CANNOT buy $VAPE on an exchange! you must play the game to get it!",
];
const WARNING: &str = "WARNING: this is an addictive af degen ponzinomic game. the code is safu \
    (read it here) but has not been audited. play at your own risk!";

pub fn build_game_view(snapshot: &GameSnapshot, chain: &ChainContext, now: u64) -> GameView {
    let round_length = snapshot.round_length_or_default();

    GameView {
        title: TITLE,
        tagline: TAGLINE,
        rules: RULES.to_vec(),
        buy_link: Link {
            label: "buy it here!",
            href: BUY_ZOOMER_LINK.to_string(),
        },
        contract_link: Link {
            label: "(read it here)",
            href: chain.game_contract_link(),
        },
        warning: WARNING,
        current_winner: Stat {
            label: "Current Winner",
            value: snapshot.last_purchased_address.render(|a| a.to_string()),
            help_text: Some(format!(
                "{} hits taken",
                snapshot.num_hits.render(|n| n.to_string())
            )),
        },
        jackpot: Stat {
            label: "Current Jackpot",
            value: snapshot.pot_value.render(|v| eth_display(*v)),
            help_text: None,
        },
        time_left: Stat {
            label: "Time Until Jackpot",
            // Recomputed on every render from the raw timestamp.
            value: snapshot
                .last_purchased_time
                .render(|last| RoundTimer::new(*last, round_length).display_at(now)),
            help_text: None,
        },
        connect_prompt: CONNECT_PROMPT,
        chain: ChainSummary {
            chain_id: chain.chain_id,
            name: chain.name.clone(),
        },
    }
}

// Everything the player widgets depend on, gathered before rendering.
pub struct PlayerInputs<'a> {
    pub player: Address,
    pub snapshot: &'a GameSnapshot,
    pub player_snapshot: &'a PlayerSnapshot,
    pub hit_flow: &'a TxFlow,
    pub dividend_flow: &'a TxFlow,
    pub hit_prepared: bool,
    pub dividend_prepared: bool,
    pub gate: HitGate,
    pub chain: &'a ChainContext,
}

/// Eligibility as the page sees it: the local balance gate, or the contract's
/// own `hasEnoughZoomer` once the gated hits are over.
///
/// `is_eligible` / `HitGate::allows` stay the strict balance rule; this is the
/// broader view-level rule built on top of it. The two are meant to differ,
/// so don't align one with the other.
pub fn hit_allowed(gate: &HitGate, player: &PlayerSnapshot) -> bool {
    let by_balance = player
        .token_balance
        .ready()
        .is_some_and(|balance| gate.allows(*balance));
    by_balance || matches!(player.has_enough_zoomer, ReadState::Ready(true))
}

pub fn build_player_view(inputs: PlayerInputs<'_>) -> PlayerView {
    let snapshot = inputs.snapshot;
    let player = inputs.player_snapshot;

    let take_a_hit = if hit_allowed(&inputs.gate, player) {
        let enabled = inputs.hit_flow.can_submit()
            && inputs.hit_prepared
            && snapshot.ticket_price().is_some()
            && !snapshot.paused();
        HitControl::Button(button(GameAction::TakeAHit, inputs.hit_flow, enabled))
    } else {
        HitControl::Shortfall(Shortfall {
            message: format!(
                "not enough $ZOOMER! you need {}, you have {}!",
                inputs.gate.required_display(),
                player.token_balance.render(|b| format_ether(*b))
            ),
            buy_link: Link {
                label: "BUY SOME!",
                href: BUY_ZOOMER_LINK.to_string(),
            },
        })
    };

    let has_dividend = player.dividend.ready().is_some_and(|d| !d.is_zero());
    let dividend_enabled =
        inputs.dividend_flow.can_submit() && inputs.dividend_prepared && has_dividend;

    PlayerView {
        address: inputs.player.to_string(),
        ticket_price: Stat {
            label: "Ticket Price",
            value: snapshot.min_invest.render(|v| eth_display(*v)),
            help_text: None,
        },
        take_a_hit,
        hit_dialog: dialog(GameAction::TakeAHit, inputs.hit_flow, inputs.chain),
        my_dividend: Stat {
            label: "My Dividend",
            value: player.dividend.render(|v| eth_display(*v)),
            help_text: None,
        },
        claim_dividend: button(GameAction::ClaimDividend, inputs.dividend_flow, dividend_enabled),
        dividend_dialog: dialog(GameAction::ClaimDividend, inputs.dividend_flow, inputs.chain),
    }
}

fn button(action: GameAction, flow: &TxFlow, enabled: bool) -> ActionButton {
    ActionButton {
        label: action.button_label(),
        enabled,
        busy: flow.is_busy(),
        phase: flow.phase_name(),
    }
}

pub fn dialog(action: GameAction, flow: &TxFlow, chain: &ChainContext) -> Option<Dialog> {
    flow.dialog_hash().map(|hash| Dialog {
        title: action.dialog_title(),
        tx_hash: hash.to_string(),
        explorer_link: Link {
            label: EXPLORER_LINK_LABEL,
            href: chain.tx_link(hash),
        },
    })
}

// Loads player reads, runs the feasibility checks and renders the view.
pub struct PlayerViewUseCase<'a> {
    pub reader: &'a dyn ChainReader,
    pub desk: &'a ActionDesk,
    pub chain: &'a ChainContext,
    pub gate: HitGate,
}

impl PlayerViewUseCase<'_> {
    pub async fn execute(&self, player: Address, snapshot: &GameSnapshot) -> PlayerView {
        let player_snapshot = load_player(self.reader, player).await;

        let hit_prepared = match snapshot.ticket_price() {
            Some(price) if hit_allowed(&self.gate, &player_snapshot) => {
                let call = ContractCall::game(GameAction::TakeAHit.function()).with_value(price);
                self.reader.prepare(player, &call).await.is_ok()
            }
            _ => false,
        };
        let dividend_prepared = match player_snapshot.dividend {
            ReadState::Ready(dividend) if !dividend.is_zero() => {
                let call = ContractCall::game(GameAction::ClaimDividend.function());
                self.reader.prepare(player, &call).await.is_ok()
            }
            _ => false,
        };

        let hit_flow = self.desk.flow(player, GameAction::TakeAHit);
        let dividend_flow = self.desk.flow(player, GameAction::ClaimDividend);

        build_player_view(PlayerInputs {
            player,
            snapshot,
            player_snapshot: &player_snapshot,
            hit_flow: &hit_flow,
            dividend_flow: &dividend_flow,
            hit_prepared,
            dividend_prepared,
            gate: self.gate,
            chain: self.chain,
        })
    }
}
