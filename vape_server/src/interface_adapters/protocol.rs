use serde::{Deserialize, Serialize};

// Labelled value widget, one per stat on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSummary {
    pub chain_id: u64,
    pub name: String,
}

// Page-level view shared by every visitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub rules: Vec<&'static str>,
    pub buy_link: Link,
    pub contract_link: Link,
    pub warning: &'static str,
    pub current_winner: Stat,
    pub jackpot: Stat,
    pub time_left: Stat,
    pub connect_prompt: &'static str,
    pub chain: ChainSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionButton {
    pub label: &'static str,
    pub enabled: bool,
    pub busy: bool,
    pub phase: &'static str,
}

// Shown instead of the hit button when the player holds too little $ZOOMER.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub message: String,
    pub buy_link: Link,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitControl {
    Button(ActionButton),
    Shortfall(Shortfall),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dialog {
    pub title: &'static str,
    pub tx_hash: String,
    pub explorer_link: Link,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub address: String,
    pub ticket_price: Stat,
    pub take_a_hit: HitControl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_dialog: Option<Dialog>,
    pub my_dividend: Stat,
    pub claim_dividend: ActionButton,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_dialog: Option<Dialog>,
}

// Response returned after a submission or a dismissal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub action: &'static str,
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog: Option<Dialog>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransactionResponse {
    pub hash: String,
    pub description: &'static str,
    pub submitted_at: u64,
    pub explorer_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRecord {
    pub player: String,
    pub amount: String,
    pub pot_value: String,
    pub next_hit_price: String,
    pub block_number: u64,
    pub tx_hash: String,
    pub explorer_link: String,
}

#[derive(Debug, Deserialize)]
pub struct HitsQuery {
    pub from_block: Option<u64>,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
