//! Event kinds emitted by the crowdfunding contract, and the shapes they take
//! once decoded and stored.
//!
//! Every campaign event is published under `(symbol, campaign_id)`; the
//! registry pause event is published under `("reg_pause", owner)`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `created`
    CampaignCreated,
    /// `funded`
    FundReceived,
    /// `state`
    StateChanged,
    /// `tier_add`
    TierAdded,
    /// `tier_rm`
    TierRemoved,
    /// `withdrawn`
    FundsWithdrawn,
    /// `refunded`
    RefundIssued,
    /// `paused`
    CampaignPaused,
    /// `extended`
    DeadlineExtended,
    /// `updated`
    DetailsUpdated,
    /// `deleted`
    CampaignDeleted,
    /// `emergency`
    EmergencyWithdraw,
    /// `reg_pause`
    RegistryPaused,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Map the leading topic symbol to an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "funded" => Self::FundReceived,
            "state" => Self::StateChanged,
            "tier_add" => Self::TierAdded,
            "tier_rm" => Self::TierRemoved,
            "withdrawn" => Self::FundsWithdrawn,
            "refunded" => Self::RefundIssued,
            "paused" => Self::CampaignPaused,
            "extended" => Self::DeadlineExtended,
            "updated" => Self::DetailsUpdated,
            "deleted" => Self::CampaignDeleted,
            "emergency" => Self::EmergencyWithdraw,
            "reg_pause" => Self::RegistryPaused,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::FundReceived => "fund_received",
            Self::StateChanged => "state_changed",
            Self::TierAdded => "tier_added",
            Self::TierRemoved => "tier_removed",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::RefundIssued => "refund_issued",
            Self::CampaignPaused => "campaign_paused",
            Self::DeadlineExtended => "deadline_extended",
            Self::DetailsUpdated => "details_updated",
            Self::CampaignDeleted => "campaign_deleted",
            Self::EmergencyWithdraw => "emergency_withdraw",
            Self::RegistryPaused => "registry_paused",
            Self::Unknown => "unknown",
        }
    }

    /// Registry-level events carry no campaign id in their topics.
    pub fn is_registry_event(&self) -> bool {
        matches!(self, Self::RegistryPaused)
    }
}

/// A decoded event, ready to be stored.
///
/// `detail` holds the one kind-specific value that is neither an actor nor
/// an amount: the new status, a tier index, the new deadline, a pause flag
/// or a campaign name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    /// RPC event id; the deduplication key.
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A row of the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
