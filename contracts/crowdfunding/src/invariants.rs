extern crate std;

use crate::test_utils::TestContext;
use crate::{CampaignDetails, CampaignStatus};

/// INV-1: goal and every tier price are positive.
pub fn assert_positive_prices(details: &CampaignDetails) {
    assert!(
        details.goal > 0,
        "INV-1 violated: campaign {} has non-positive goal ({})",
        details.campaign_id,
        details.goal
    );
    for tier in details.tiers.iter() {
        assert!(
            tier.amount > 0,
            "INV-1 violated: tier {} of campaign {} has non-positive amount ({})",
            tier.id,
            details.campaign_id,
            tier.amount
        );
    }
}

/// INV-2: tracked balance never goes negative.
pub fn assert_balance_non_negative(details: &CampaignDetails) {
    assert!(
        details.balance >= 0,
        "INV-2 violated: campaign {} has negative balance ({})",
        details.campaign_id,
        details.balance
    );
}

/// INV-3: a deleted campaign is Failed.
pub fn assert_deleted_is_failed(details: &CampaignDetails) {
    if details.deleted {
        assert_eq!(
            details.state,
            CampaignStatus::Failed,
            "INV-3 violated: deleted campaign {} is {:?}",
            details.campaign_id,
            details.state
        );
    }
}

/// INV-4: status only moves forward out of Active.
pub fn assert_valid_status_transition(from: &CampaignStatus, to: &CampaignStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (CampaignStatus::Active, CampaignStatus::Successful)
                | (CampaignStatus::Active, CampaignStatus::Failed)
                | (CampaignStatus::Successful, CampaignStatus::Failed)
        );

    assert!(
        valid,
        "INV-4 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-5: a refund pays exactly the prior contribution and leaves zero.
pub fn assert_refund_conserved(before: i128, paid: i128, after: i128) {
    assert_eq!(
        paid, before,
        "INV-5 violated: refund paid {} for a contribution of {}",
        paid, before
    );
    assert_eq!(after, 0, "INV-5 violated: contribution left at {}", after);
}

/// INV-6: the contract's token holdings equal the sum of tracked campaign balances.
pub fn assert_ledger_matches_token_balance(ctx: &TestContext, campaign_ids: &[u64]) {
    let tracked: i128 = campaign_ids
        .iter()
        .map(|id| ctx.client.get_contract_balance(id))
        .sum();
    let held = ctx.token.balance(&ctx.client.address);
    assert_eq!(
        tracked, held,
        "INV-6 violated: tracked balances {} != token balance {}",
        tracked, held
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(details: &CampaignDetails) {
    assert_positive_prices(details);
    assert_balance_non_negative(details);
    assert_deleted_is_failed(details);
}
