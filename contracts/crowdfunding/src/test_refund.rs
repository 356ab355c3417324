extern crate std;

use crate::invariants::{assert_ledger_matches_token_balance, assert_refund_conserved};
use crate::test_utils::TestContext;
use crate::{CampaignStatus, Error};

#[test]
fn test_refund_pays_full_contribution_once() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 40);
    let backer = ctx.funded_backer(200);

    ctx.client.fund(&id, &backer, &0, &40);
    ctx.client.fund(&id, &backer, &0, &40);
    ctx.jump_past_deadline(id);

    let before = ctx.client.get_backer(&id, &backer).total_contribution;
    let paid = ctx.client.refund(&id, &backer);
    let after = ctx.client.get_backer(&id, &backer).total_contribution;

    assert_refund_conserved(before, paid, after);
    assert_eq!(paid, 80);
    assert_eq!(ctx.token.balance(&backer), 200);
    assert_eq!(
        ctx.client.try_refund(&id, &backer),
        Err(Ok(Error::NoContribution))
    );
}

#[test]
fn test_refund_on_active_campaign_fails() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 40);
    let backer = ctx.funded_backer(40);
    ctx.client.fund(&id, &backer, &0, &40);

    assert_eq!(
        ctx.client.try_refund(&id, &backer),
        Err(Ok(Error::CampaignNotFailed))
    );
    assert_eq!(ctx.client.get_backer(&id, &backer).total_contribution, 40);
}

#[test]
fn test_refund_without_contribution_fails() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 40);
    let stranger = ctx.generate_address();

    ctx.jump_past_deadline(id);
    assert_eq!(
        ctx.client.try_refund(&id, &stranger),
        Err(Ok(Error::NoContribution))
    );
}

#[test]
fn test_refund_multiple_backers_drains_campaign() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 25);
    let backers = [
        ctx.funded_backer(25),
        ctx.funded_backer(50),
        ctx.funded_backer(75),
    ];
    for (i, backer) in backers.iter().enumerate() {
        for _ in 0..=i {
            ctx.client.fund(&id, backer, &0, &25);
        }
    }
    assert_eq!(ctx.client.get_contract_balance(&id), 150);

    ctx.jump_past_deadline(id);
    for (i, backer) in backers.iter().enumerate() {
        assert_eq!(ctx.client.refund(&id, backer), 25 * (i as i128 + 1));
    }

    assert_eq!(ctx.client.get_contract_balance(&id), 0);
    assert_ledger_matches_token_balance(&ctx, &[id]);
}

#[test]
fn test_delete_enables_refunds_before_deadline() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 40);
    let backer = ctx.funded_backer(40);
    ctx.client.fund(&id, &backer, &0, &40);

    ctx.client.delete_campaign(&id, &ctx.creator);
    assert_eq!(ctx.client.get_campaign_status(&id), CampaignStatus::Failed);
    assert_eq!(ctx.client.refund(&id, &backer), 40);
}

#[test]
fn test_refund_only_touches_its_own_campaign() {
    let ctx = TestContext::new();
    let failing = ctx.setup_campaign(1_000, 10);
    let healthy = ctx.setup_campaign(1_000, 10);
    let backer = ctx.funded_backer(100);

    ctx.client.fund(&failing, &backer, &0, &10);
    ctx.client.fund(&healthy, &backer, &0, &10);
    ctx.client.fund(&healthy, &backer, &0, &10);

    ctx.client.delete_campaign(&failing, &ctx.creator);
    assert_eq!(ctx.client.refund(&failing, &backer), 10);

    assert_eq!(ctx.client.get_contract_balance(&healthy), 20);
    assert_eq!(ctx.client.get_backer(&healthy, &backer).total_contribution, 20);
    assert_ledger_matches_token_balance(&ctx, &[failing, healthy]);
}
