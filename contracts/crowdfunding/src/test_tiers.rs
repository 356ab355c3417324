extern crate std;

use crate::invariants::assert_all_campaign_invariants;
use crate::test_utils::TestContext;
use crate::Error;

#[test]
fn test_add_tiers_in_order() {
    let ctx = TestContext::new();
    let id = ctx.create_campaign(1_000, 7);

    assert_eq!(ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Bronze"), &10), 0);
    assert_eq!(ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Silver"), &50), 1);
    assert_eq!(ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Gold"), &100), 2);

    let tiers = ctx.client.get_tiers(&id);
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers.get(1).unwrap().name, ctx.text("Silver"));
    assert_eq!(ctx.client.get_tier(&id, &2).amount, 100);
    assert_all_campaign_invariants(&ctx.client.get_campaign_details(&id));
}

#[test]
fn test_add_tier_rejects_non_positive_amount() {
    let ctx = TestContext::new();
    let id = ctx.create_campaign(1_000, 7);

    assert_eq!(
        ctx.client.try_add_tier(&id, &ctx.creator, &ctx.text("Free"), &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        ctx.client.try_add_tier(&id, &ctx.creator, &ctx.text("Neg"), &-1),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn test_tier_mutation_owner_only() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);
    let stranger = ctx.generate_address();

    assert_eq!(
        ctx.client.try_add_tier(&id, &stranger, &ctx.text("Mine"), &10),
        Err(Ok(Error::NotOwner))
    );
    assert_eq!(
        ctx.client.try_remove_tier(&id, &stranger, &0),
        Err(Ok(Error::NotOwner))
    );
}

#[test]
fn test_remove_tier_with_backers_fails() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);
    let backer = ctx.funded_backer(10);
    ctx.client.fund(&id, &backer, &0, &10);

    assert_eq!(
        ctx.client.try_remove_tier(&id, &ctx.creator, &0),
        Err(Ok(Error::TierHasBackers))
    );
    assert_eq!(ctx.client.get_tiers(&id).len(), 1);
}

#[test]
fn test_remove_tier_without_backers() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);

    ctx.client.remove_tier(&id, &ctx.creator, &0);
    assert!(ctx.client.get_tiers(&id).is_empty());
    assert_eq!(ctx.client.try_get_tier(&id, &0), Err(Ok(Error::NotFound)));
    assert_eq!(
        ctx.client.try_remove_tier(&id, &ctx.creator, &0),
        Err(Ok(Error::InvalidTier))
    );
}

#[test]
fn test_funded_tier_tracking_survives_removal_of_earlier_tier() {
    let ctx = TestContext::new();
    let id = ctx.create_campaign(1_000, 7);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Unused"), &5);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Popular"), &20);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Premium"), &30);
    let backer = ctx.funded_backer(20);

    ctx.client.fund(&id, &backer, &1, &20);
    ctx.client.remove_tier(&id, &ctx.creator, &0);

    // "Popular" moved to index 0, "Premium" to index 1.
    assert_eq!(ctx.client.get_tier(&id, &0).name, ctx.text("Popular"));
    assert!(ctx.client.has_funded_tier(&id, &backer, &0));
    assert!(!ctx.client.has_funded_tier(&id, &backer, &1));
    assert_eq!(
        ctx.client.try_has_funded_tier(&id, &backer, &2),
        Err(Ok(Error::InvalidTier))
    );
}

#[test]
fn test_tier_mutation_requires_active_campaign() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(10, 10);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Spare"), &3);
    let backer = ctx.funded_backer(10);
    ctx.client.fund(&id, &backer, &0, &10);

    assert_eq!(
        ctx.client.try_add_tier(&id, &ctx.creator, &ctx.text("Late"), &5),
        Err(Ok(Error::CampaignNotActive))
    );
    assert_eq!(
        ctx.client.try_remove_tier(&id, &ctx.creator, &1),
        Err(Ok(Error::CampaignNotActive))
    );
}

#[test]
fn test_fund_picks_tier_by_position() {
    let ctx = TestContext::new();
    let id = ctx.create_campaign(1_000, 7);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Small"), &5);
    ctx.client.add_tier(&id, &ctx.creator, &ctx.text("Large"), &50);
    let backer = ctx.funded_backer(100);

    assert_eq!(
        ctx.client.try_fund(&id, &backer, &0, &50),
        Err(Ok(Error::IncorrectAmount))
    );
    ctx.client.fund(&id, &backer, &1, &50);

    assert_eq!(ctx.client.get_tier(&id, &0).backer_count, 0);
    assert_eq!(ctx.client.get_tier(&id, &1).backer_count, 1);
    assert!(!ctx.client.has_funded_tier(&id, &backer, &0));
    assert!(ctx.client.has_funded_tier(&id, &backer, &1));
}
