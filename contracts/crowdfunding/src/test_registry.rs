extern crate std;

use soroban_sdk::testutils::Ledger;

use crate::test_utils::{TestContext, START_TIME};
use crate::{CampaignStatus, Error, MAX_PAGE_SIZE};

#[test]
fn test_empty_registry() {
    let ctx = TestContext::new();

    assert_eq!(ctx.client.get_all_campaigns().len(), 0);
    assert_eq!(ctx.client.get_campaigns_by_creator(&ctx.creator).len(), 0);
    assert_eq!(ctx.client.campaign_count(), 0);
}

#[test]
fn test_records_keep_creation_order() {
    let ctx = TestContext::new();
    let alice = ctx.generate_address();
    let bob = ctx.generate_address();

    let a1 = ctx
        .client
        .create_campaign(&alice, &ctx.text("A1"), &ctx.text(""), &100, &1);
    ctx.jump_time(60);
    let b1 = ctx
        .client
        .create_campaign(&bob, &ctx.text("B1"), &ctx.text(""), &100, &1);
    let a2 = ctx
        .client
        .create_campaign(&alice, &ctx.text("A2"), &ctx.text(""), &100, &1);

    assert_eq!((a1, b1, a2), (0, 1, 2));

    let all = ctx.client.get_all_campaigns();
    assert_eq!(all.len(), 3);
    assert_eq!(all.get(0).unwrap().campaign_id, a1);
    assert_eq!(all.get(1).unwrap().campaign_id, b1);
    assert_eq!(all.get(2).unwrap().campaign_id, a2);
    assert_eq!(all.get(0).unwrap().created_at, START_TIME);
    assert_eq!(all.get(1).unwrap().created_at, START_TIME + 60);
    assert_eq!(all.get(1).unwrap().creator, bob);
    assert_eq!(all.get(2).unwrap().name, ctx.text("A2"));

    let by_alice = ctx.client.get_campaigns_by_creator(&alice);
    assert_eq!(by_alice.len(), 2);
    assert_eq!(by_alice.get(0).unwrap(), all.get(0).unwrap());
    assert_eq!(by_alice.get(1).unwrap(), all.get(2).unwrap());

    let by_bob = ctx.client.get_campaigns_by_creator(&bob);
    assert_eq!(by_bob.len(), 1);
    assert_eq!(by_bob.get(0).unwrap().campaign_id, b1);
}

#[test]
fn test_registry_pause_blocks_only_creation() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);
    let backer = ctx.funded_backer(10);

    assert!(ctx.client.toggle_pause(&ctx.owner));
    assert!(ctx.client.is_paused());
    assert_eq!(
        ctx.client.try_create_campaign(
            &ctx.creator,
            &ctx.text("Blocked"),
            &ctx.text(""),
            &100,
            &1
        ),
        Err(Ok(Error::RegistryPaused))
    );

    // Existing campaigns keep working.
    ctx.client.fund(&id, &backer, &0, &10);

    assert!(!ctx.client.toggle_pause(&ctx.owner));
    ctx.create_campaign(100, 1);
    assert_eq!(ctx.client.campaign_count(), 2);
}

#[test]
fn test_registry_pause_owner_only() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.client.try_toggle_pause(&ctx.creator),
        Err(Ok(Error::NotOwner))
    );
    assert!(!ctx.client.is_paused());
}

#[test]
fn test_delete_from_factory() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);
    let backer = ctx.funded_backer(10);
    ctx.client.fund(&id, &backer, &0, &10);

    ctx.client.delete_campaign_from_factory(&ctx.creator, &id);

    // The record stays as history.
    assert_eq!(ctx.client.get_all_campaigns().len(), 1);
    assert_eq!(ctx.client.get_campaign_record(&id).creator, ctx.creator);

    assert!(ctx.client.get_campaign_details(&id).deleted);
    assert_eq!(ctx.client.get_campaign_status(&id), CampaignStatus::Failed);
    assert_eq!(ctx.client.refund(&id, &backer), 10);

    assert_eq!(
        ctx.client.try_delete_campaign_from_factory(&ctx.creator, &id),
        Err(Ok(Error::AlreadyDeleted))
    );
}

#[test]
fn test_delete_from_factory_guards() {
    let ctx = TestContext::new();
    let id = ctx.setup_campaign(1_000, 10);
    let stranger = ctx.generate_address();

    assert_eq!(
        ctx.client.try_delete_campaign_from_factory(&ctx.creator, &99),
        Err(Ok(Error::NotFound))
    );
    assert_eq!(
        ctx.client.try_delete_campaign_from_factory(&stranger, &id),
        Err(Ok(Error::NotCreator))
    );
    assert!(!ctx.client.get_campaign_details(&id).deleted);
}

#[test]
fn test_created_at_tracks_ledger_time() {
    let ctx = TestContext::new();
    let mut ledger = ctx.env.ledger().get();
    ledger.timestamp = START_TIME + 5_000;
    ctx.env.ledger().set(ledger);

    let id = ctx.create_campaign(100, 1);
    assert_eq!(ctx.client.get_campaign_record(&id).created_at, START_TIME + 5_000);
}

#[test]
fn test_campaigns_page_walks_the_log() {
    let ctx = TestContext::new();
    for _ in 0..5 {
        ctx.create_campaign(100, 1);
    }

    let first = ctx.client.get_campaigns_page(&0, &2);
    assert_eq!(first.len(), 2);
    assert_eq!(first.get(0).unwrap().campaign_id, 0);
    assert_eq!(first.get(1).unwrap().campaign_id, 1);

    let tail = ctx.client.get_campaigns_page(&3, &10);
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.get(0).unwrap().campaign_id, 3);
    assert_eq!(tail.get(1).unwrap(), ctx.client.get_campaign_record(&4));

    assert!(ctx.client.get_campaigns_page(&5, &10).is_empty());
    assert!(ctx.client.get_campaigns_page(&u64::MAX, &u32::MAX).is_empty());
}

#[test]
fn test_campaigns_page_is_capped() {
    let ctx = TestContext::new();
    for _ in 0..(MAX_PAGE_SIZE + 3) {
        ctx.create_campaign(100, 1);
    }

    let page = ctx.client.get_campaigns_page(&0, &u32::MAX);
    assert_eq!(page.len(), MAX_PAGE_SIZE);
    assert_eq!(
        page.get(MAX_PAGE_SIZE - 1).unwrap().campaign_id,
        u64::from(MAX_PAGE_SIZE - 1)
    );
}
