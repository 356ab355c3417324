//! # Crowdfunding Contract
//!
//! A single Soroban contract, `CrowdfundingProtocol`, that hosts both the
//! campaign registry and every campaign it creates. Campaigns are addressed
//! by a sequential `campaign_id`.
//!
//! | Phase          | Entry Point(s)                                                   |
//! |----------------|------------------------------------------------------------------|
//! | Bootstrap      | [`CrowdfundingProtocol::init`]                                   |
//! | Registry       | `create_campaign`, `toggle_pause`, `delete_campaign_from_factory` |
//! | Funding        | `fund`, `withdraw`, `refund`                                     |
//! | Administration | `add_tier`, `remove_tier`, `update_campaign_details`, `extend_deadline`, `toggle_campaign_pause`, `delete_campaign` |
//! | Escape hatch   | [`CrowdfundingProtocol::emergency_withdraw`]                     |
//! | Queries        | `get_all_campaigns`, `get_campaigns_page`, `get_campaigns_by_creator`, `get_campaign_details`, `get_campaign_status`, `get_tier`, `has_funded_tier`, `get_contract_balance` |
//!
//! ## Architecture
//!
//! Storage access is delegated to [`storage`], the creation log to
//! [`registry`], and status derivation to [`settlement`]. Every entry point
//! validates before writing; a returned `Error` aborts the invocation and
//! the host discards its writes and events.
//!
//! Status is never set by a caller. Mutating entry points run
//! [`settlement::resolve`]; `get_campaign_status` runs the same function
//! without persisting.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

pub mod events;
mod registry;
pub mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_refund;
#[cfg(test)]
mod test_registry;
#[cfg(test)]
mod test_tiers;

pub use types::{
    Backer, CampaignConfig, CampaignDetails, CampaignRecord, CampaignState, CampaignStatus, Tier,
};

/// Seconds in one day, used for `duration_days` and `extend_deadline`.
pub const DAY_IN_SECONDS: u64 = 86_400;

/// Largest page `get_campaigns_page` returns.
pub const MAX_PAGE_SIZE: u32 = 50;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Authorization
    NotOwner = 1,
    NotCreator = 2,

    // Lifecycle
    CampaignNotActive = 3,
    CampaignNotSuccessful = 4,
    CampaignDeleted = 5,
    AlreadyDeleted = 6,
    CampaignPaused = 7,
    RegistryPaused = 8,

    // Validation
    InvalidTier = 9,
    IncorrectAmount = 10,
    InvalidGoal = 11,
    InvalidDuration = 12,
    TierHasBackers = 13,

    // State
    NoBalance = 14,
    NoContribution = 15,
    NotFound = 16,

    AlreadyInitialized = 17,
    NotInitialized = 18,
    CampaignNotFailed = 19,
    Overflow = 20,
    InvalidAmount = 21,
}

#[contract]
pub struct CrowdfundingProtocol;

#[contractimpl]
impl CrowdfundingProtocol {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Set the registry owner and the token every campaign is funded in.
    ///
    /// Must be called exactly once after deployment; later calls fail with
    /// `Error::AlreadyInitialized`.
    pub fn init(env: Env, owner: Address, token: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();

        storage::set_owner(&env, &owner);
        storage::set_token(&env, &token);
        storage::set_paused(&env, false);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env).ok_or(Error::NotInitialized)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env).ok_or(Error::NotInitialized)
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Flip the registry pause flag. Only the registry owner may call this.
    ///
    /// A paused registry rejects `create_campaign`; existing campaigns are
    /// unaffected. Returns the new flag.
    pub fn toggle_pause(env: Env, caller: Address) -> Result<bool, Error> {
        let owner = storage::get_owner(&env).ok_or(Error::NotInitialized)?;
        caller.require_auth();
        if caller != owner {
            return Err(Error::NotOwner);
        }

        let paused = !storage::is_paused(&env);
        storage::set_paused(&env, paused);
        events::emit_registry_paused(&env, caller, paused);
        Ok(paused)
    }

    /// Return true if new campaigns are currently blocked.
    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// Create a campaign owned by `creator`, with no tiers and a deadline
    /// `duration_days` from now. Returns the new campaign id.
    pub fn create_campaign(
        env: Env,
        creator: Address,
        name: String,
        description: String,
        goal: i128,
        duration_days: u32,
    ) -> Result<u64, Error> {
        if !storage::is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        creator.require_auth();

        if storage::is_paused(&env) {
            return Err(Error::RegistryPaused);
        }
        if goal <= 0 {
            return Err(Error::InvalidGoal);
        }
        if duration_days == 0 {
            return Err(Error::InvalidDuration);
        }
        let deadline = env
            .ledger()
            .timestamp()
            .checked_add(u64::from(duration_days) * DAY_IN_SECONDS)
            .ok_or(Error::Overflow)?;

        let record = registry::append(&env, &creator, &name);
        let id = record.campaign_id;

        storage::save_config(
            &env,
            id,
            &CampaignConfig {
                owner: creator,
                name,
                description,
                goal,
                deadline,
            },
        );
        storage::save_state(
            &env,
            id,
            &CampaignState {
                status: CampaignStatus::Active,
                paused: false,
                deleted: false,
                balance: 0,
                next_tier_id: 0,
            },
        );
        storage::save_tiers(&env, id, &Vec::new(&env));

        events::emit_campaign_created(&env, &record);
        Ok(id)
    }

    /// Every campaign record, in creation order.
    ///
    /// Reads one entry per campaign, so large registries exceed the
    /// per-invocation read budget; page with `get_campaigns_page` instead.
    pub fn get_all_campaigns(env: Env) -> Vec<CampaignRecord> {
        registry::all(&env)
    }

    /// Campaign records with ids `start..start + limit`, in creation order.
    /// `limit` is capped at [`MAX_PAGE_SIZE`]; a `start` past the end
    /// returns an empty list.
    pub fn get_campaigns_page(env: Env, start: u64, limit: u32) -> Vec<CampaignRecord> {
        registry::page(&env, start, limit.min(MAX_PAGE_SIZE))
    }

    /// Campaign records created by `creator`, in creation order.
    pub fn get_campaigns_by_creator(env: Env, creator: Address) -> Vec<CampaignRecord> {
        registry::by_creator(&env, &creator)
    }

    pub fn get_campaign_record(env: Env, campaign_id: u64) -> Result<CampaignRecord, Error> {
        registry::find(&env, campaign_id).ok_or(Error::NotFound)
    }

    pub fn campaign_count(env: Env) -> u64 {
        storage::campaign_count(&env)
    }

    /// Soft-delete a campaign through the registry.
    ///
    /// Only the recorded creator may call this. The registry record stays in
    /// place; the campaign itself is marked deleted exactly as
    /// `delete_campaign` would.
    pub fn delete_campaign_from_factory(
        env: Env,
        caller: Address,
        campaign_id: u64,
    ) -> Result<(), Error> {
        caller.require_auth();
        let record = registry::find(&env, campaign_id).ok_or(Error::NotFound)?;
        if record.creator != caller {
            return Err(Error::NotCreator);
        }
        Self::soft_delete(&env, campaign_id, &caller)
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Pay for tier `tier_index` of a campaign.
    ///
    /// `amount` must equal the tier price exactly; it is pulled from
    /// `backer` in the registry token. Reaching the goal makes the
    /// campaign `Successful` immediately.
    pub fn fund(
        env: Env,
        campaign_id: u64,
        backer: Address,
        tier_index: u32,
        amount: i128,
    ) -> Result<(), Error> {
        backer.require_auth();
        let token = Self::token(env.clone())?;
        let (config, mut state) = Self::load_campaign(&env, campaign_id)?;

        // Deleted campaigns are Failed, so they stop here too.
        if settlement::effective_status(&env, &config, &state) != CampaignStatus::Active {
            return Err(Error::CampaignNotActive);
        }
        if state.paused {
            return Err(Error::CampaignPaused);
        }

        let mut tiers = storage::load_tiers(&env, campaign_id);
        let mut tier = tiers.get(tier_index).ok_or(Error::InvalidTier)?;
        if amount != tier.amount {
            return Err(Error::IncorrectAmount);
        }

        let mut position = storage::load_backer(&env, campaign_id, &backer);
        position.total_contribution = position
            .total_contribution
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        state.balance = state.balance.checked_add(amount).ok_or(Error::Overflow)?;
        tier.backer_count = tier.backer_count.checked_add(1).ok_or(Error::Overflow)?;
        if !position.funded_tiers.contains(tier.id) {
            position.funded_tiers.push_back(tier.id);
        }
        tiers.set(tier_index, tier);

        token::Client::new(&env, &token).transfer(
            &backer,
            &env.current_contract_address(),
            &amount,
        );

        storage::save_tiers(&env, campaign_id, &tiers);
        storage::save_backer(&env, campaign_id, &backer, &position);
        events::emit_fund_received(&env, campaign_id, backer, amount, tier_index);

        settlement::resolve(&env, campaign_id, &config, &mut state);
        storage::save_state(&env, campaign_id, &state);
        Ok(())
    }

    /// Pay the whole campaign balance to its owner once the campaign is
    /// `Successful`. Not affected by the pause flag. Returns the amount paid.
    pub fn withdraw(env: Env, campaign_id: u64, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        let token = Self::token(env.clone())?;
        let (config, mut state) = Self::load_campaign(&env, campaign_id)?;

        if caller != config.owner {
            return Err(Error::NotOwner);
        }
        if state.deleted {
            return Err(Error::CampaignDeleted);
        }
        if settlement::resolve(&env, campaign_id, &config, &mut state)
            != CampaignStatus::Successful
        {
            return Err(Error::CampaignNotSuccessful);
        }
        if state.balance <= 0 {
            return Err(Error::NoBalance);
        }

        let amount = state.balance;
        state.balance = 0;
        storage::save_state(&env, campaign_id, &state);

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &config.owner,
            &amount,
        );
        events::emit_funds_withdrawn(&env, campaign_id, caller, amount);
        Ok(amount)
    }

    /// Return `backer`'s whole contribution from a `Failed` (or deleted)
    /// campaign. Returns the amount paid.
    ///
    /// The recorded contribution is zeroed before the transfer.
    pub fn refund(env: Env, campaign_id: u64, backer: Address) -> Result<i128, Error> {
        backer.require_auth();
        let token = Self::token(env.clone())?;
        let (config, mut state) = Self::load_campaign(&env, campaign_id)?;

        if settlement::resolve(&env, campaign_id, &config, &mut state) != CampaignStatus::Failed {
            return Err(Error::CampaignNotFailed);
        }

        let mut position = storage::load_backer(&env, campaign_id, &backer);
        let amount = position.total_contribution;
        if amount <= 0 {
            return Err(Error::NoContribution);
        }
        // Drained by an emergency withdrawal; never pay from other campaigns.
        if state.balance < amount {
            return Err(Error::NoBalance);
        }

        position.total_contribution = 0;
        state.balance -= amount;
        storage::save_backer(&env, campaign_id, &backer, &position);
        storage::save_state(&env, campaign_id, &state);

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &backer,
            &amount,
        );
        events::emit_refund_issued(&env, campaign_id, backer, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Owner administration
    // ─────────────────────────────────────────────────────────

    /// Append a tier priced at `amount`. Returns its index.
    pub fn add_tier(
        env: Env,
        campaign_id: u64,
        caller: Address,
        name: String,
        amount: i128,
    ) -> Result<u32, Error> {
        caller.require_auth();
        let (_, mut state) = Self::load_active_for_owner(&env, campaign_id, &caller)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut tiers = storage::load_tiers(&env, campaign_id);
        let tier = Tier {
            id: state.next_tier_id,
            name: name.clone(),
            amount,
            backer_count: 0,
        };
        state.next_tier_id = state.next_tier_id.checked_add(1).ok_or(Error::Overflow)?;
        tiers.push_back(tier);
        let index = tiers.len() - 1;

        storage::save_tiers(&env, campaign_id, &tiers);
        storage::save_state(&env, campaign_id, &state);
        events::emit_tier_added(&env, campaign_id, index, name, amount);
        Ok(index)
    }

    /// Remove the tier at `tier_index`; later tiers shift down by one.
    /// Fails with `TierHasBackers` once anyone has paid for it.
    pub fn remove_tier(
        env: Env,
        campaign_id: u64,
        caller: Address,
        tier_index: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        let (_, state) = Self::load_active_for_owner(&env, campaign_id, &caller)?;

        let mut tiers = storage::load_tiers(&env, campaign_id);
        let tier = tiers.get(tier_index).ok_or(Error::InvalidTier)?;
        if tier.backer_count > 0 {
            return Err(Error::TierHasBackers);
        }
        tiers.remove(tier_index);

        storage::save_tiers(&env, campaign_id, &tiers);
        storage::save_state(&env, campaign_id, &state);
        events::emit_tier_removed(&env, campaign_id, tier_index);
        Ok(())
    }

    /// Overwrite name, description and goal of an `Active` campaign.
    pub fn update_campaign_details(
        env: Env,
        campaign_id: u64,
        caller: Address,
        name: String,
        description: String,
        goal: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        let (mut config, mut state) = Self::load_active_for_owner(&env, campaign_id, &caller)?;
        if goal <= 0 {
            return Err(Error::InvalidGoal);
        }

        config.name = name.clone();
        config.description = description.clone();
        config.goal = goal;
        storage::save_config(&env, campaign_id, &config);
        events::emit_details_updated(&env, campaign_id, name, description, goal);

        // A lowered goal may already be met.
        settlement::resolve(&env, campaign_id, &config, &mut state);
        storage::save_state(&env, campaign_id, &state);
        Ok(())
    }

    /// Push the deadline of an `Active` campaign back by `days`.
    /// Returns the new deadline.
    pub fn extend_deadline(
        env: Env,
        campaign_id: u64,
        caller: Address,
        days: u32,
    ) -> Result<u64, Error> {
        caller.require_auth();
        let (mut config, mut state) = Self::load_active_for_owner(&env, campaign_id, &caller)?;
        if days == 0 {
            return Err(Error::InvalidDuration);
        }

        config.deadline = config
            .deadline
            .checked_add(u64::from(days) * DAY_IN_SECONDS)
            .ok_or(Error::Overflow)?;
        storage::save_config(&env, campaign_id, &config);
        events::emit_deadline_extended(&env, campaign_id, config.deadline);

        settlement::resolve(&env, campaign_id, &config, &mut state);
        storage::save_state(&env, campaign_id, &state);
        Ok(config.deadline)
    }

    /// Flip the campaign's funding freeze. Allowed in any status.
    /// Returns the new flag.
    pub fn toggle_campaign_pause(
        env: Env,
        campaign_id: u64,
        caller: Address,
    ) -> Result<bool, Error> {
        caller.require_auth();
        let (config, mut state) = Self::load_campaign(&env, campaign_id)?;
        if caller != config.owner {
            return Err(Error::NotOwner);
        }

        state.paused = !state.paused;
        storage::save_state(&env, campaign_id, &state);
        events::emit_campaign_paused(&env, campaign_id, state.paused);
        Ok(state.paused)
    }

    /// Soft-delete the campaign: mark it deleted and force `Failed`, which
    /// opens `refund` to every backer. A second call fails `AlreadyDeleted`.
    pub fn delete_campaign(env: Env, campaign_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        Self::soft_delete(&env, campaign_id, &caller)
    }

    /// Owner escape hatch: move the whole campaign balance to the owner
    /// regardless of status, pause or deletion. Status and flags are left
    /// untouched; backers keep their recorded contributions.
    pub fn emergency_withdraw(
        env: Env,
        campaign_id: u64,
        caller: Address,
    ) -> Result<i128, Error> {
        caller.require_auth();
        let token = Self::token(env.clone())?;
        let (config, mut state) = Self::load_campaign(&env, campaign_id)?;
        if caller != config.owner {
            return Err(Error::NotOwner);
        }

        let amount = state.balance;
        state.balance = 0;
        storage::save_state(&env, campaign_id, &state);

        if amount > 0 {
            token::Client::new(&env, &token).transfer(
                &env.current_contract_address(),
                &config.owner,
                &amount,
            );
        }
        events::emit_emergency_withdraw(&env, campaign_id, caller, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full campaign view. `state` is the last persisted status; use
    /// `get_campaign_status` for the status at the current ledger time.
    pub fn get_campaign_details(env: Env, campaign_id: u64) -> Result<CampaignDetails, Error> {
        let (config, state) = Self::load_campaign(&env, campaign_id)?;
        Ok(CampaignDetails {
            campaign_id,
            name: config.name,
            description: config.description,
            goal: config.goal,
            deadline: config.deadline,
            owner: config.owner,
            paused: state.paused,
            deleted: state.deleted,
            state: state.status,
            balance: state.balance,
            tiers: storage::load_tiers(&env, campaign_id),
        })
    }

    /// Status at the current ledger time, without persisting it.
    /// Always `Failed` for a deleted campaign.
    pub fn get_campaign_status(env: Env, campaign_id: u64) -> Result<CampaignStatus, Error> {
        let (config, state) = Self::load_campaign(&env, campaign_id)?;
        Ok(settlement::effective_status(&env, &config, &state))
    }

    pub fn get_tier(env: Env, campaign_id: u64, tier_index: u32) -> Result<Tier, Error> {
        Self::load_campaign(&env, campaign_id)?;
        storage::load_tiers(&env, campaign_id)
            .get(tier_index)
            .ok_or(Error::NotFound)
    }

    pub fn get_tiers(env: Env, campaign_id: u64) -> Result<Vec<Tier>, Error> {
        Self::load_campaign(&env, campaign_id)?;
        Ok(storage::load_tiers(&env, campaign_id))
    }

    /// Return true if `backer` has paid for the tier currently at `tier_index`.
    pub fn has_funded_tier(
        env: Env,
        campaign_id: u64,
        backer: Address,
        tier_index: u32,
    ) -> Result<bool, Error> {
        Self::load_campaign(&env, campaign_id)?;
        let tier = storage::load_tiers(&env, campaign_id)
            .get(tier_index)
            .ok_or(Error::InvalidTier)?;
        let position = storage::load_backer(&env, campaign_id, &backer);
        Ok(position.funded_tiers.contains(tier.id))
    }

    pub fn get_backer(env: Env, campaign_id: u64, backer: Address) -> Result<Backer, Error> {
        Self::load_campaign(&env, campaign_id)?;
        Ok(storage::load_backer(&env, campaign_id, &backer))
    }

    /// Funds currently held for the campaign.
    pub fn get_contract_balance(env: Env, campaign_id: u64) -> Result<i128, Error> {
        let (_, state) = Self::load_campaign(&env, campaign_id)?;
        Ok(state.balance)
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn load_campaign(
        env: &Env,
        campaign_id: u64,
    ) -> Result<(CampaignConfig, CampaignState), Error> {
        let config = storage::load_config(env, campaign_id).ok_or(Error::NotFound)?;
        let state = storage::load_state(env, campaign_id).ok_or(Error::NotFound)?;
        Ok((config, state))
    }

    /// Shared guard for owner edits: owner, not deleted, resolved `Active`.
    fn load_active_for_owner(
        env: &Env,
        campaign_id: u64,
        caller: &Address,
    ) -> Result<(CampaignConfig, CampaignState), Error> {
        let (config, mut state) = Self::load_campaign(env, campaign_id)?;
        if *caller != config.owner {
            return Err(Error::NotOwner);
        }
        if state.deleted {
            return Err(Error::CampaignDeleted);
        }
        if settlement::resolve(env, campaign_id, &config, &mut state) != CampaignStatus::Active {
            return Err(Error::CampaignNotActive);
        }
        Ok((config, state))
    }

    fn soft_delete(env: &Env, campaign_id: u64, caller: &Address) -> Result<(), Error> {
        let (config, mut state) = Self::load_campaign(env, campaign_id)?;
        if *caller != config.owner {
            return Err(Error::NotOwner);
        }
        if state.deleted {
            return Err(Error::AlreadyDeleted);
        }

        state.deleted = true;
        if state.status != CampaignStatus::Failed {
            state.status = CampaignStatus::Failed;
            events::emit_state_changed(env, campaign_id, CampaignStatus::Failed);
        }
        storage::save_state(env, campaign_id, &state);
        events::emit_campaign_deleted(env, campaign_id, caller.clone());
        Ok(())
    }
}
