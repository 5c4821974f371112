use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod state;
pub mod utils;

use instructions::*;
use state::{ControllerConfig, PoolInput};

declare_id!("8HzD8P7XFoQubjS8t7yNg3WQnPNcCDotFiJ625qkwmpF");

#[program]
pub mod consensus_vesting {
    use super::*;

    pub fn initialize_controller(
        ctx: Context<InitializeController>,
        config: ControllerConfig,
    ) -> Result<()> {
        instructions::initialize_controller::initialize_controller(ctx, config)
    }

    pub fn add_beneficiary(
        ctx: Context<Register>,
        identity: Pubkey,
        pools: Vec<PoolInput>,
    ) -> Result<()> {
        instructions::add_beneficiary::add_beneficiary(ctx, identity, pools)
    }

    pub fn add_investor(ctx: Context<Register>, identity: Pubkey, amount: u64) -> Result<()> {
        instructions::add_investor::add_investor(ctx, identity, amount)
    }

    pub fn claim(ctx: Context<Claim>, pool: String, slot: u8) -> Result<()> {
        instructions::claim::claim(ctx, pool, slot)
    }

    pub fn claim_unlocked(ctx: Context<Claim>) -> Result<()> {
        instructions::claim_unlocked::claim_unlocked(ctx)
    }

    pub fn create_campaign(
        ctx: Context<Allocate>,
        name: String,
        participants: Vec<Pubkey>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        instructions::create_campaign::create_campaign(ctx, name, participants, amounts)
    }

    pub fn update_campaign(
        ctx: Context<Allocate>,
        name: String,
        participants: Vec<Pubkey>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        instructions::update_campaign::update_campaign(ctx, name, participants, amounts)
    }

    // Handlers reading remaining accounts take the accounts and remaining
    // accounts directly to avoid `Context` lifetime invariance when
    // delegating across modules.

    pub fn add_accounts<'info>(
        ctx: Context<'_, '_, '_, 'info, AddAccounts<'info>>,
        identities: Vec<Pubkey>,
        amounts: Vec<u64>,
        release_ts: i64,
    ) -> Result<()> {
        instructions::add_accounts::add_accounts(
            ctx.accounts,
            ctx.remaining_accounts,
            identities,
            amounts,
            release_ts,
        )
    }

    pub fn pause<'info>(ctx: Context<'_, '_, '_, 'info, Governed<'info>>) -> Result<()> {
        instructions::pause::pause(ctx.accounts, ctx.remaining_accounts)
    }

    pub fn unpause<'info>(ctx: Context<'_, '_, '_, 'info, Governed<'info>>) -> Result<()> {
        instructions::unpause::unpause(ctx.accounts, ctx.remaining_accounts)
    }

    pub fn add_admin<'info>(
        ctx: Context<'_, '_, '_, 'info, Governed<'info>>,
        new_admin: Pubkey,
    ) -> Result<()> {
        instructions::add_admin::add_admin(ctx.accounts, ctx.remaining_accounts, new_admin)
    }

    pub fn revoke_admin_role<'info>(
        ctx: Context<'_, '_, '_, 'info, Governed<'info>>,
        target: Pubkey,
    ) -> Result<()> {
        instructions::revoke_admin_role::revoke_admin_role(ctx.accounts, ctx.remaining_accounts, target)
    }

    pub fn admin_accept<'info>(ctx: Context<'_, '_, '_, 'info, Governed<'info>>) -> Result<()> {
        instructions::admin_accept::admin_accept(ctx.accounts, ctx.remaining_accounts)
    }

    pub fn release<'info>(
        ctx: Context<'_, '_, '_, 'info, Governed<'info>>,
        name: String,
        commit: bool,
    ) -> Result<()> {
        instructions::release::release(ctx.accounts, ctx.remaining_accounts, name, commit)
    }

    pub fn settle<'info>(ctx: Context<'_, '_, '_, 'info, Governed<'info>>, index: u8) -> Result<()> {
        instructions::settle::settle(ctx.accounts, ctx.remaining_accounts, index)
    }

    pub fn batch_release<'info>(ctx: Context<'_, '_, '_, 'info, Governed<'info>>) -> Result<()> {
        instructions::batch_release::batch_release(ctx.accounts, ctx.remaining_accounts)
    }

    pub fn initialize_marketplace(ctx: Context<InitializeMarketplace>) -> Result<()> {
        instructions::initialize_marketplace::initialize_marketplace(ctx)
    }

    pub fn add_minter(ctx: Context<MarketCall>, minter: Pubkey) -> Result<()> {
        instructions::add_minter::add_minter(ctx, minter)
    }

    pub fn safe_mint(ctx: Context<MarketCall>, to: Pubkey, uri: String) -> Result<()> {
        instructions::safe_mint::safe_mint(ctx, to, uri)
    }

    pub fn propose_mint(ctx: Context<MarketCall>, to: Pubkey, uri: String) -> Result<()> {
        instructions::propose_mint::propose_mint(ctx, to, uri)
    }

    pub fn approve_mint(ctx: Context<MarketCall>) -> Result<()> {
        instructions::approve_mint::approve_mint(ctx)
    }

    pub fn sell_nft(ctx: Context<MarketCall>, token_id: u64, price: u64) -> Result<()> {
        instructions::sell_nft::sell_nft(ctx, token_id, price)
    }

    pub fn purchase_nft(ctx: Context<PurchaseNft>, token_id: u64) -> Result<()> {
        instructions::purchase_nft::purchase_nft(ctx, token_id)
    }
}
