pub mod allocate;
pub mod governed;
pub mod market;
pub mod records;

pub mod initialize_controller;
pub mod add_beneficiary;
pub mod add_investor;
pub mod add_accounts;
pub mod claim;
pub mod claim_unlocked;
pub mod pause;
pub mod unpause;
pub mod add_admin;
pub mod revoke_admin_role;
pub mod admin_accept;
pub mod create_campaign;
pub mod update_campaign;
pub mod release;
pub mod settle;
pub mod batch_release;
pub mod initialize_marketplace;
pub mod add_minter;
pub mod safe_mint;
pub mod propose_mint;
pub mod approve_mint;
pub mod sell_nft;
pub mod purchase_nft;

pub use allocate::*;
pub use governed::*;
pub use market::*;

pub use initialize_controller::*;
pub use add_beneficiary::*;
pub use add_investor::*;
pub use add_accounts::*;
pub use claim::*;
pub use claim_unlocked::*;
pub use pause::*;
pub use unpause::*;
pub use add_admin::*;
pub use revoke_admin_role::*;
pub use admin_accept::*;
pub use create_campaign::*;
pub use update_campaign::*;
pub use release::*;
pub use settle::*;
pub use batch_release::*;
pub use initialize_marketplace::*;
pub use add_minter::*;
pub use safe_mint::*;
pub use propose_mint::*;
pub use approve_mint::*;
pub use sell_nft::*;
pub use purchase_nft::*;
