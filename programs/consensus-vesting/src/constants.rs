//! Program-wide constants: capacities, PDA seeds and pool names.

/// Max admins in the consensus set.
pub const MAX_ADMINS: usize = 5;

/// Max beneficiary records processed per `batch_release` call.
pub const MAX_BATCH_RELEASE: usize = 5;

/// Max identities registered per `add_accounts` call.
pub const MAX_ACCOUNTS_BATCH: usize = 8;

/// Max named pools per beneficiary (e.g. "seed" and "private").
pub const MAX_POOLS: usize = 2;

/// Max tranches per pool (31 monthly releases; claim flags are a u64 bitmask).
pub const MAX_TRANCHES: usize = 31;

/// Max campaigns stored in a controller.
pub const MAX_CAMPAIGNS: usize = 4;

/// Max participants per campaign.
pub const MAX_PARTICIPANTS: usize = 10;

/// Max byte length of pool and campaign names.
pub const MAX_NAME_LEN: usize = 16;

/// Max failed transfers awaiting manual settlement.
pub const MAX_UNSETTLED: usize = MAX_PARTICIPANTS;

/// Max steps in the default investor release schedule.
pub const MAX_DEFAULT_STEPS: usize = MAX_TRANCHES;

/// Max NFTs tracked by a marketplace.
pub const MAX_TOKENS: usize = 32;

/// Max minters besides the marketplace owner.
pub const MAX_MINTERS: usize = 8;

/// Max byte length of an NFT token URI.
pub const MAX_URI_LEN: usize = 64;

/// Seconds per day (UTC).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Release rates are expressed in basis points of this denominator.
pub const RATE_DENOMINATOR: u64 = 10_000;

/// Pool receiving `add_investor` allocations.
pub const INVESTOR_POOL: &str = "investor";

/// Pool receiving `add_accounts` allocations.
pub const COMMUNITY_POOL: &str = "community";

pub const CONTROLLER_SEED: &[u8] = b"controller";
pub const VAULT_SEED: &[u8] = b"vault";
pub const BENEFICIARY_SEED: &[u8] = b"beneficiary";
pub const MARKETPLACE_SEED: &[u8] = b"marketplace";
