use anchor_lang::prelude::*;

/// Custom error codes for the consensus vesting program.
#[error_code]
pub enum VestingError {
    #[msg("Unauthorized: caller is not an admin")]
    NotAuthorized,

    #[msg("Slot has already been claimed")]
    AlreadyClaimed,

    #[msg("Slot is not unlocked yet")]
    NotYetUnlocked,

    #[msg("System is paused")]
    SystemPaused,

    #[msg("Allocation would exceed funded balance")]
    ExceedsFundedBalance,

    #[msg("Campaign already exists")]
    DuplicateCampaign,

    #[msg("Campaign not found")]
    UnknownCampaign,

    #[msg("Campaign is finalized")]
    CampaignFinalized,

    #[msg("Cannot remove the last admin")]
    CannotRemoveLastAdmin,

    #[msg("Another action is pending consensus")]
    ActionInProgress,

    #[msg("No action is pending consensus")]
    NoActivePending,

    #[msg("Malformed schedule input")]
    MalformedSchedule,

    #[msg("Transfer failed after claim was recorded; manual reconciliation required")]
    TransferFailed,

    #[msg("System is already paused")]
    AlreadyPaused,

    #[msg("System is not paused")]
    NotPaused,

    #[msg("Identity is already an admin")]
    DuplicateAdmin,

    #[msg("Identity is not an admin")]
    UnknownAdmin,

    #[msg("Admin set is full")]
    AdminSetFull,

    #[msg("Invalid consensus threshold")]
    InvalidThreshold,

    #[msg("Beneficiary already exists")]
    DuplicateBeneficiary,

    #[msg("Beneficiary not found")]
    UnknownBeneficiary,

    #[msg("Pool not found")]
    UnknownPool,

    #[msg("Slot index out of range")]
    SlotOutOfRange,

    #[msg("Capacity exceeded")]
    CapacityExceeded,

    #[msg("Unsettled transfer not found")]
    UnknownSettlement,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Token not found")]
    UnknownToken,

    #[msg("Caller is not the token owner")]
    NotTokenOwner,

    #[msg("Token is already listed")]
    AlreadyListed,

    #[msg("Token is not listed")]
    NotListed,

    #[msg("Invalid price (must be > 0)")]
    InvalidPrice,

    #[msg("Insufficient funds")]
    InsufficientFunds,

    #[msg("Identity is already a minter")]
    DuplicateMinter,

    #[msg("Token URI is empty or too long")]
    InvalidUri,

    #[msg("Account is not a beneficiary record of this controller")]
    InvalidBeneficiaryAccount,

    #[msg("Invalid pubkey")]
    InvalidPubkey,
}

/// Result of core (non-instruction) operations.
pub type VestingResult<T> = std::result::Result<T, VestingError>;
