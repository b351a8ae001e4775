use anchor_lang::prelude::*;

use crate::constants::{LOAN_SEED, NFT_AMOUNT};
use crate::error::NftLendingError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum LoanStatus {
    /// NFT is escrowed, waiting for a lender.
    Listed,
    /// Principal has been paid out to the borrower.
    Active,
    /// Principal is back in the vault and the NFT is back with the borrower.
    Repaid,
}

/// What the lender walks away with when a funded loan is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Repaid,
    Defaulted,
}

//================================================================
// Loan Agreement Account
//================================================================
/// One NFT-backed loan. Lives at `["loan", borrower, nft_mint]` and is the
/// token authority of both of its vaults.
#[account]
#[derive(InitSpace, Debug)]
pub struct LoanAgreement {
    pub borrower: Pubkey,
    pub lender: Pubkey,
    /// When set, only this key may fund the loan.
    pub allowed_lender: Option<Pubkey>,
    pub nft_mint: Pubkey,
    pub loan_mint: Pubkey,
    pub loan_amount: u64,
    pub nft_amount: u64,
    pub default_at: i64,
    pub status: LoanStatus,
    pub bump: u8,
}

impl LoanAgreement {
    /// Builds a freshly listed agreement, rejecting terms that could never be
    /// repaid or that are already in default.
    #[allow(clippy::too_many_arguments)]
    pub fn listed(
        borrower: Pubkey,
        nft_mint: Pubkey,
        loan_mint: Pubkey,
        loan_amount: u64,
        default_at: i64,
        allowed_lender: Option<Pubkey>,
        bump: u8,
        now: i64,
    ) -> Result<Self> {
        require!(loan_amount > 0, NftLendingError::LoanCannotBeZero);
        require!(default_at > now, NftLendingError::DefaultAtInPast);

        Ok(Self {
            borrower,
            lender: Pubkey::default(),
            allowed_lender,
            nft_mint,
            loan_mint,
            loan_amount,
            nft_amount: NFT_AMOUNT,
            default_at,
            status: LoanStatus::Listed,
            bump,
        })
    }

    /// Records `lender` as the funder. `expected_amount` must match the
    /// agreement so a lender never pays for terms they did not see. A listing
    /// that has reached `default_at` can no longer be funded.
    pub fn fund(&mut self, lender: Pubkey, expected_amount: u64, now: i64) -> Result<()> {
        require!(
            self.loan_amount == expected_amount,
            NftLendingError::UnexpectedLoanAgreement
        );
        require!(
            self.status == LoanStatus::Listed,
            NftLendingError::LoanAlreadyFunded
        );
        require!(now < self.default_at, NftLendingError::LoanExpired);
        if let Some(allowed_lender) = self.allowed_lender {
            require_keys_eq!(allowed_lender, lender, NftLendingError::IncorrectLender);
        }

        self.lender = lender;
        self.status = LoanStatus::Active;
        Ok(())
    }

    pub fn repay(&mut self) -> Result<()> {
        require!(
            self.status == LoanStatus::Active,
            NftLendingError::LoanNotActive
        );
        self.status = LoanStatus::Repaid;
        Ok(())
    }

    /// Decides who gets what at `now`. An active loan only settles once it
    /// has reached `default_at`.
    pub fn settle(&self, now: i64) -> Result<Settlement> {
        match self.status {
            LoanStatus::Repaid => Ok(Settlement::Repaid),
            LoanStatus::Active if now >= self.default_at => Ok(Settlement::Defaulted),
            LoanStatus::Active => err!(NftLendingError::DefaultAtIsNotReached),
            LoanStatus::Listed => err!(NftLendingError::LoanNotActive),
        }
    }

    pub fn ensure_cancellable(&self) -> Result<()> {
        require!(
            self.status == LoanStatus::Listed,
            NftLendingError::LoanAlreadyFunded
        );
        Ok(())
    }

    /// Seeds the program signs with when moving tokens out of the vaults.
    pub fn signer_seeds(&self) -> [&[u8]; 4] {
        [
            LOAN_SEED,
            self.borrower.as_ref(),
            self.nft_mint.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }
}

pub fn loan_agreement_address(borrower: &Pubkey, nft_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[LOAN_SEED, borrower.as_ref(), nft_mint.as_ref()],
        &crate::ID,
    )
}

/// Address of the `NFT_VAULT_SEED` or `VAULT_SEED` token account of a loan.
pub fn vault_address(seed: &[u8], loan_agreement: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seed, loan_agreement.as_ref()], &crate::ID)
}
