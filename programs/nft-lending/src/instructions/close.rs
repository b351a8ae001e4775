use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{NFT_VAULT_SEED, VAULT_SEED};
use crate::error::NftLendingError;
use crate::instructions::drain_vault;
use crate::state::*;

//================================================================
// Accounts Struct for the Close Instruction
//================================================================
#[derive(Accounts)]
pub struct Close<'info> {
    /// The lender recorded when the loan was funded. Collects whatever the
    /// vaults hold: the principal if repaid, the NFT if defaulted.
    #[account(mut)]
    pub lender: Signer<'info>,

    /// CHECK: Bound to the agreement by `has_one`. Paid the rent for the
    /// agreement and vaults, so it gets it back.
    #[account(mut)]
    pub borrower: UncheckedAccount<'info>,

    pub nft_mint: Box<InterfaceAccount<'info, Mint>>,
    pub loan_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        close = borrower,
        has_one = lender @ NftLendingError::IncorrectLender,
        has_one = borrower @ NftLendingError::IncorrectBorrower,
        has_one = nft_mint,
        has_one = loan_mint,
    )]
    pub loan_agreement: Account<'info, LoanAgreement>,

    #[account(
        mut,
        seeds = [NFT_VAULT_SEED, loan_agreement.key().as_ref()],
        bump,
    )]
    pub nft_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, loan_agreement.key().as_ref()],
        bump,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the NFT on default. Created for the lender if missing, also
    /// when the loan settles as repaid and the account stays empty; the
    /// lender pays that rent and keeps the account.
    #[account(
        init_if_needed,
        payer = lender,
        associated_token::mint = nft_mint,
        associated_token::authority = lender,
        associated_token::token_program = token_program,
    )]
    pub lender_nft_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = loan_mint,
        token::authority = lender,
        token::token_program = token_program,
    )]
    pub lender_loan_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

//================================================================
// Instruction Logic for Settling a Loan
//================================================================
pub fn process_close(ctx: Context<Close>) -> Result<()> {
    let clock = Clock::get()?;
    let loan = &ctx.accounts.loan_agreement;

    let settlement = loan.settle(clock.unix_timestamp)?;
    msg!("Closing loan {} as {:?}", loan.key(), settlement);

    // Both vaults are swept regardless of the outcome; the settlement
    // decides which of them still holds anything.
    let seeds = loan.signer_seeds();
    let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];

    drain_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.vault,
        &ctx.accounts.loan_mint,
        ctx.accounts.lender_loan_account.to_account_info(),
        ctx.accounts.borrower.to_account_info(),
        loan.to_account_info(),
        signer_seeds,
    )?;
    drain_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.nft_vault,
        &ctx.accounts.nft_mint,
        ctx.accounts.lender_nft_account.to_account_info(),
        ctx.accounts.borrower.to_account_info(),
        loan.to_account_info(),
        signer_seeds,
    )?;

    match settlement {
        Settlement::Repaid => msg!("Lender {} collected {}", loan.lender, loan.loan_amount),
        Settlement::Defaulted => msg!("Lender {} took NFT {}", loan.lender, loan.nft_mint),
    }
    Ok(())
}
