use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{NFT_VAULT_SEED, VAULT_SEED};
use crate::error::NftLendingError;
use crate::instructions::drain_vault;
use crate::state::*;

//================================================================
// Accounts Struct for the Cancel Instruction
//================================================================
#[derive(Accounts)]
pub struct Cancel<'info> {
    /// Gets the NFT and all rent back. Only possible while nobody has funded the loan.
    #[account(mut)]
    pub borrower: Signer<'info>,

    pub nft_mint: Box<InterfaceAccount<'info, Mint>>,
    pub loan_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        close = borrower,
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

    #[account(
        mut,
        token::mint = nft_mint,
        token::authority = borrower,
        token::token_program = token_program,
    )]
    pub borrower_nft_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = loan_mint,
        token::authority = borrower,
        token::token_program = token_program,
    )]
    pub borrower_loan_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

//================================================================
// Instruction Logic for Withdrawing an Unfunded Listing
//================================================================
pub fn process_cancel(ctx: Context<Cancel>) -> Result<()> {
    let loan = &ctx.accounts.loan_agreement;
    loan.ensure_cancellable()?;

    let seeds = loan.signer_seeds();
    let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];

    drain_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.nft_vault,
        &ctx.accounts.nft_mint,
        ctx.accounts.borrower_nft_account.to_account_info(),
        ctx.accounts.borrower.to_account_info(),
        loan.to_account_info(),
        signer_seeds,
    )?;
    drain_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.vault,
        &ctx.accounts.loan_mint,
        ctx.accounts.borrower_loan_account.to_account_info(),
        ctx.accounts.borrower.to_account_info(),
        loan.to_account_info(),
        signer_seeds,
    )?;

    msg!("Loan {} cancelled, NFT returned to {}", loan.key(), loan.borrower);
    Ok(())
}
