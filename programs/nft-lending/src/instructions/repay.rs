use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::{NFT_VAULT_SEED, VAULT_SEED};
use crate::error::NftLendingError;
use crate::state::*;

//================================================================
// Accounts Struct for the Repay Instruction
//================================================================
#[derive(Accounts)]
pub struct Repay<'info> {
    pub borrower: Signer<'info>,

    #[account(
        mut,
        has_one = borrower @ NftLendingError::IncorrectBorrower,
        has_one = nft_mint,
        has_one = loan_mint,
    )]
    pub loan_agreement: Account<'info, LoanAgreement>,

    pub nft_mint: Box<InterfaceAccount<'info, Mint>>,
    pub loan_mint: Box<InterfaceAccount<'info, Mint>>,

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
        token::mint = loan_mint,
        token::authority = borrower,
        token::token_program = token_program,
    )]
    pub borrower_loan_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = nft_mint,
        token::authority = borrower,
        token::token_program = token_program,
    )]
    pub borrower_nft_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

//================================================================
// Instruction Logic for Repaying a Loan
//================================================================
pub fn process_repay(ctx: Context<Repay>) -> Result<()> {
    ctx.accounts.loan_agreement.repay()?;

    let loan = &ctx.accounts.loan_agreement;

    // --- 1. Principal goes back into the loan vault for the lender to collect ---
    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.borrower_loan_account.to_account_info(),
                mint: ctx.accounts.loan_mint.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.borrower.to_account_info(),
            },
        ),
        loan.loan_amount,
        ctx.accounts.loan_mint.decimals,
    )?;

    // --- 2. NFT is released to the borrower, signed by the agreement PDA ---
    let seeds = loan.signer_seeds();
    let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];
    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.nft_vault.to_account_info(),
                mint: ctx.accounts.nft_mint.to_account_info(),
                to: ctx.accounts.borrower_nft_account.to_account_info(),
                authority: loan.to_account_info(),
            },
        )
        .with_signer(signer_seeds),
        loan.nft_amount,
        ctx.accounts.nft_mint.decimals,
    )?;

    msg!(
        "Loan {} repaid. Amount: {}",
        loan.key(),
        loan.loan_amount
    );
    Ok(())
}
