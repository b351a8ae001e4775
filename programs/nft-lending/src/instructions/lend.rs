use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::error::NftLendingError;
use crate::state::*;

//================================================================
// Accounts Struct for the Lend Instruction
//================================================================
#[derive(Accounts)]
pub struct Lend<'info> {
    pub lender: Signer<'info>,

    #[account(
        mut,
        has_one = borrower @ NftLendingError::IncorrectBorrower,
        has_one = loan_mint,
    )]
    pub loan_agreement: Account<'info, LoanAgreement>,

    /// CHECK: Bound to the agreement by `has_one`; only used as the owner of
    /// `borrower_loan_account`.
    pub borrower: UncheckedAccount<'info>,

    pub loan_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = loan_mint,
        token::authority = lender,
        token::token_program = token_program,
    )]
    pub lender_loan_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Where the principal is paid out.
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
// Instruction Logic for Funding a Loan
//================================================================
pub fn process_lend(ctx: Context<Lend>, expected_amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let lender = ctx.accounts.lender.key();
    ctx.accounts
        .loan_agreement
        .fund(lender, expected_amount, clock.unix_timestamp)?;

    let loan_amount = ctx.accounts.loan_agreement.loan_amount;
    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.lender_loan_account.to_account_info(),
                mint: ctx.accounts.loan_mint.to_account_info(),
                to: ctx.accounts.borrower_loan_account.to_account_info(),
                authority: ctx.accounts.lender.to_account_info(),
            },
        ),
        loan_amount,
        ctx.accounts.loan_mint.decimals,
    )?;

    msg!(
        "Loan {} funded by {}. Amount: {}",
        ctx.accounts.loan_agreement.key(),
        lender,
        loan_amount
    );
    Ok(())
}
