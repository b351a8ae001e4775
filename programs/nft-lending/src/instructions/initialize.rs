use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::{
    ANCHOR_DISCRIMINATOR, LOAN_SEED, NFT_AMOUNT, NFT_DECIMALS, NFT_VAULT_SEED, VAULT_SEED,
};
use crate::error::NftLendingError;
use crate::state::*;

//================================================================
// Accounts Struct for the Initialize Instruction
//================================================================
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The NFT owner asking for a loan. Pays rent for the agreement and both vaults.
    #[account(mut)]
    pub borrower: Signer<'info>,

    /// Collateral. Must look like an NFT: no decimals, a supply of exactly one.
    #[account(
        mint::token_program = token_program,
        constraint = nft_mint.decimals == NFT_DECIMALS
            && nft_mint.supply == NFT_AMOUNT @ NftLendingError::NotAnNft,
    )]
    pub nft_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The token the principal is lent and repaid in.
    #[account(mint::token_program = token_program)]
    pub loan_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = borrower,
        space = ANCHOR_DISCRIMINATOR + LoanAgreement::INIT_SPACE,
        seeds = [LOAN_SEED, borrower.key().as_ref(), nft_mint.key().as_ref()],
        bump,
    )]
    pub loan_agreement: Account<'info, LoanAgreement>,

    /// Holds the NFT while the loan is open.
    #[account(
        init,
        payer = borrower,
        seeds = [NFT_VAULT_SEED, loan_agreement.key().as_ref()],
        bump,
        token::mint = nft_mint,
        token::authority = loan_agreement,
        token::token_program = token_program,
    )]
    pub nft_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the principal on repayment.
    #[account(
        init,
        payer = borrower,
        seeds = [VAULT_SEED, loan_agreement.key().as_ref()],
        bump,
        token::mint = loan_mint,
        token::authority = loan_agreement,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = nft_mint,
        token::authority = borrower,
        token::token_program = token_program,
    )]
    pub borrower_nft_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

//================================================================
// Instruction Logic for Listing a Loan
//================================================================
pub fn process_initialize(
    ctx: Context<Initialize>,
    loan_amount: u64,
    default_at: i64,
    lender: Option<Pubkey>,
) -> Result<()> {
    let clock = Clock::get()?;

    let agreement = LoanAgreement::listed(
        ctx.accounts.borrower.key(),
        ctx.accounts.nft_mint.key(),
        ctx.accounts.loan_mint.key(),
        loan_amount,
        default_at,
        lender,
        ctx.bumps.loan_agreement,
        clock.unix_timestamp,
    )?;

    // Escrow the NFT. The borrower signs, so no PDA seeds are needed here.
    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.borrower_nft_account.to_account_info(),
                mint: ctx.accounts.nft_mint.to_account_info(),
                to: ctx.accounts.nft_vault.to_account_info(),
                authority: ctx.accounts.borrower.to_account_info(),
            },
        ),
        agreement.nft_amount,
        ctx.accounts.nft_mint.decimals,
    )?;

    ctx.accounts.loan_agreement.set_inner(agreement);

    msg!(
        "Loan listed: {} of {} against NFT {}, defaults at {}",
        loan_amount,
        ctx.accounts.loan_mint.key(),
        ctx.accounts.nft_mint.key(),
        default_at
    );
    if let Some(lender) = lender {
        msg!("Restricted to lender {}", lender);
    }

    Ok(())
}
