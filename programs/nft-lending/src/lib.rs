use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

pub use instructions::*;

declare_id!("DEqb986wmZSC2muSNZwYyoRd35zHcYhXkCv5muB8rCXk");

#[program]
pub mod nft_lending {
    use super::*;

    /// Lists an NFT as collateral for a loan of `loan_amount` of the loan mint,
    /// in default from `default_at` on. `lender` optionally pins who may fund it.
    pub fn initialize(
        ctx: Context<Initialize>,
        loan_amount: u64,
        default_at: i64,
        lender: Option<Pubkey>,
    ) -> Result<()> {
        instructions::process_initialize(ctx, loan_amount, default_at, lender)
    }

    pub fn lend(ctx: Context<Lend>, expected_amount: u64) -> Result<()> {
        instructions::process_lend(ctx, expected_amount)
    }

    pub fn repay(ctx: Context<Repay>) -> Result<()> {
        instructions::process_repay(ctx)
    }

    pub fn close(ctx: Context<Close>) -> Result<()> {
        instructions::process_close(ctx)
    }

    pub fn cancel(ctx: Context<Cancel>) -> Result<()> {
        instructions::process_cancel(ctx)
    }
}
