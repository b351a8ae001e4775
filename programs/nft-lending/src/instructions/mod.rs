use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, CloseAccount, Mint, TokenAccount, TokenInterface, TransferChecked,
};

pub mod cancel;
pub mod close;
pub mod initialize;
pub mod lend;
pub mod repay;

pub use cancel::*;
pub use close::*;
pub use initialize::*;
pub use lend::*;
pub use repay::*;

/// Moves whatever `vault` holds to `destination`, then closes it and returns
/// its rent to `rent_receiver`. `authority` is the loan agreement PDA.
pub(crate) fn drain_vault<'info>(
    token_program: &Interface<'info, TokenInterface>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    destination: AccountInfo<'info>,
    rent_receiver: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if vault.amount > 0 {
        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                TransferChecked {
                    from: vault.to_account_info(),
                    mint: mint.to_account_info(),
                    to: destination,
                    authority: authority.clone(),
                },
                signer_seeds,
            ),
            vault.amount,
            mint.decimals,
        )?;
    }

    token_interface::close_account(CpiContext::new_with_signer(
        token_program.to_account_info(),
        CloseAccount {
            account: vault.to_account_info(),
            destination: rent_receiver,
            authority,
        },
        signer_seeds,
    ))
}
