use anchor_lang::prelude::*;

#[error_code]
pub enum NftLendingError {
    #[msg("Loan cannot be zero.")]
    LoanCannotBeZero,
    #[msg("Default at must be in the future.")]
    DefaultAtInPast,
    #[msg("Collateral mint is not an NFT.")]
    NotAnNft,
    #[msg("Unexpected loan agreement.")]
    UnexpectedLoanAgreement,
    #[msg("Loan has already been funded.")]
    LoanAlreadyFunded,
    #[msg("Loan has passed its default time and can no longer be funded.")]
    LoanExpired,
    #[msg("Loan is not active.")]
    LoanNotActive,
    #[msg("Default at is not reached.")]
    DefaultAtIsNotReached,
    #[msg("Incorrect borrower.")]
    IncorrectBorrower,
    #[msg("Incorrect lender.")]
    IncorrectLender,
}
