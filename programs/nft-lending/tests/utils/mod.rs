#![allow(dead_code)]

use anchor_lang::prelude::Pubkey as ProgramPubkey;
use anchor_lang::solana_program::program_option::COption;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::{AccountDeserialize, InstructionData};
use anchor_spl::token::spl_token;
use litesvm::types::TransactionResult;
use litesvm::LiteSVM;
use nft_lending::constants::{NFT_VAULT_SEED, VAULT_SEED};
use nft_lending::state::LoanAgreement;
use solana_sdk::{
    account::Account,
    clock::Clock,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
    transaction::Transaction,
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const NOW: i64 = 1_700_000_000;
pub const DAY: i64 = 86_400;
pub const LOAN_DECIMALS: u8 = 6;

const PROGRAM_SO: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../target/deploy/nft_lending.so"
);

pub fn to_sdk(key: &ProgramPubkey) -> Pubkey {
    Pubkey::new_from_array(key.to_bytes())
}

pub fn to_program(key: &Pubkey) -> ProgramPubkey {
    ProgramPubkey::new_from_array(key.to_bytes())
}

pub fn program_id() -> Pubkey {
    to_sdk(&nft_lending::ID)
}

pub fn token_program_id() -> Pubkey {
    to_sdk(&spl_token::ID)
}

pub fn associated_token_program_id() -> Pubkey {
    to_sdk(&anchor_spl::associated_token::ID)
}

/// Fresh VM with the built program loaded and the clock pinned at `NOW`.
pub fn setup() -> LiteSVM {
    let mut svm = LiteSVM::new();
    svm.add_program_from_file(program_id(), PROGRAM_SO).unwrap();
    set_clock(&mut svm, NOW);
    svm
}

pub fn set_clock(svm: &mut LiteSVM, unix_timestamp: i64) {
    let mut clock = svm.get_sysvar::<Clock>();
    clock.unix_timestamp = unix_timestamp;
    svm.set_sysvar::<Clock>(&clock);
}

pub fn funded_keypair(svm: &mut LiteSVM) -> Keypair {
    let keypair = Keypair::new();
    svm.airdrop(&keypair.pubkey(), 10 * LAMPORTS_PER_SOL).unwrap();
    keypair
}

pub fn create_mint(svm: &mut LiteSVM, authority: &Pubkey, decimals: u8, supply: u64) -> Pubkey {
    let mint = Pubkey::new_unique();
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    spl_token::state::Mint::pack(
        spl_token::state::Mint {
            mint_authority: COption::Some(to_program(authority)),
            supply,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        },
        &mut data,
    )
    .unwrap();
    put_token_program_account(svm, mint, data);
    mint
}

/// Token account for `owner` at an arbitrary address, pre-loaded with `amount`.
pub fn create_token_account(svm: &mut LiteSVM, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Pubkey {
    let address = Pubkey::new_unique();
    let mut data = vec![0u8; spl_token::state::Account::LEN];
    spl_token::state::Account::pack(
        spl_token::state::Account {
            mint: to_program(mint),
            owner: to_program(owner),
            amount,
            delegate: COption::None,
            state: spl_token::state::AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: 0,
            close_authority: COption::None,
        },
        &mut data,
    )
    .unwrap();
    put_token_program_account(svm, address, data);
    address
}

fn put_token_program_account(svm: &mut LiteSVM, address: Pubkey, data: Vec<u8>) {
    let lamports = svm.minimum_balance_for_rent_exemption(data.len());
    svm.set_account(
        address,
        Account {
            lamports,
            data,
            owner: token_program_id(),
            executable: false,
            rent_epoch: 0,
        },
    )
    .unwrap();
}

pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program_id().as_ref(), mint.as_ref()],
        &associated_token_program_id(),
    )
    .0
}

pub fn token_balance(svm: &LiteSVM, address: &Pubkey) -> u64 {
    let account = svm.get_account(address).expect("token account should exist");
    spl_token::state::Account::unpack(&account.data).unwrap().amount
}

pub fn is_closed(svm: &LiteSVM, address: &Pubkey) -> bool {
    svm.get_account(address)
        .map_or(true, |account| account.lamports == 0)
}

pub fn send(svm: &mut LiteSVM, instruction: Instruction, payer: &Keypair) -> TransactionResult {
    let tx = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        &[payer],
        svm.latest_blockhash(),
    );
    svm.send_transaction(tx)
}

/// Everything one loan needs: two parties, two mints, their token accounts
/// and the program addresses derived from them.
pub struct LoanFixture {
    pub borrower: Keypair,
    pub lender: Keypair,
    pub nft_mint: Pubkey,
    pub loan_mint: Pubkey,
    pub borrower_nft_account: Pubkey,
    pub borrower_loan_account: Pubkey,
    pub lender_loan_account: Pubkey,
    pub loan_agreement: Pubkey,
    pub nft_vault: Pubkey,
    pub vault: Pubkey,
    pub loan_amount: u64,
}

impl LoanFixture {
    pub fn new(svm: &mut LiteSVM, loan_amount: u64) -> Self {
        Self::with_nft_mint(svm, loan_amount, 0, 1)
    }

    /// Same as `new`, but the collateral mint has the given shape, so it
    /// may not qualify as an NFT.
    pub fn with_nft_mint(
        svm: &mut LiteSVM,
        loan_amount: u64,
        nft_decimals: u8,
        nft_supply: u64,
    ) -> Self {
        let borrower = funded_keypair(svm);
        let lender = funded_keypair(svm);
        let mint_authority = Pubkey::new_unique();

        let nft_mint = create_mint(svm, &mint_authority, nft_decimals, nft_supply);
        let loan_mint = create_mint(svm, &mint_authority, LOAN_DECIMALS, loan_amount);

        let borrower_nft_account = create_token_account(svm, &nft_mint, &borrower.pubkey(), 1);
        let borrower_loan_account = create_token_account(svm, &loan_mint, &borrower.pubkey(), 0);
        let lender_loan_account =
            create_token_account(svm, &loan_mint, &lender.pubkey(), loan_amount);

        let (loan_agreement, _) = nft_lending::state::loan_agreement_address(
            &to_program(&borrower.pubkey()),
            &to_program(&nft_mint),
        );
        let (nft_vault, _) = nft_lending::state::vault_address(NFT_VAULT_SEED, &loan_agreement);
        let (vault, _) = nft_lending::state::vault_address(VAULT_SEED, &loan_agreement);

        Self {
            borrower,
            lender,
            nft_mint,
            loan_mint,
            borrower_nft_account,
            borrower_loan_account,
            lender_loan_account,
            loan_agreement: to_sdk(&loan_agreement),
            nft_vault: to_sdk(&nft_vault),
            vault: to_sdk(&vault),
            loan_amount,
        }
    }

    pub fn lender_nft_account(&self) -> Pubkey {
        associated_token_address(&self.lender.pubkey(), &self.nft_mint)
    }

    pub fn agreement(&self, svm: &LiteSVM) -> LoanAgreement {
        let account = svm
            .get_account(&self.loan_agreement)
            .expect("loan agreement should exist");
        LoanAgreement::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    pub fn initialize_ix(&self, default_at: i64, lender: Option<&Pubkey>) -> Instruction {
        self.instruction(
            nft_lending::instruction::Initialize {
                loan_amount: self.loan_amount,
                default_at,
                lender: lender.map(to_program),
            }
            .data(),
            vec![
                AccountMeta::new(self.borrower.pubkey(), true),
                AccountMeta::new_readonly(self.nft_mint, false),
                AccountMeta::new_readonly(self.loan_mint, false),
                AccountMeta::new(self.loan_agreement, false),
                AccountMeta::new(self.nft_vault, false),
                AccountMeta::new(self.vault, false),
                AccountMeta::new(self.borrower_nft_account, false),
                AccountMeta::new_readonly(token_program_id(), false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
        )
    }

    pub fn lend_ix(&self, expected_amount: u64) -> Instruction {
        self.instruction(
            nft_lending::instruction::Lend { expected_amount }.data(),
            vec![
                AccountMeta::new(self.lender.pubkey(), true),
                AccountMeta::new(self.loan_agreement, false),
                AccountMeta::new_readonly(self.borrower.pubkey(), false),
                AccountMeta::new_readonly(self.loan_mint, false),
                AccountMeta::new(self.lender_loan_account, false),
                AccountMeta::new(self.borrower_loan_account, false),
                AccountMeta::new_readonly(token_program_id(), false),
            ],
        )
    }

    pub fn repay_ix(&self) -> Instruction {
        self.repay_ix_signed_by(&self.borrower.pubkey())
    }

    /// `repay` with `signer` in the borrower slot; every other account is
    /// the real borrower's.
    pub fn repay_ix_signed_by(&self, signer: &Pubkey) -> Instruction {
        self.instruction(
            nft_lending::instruction::Repay {}.data(),
            vec![
                AccountMeta::new(*signer, true),
                AccountMeta::new(self.loan_agreement, false),
                AccountMeta::new_readonly(self.nft_mint, false),
                AccountMeta::new_readonly(self.loan_mint, false),
                AccountMeta::new(self.nft_vault, false),
                AccountMeta::new(self.vault, false),
                AccountMeta::new(self.borrower_loan_account, false),
                AccountMeta::new(self.borrower_nft_account, false),
                AccountMeta::new_readonly(token_program_id(), false),
            ],
        )
    }

    pub fn close_ix(&self) -> Instruction {
        self.close_ix_signed_by(&self.lender.pubkey())
    }

    /// `close` with `signer` in the lender slot. The NFT destination is the
    /// signer's associated token account, as a real client would derive it.
    pub fn close_ix_signed_by(&self, signer: &Pubkey) -> Instruction {
        self.instruction(
            nft_lending::instruction::Close {}.data(),
            vec![
                AccountMeta::new(*signer, true),
                AccountMeta::new(self.borrower.pubkey(), false),
                AccountMeta::new_readonly(self.nft_mint, false),
                AccountMeta::new_readonly(self.loan_mint, false),
                AccountMeta::new(self.loan_agreement, false),
                AccountMeta::new(self.nft_vault, false),
                AccountMeta::new(self.vault, false),
                AccountMeta::new(associated_token_address(signer, &self.nft_mint), false),
                AccountMeta::new(self.lender_loan_account, false),
                AccountMeta::new_readonly(token_program_id(), false),
                AccountMeta::new_readonly(associated_token_program_id(), false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
        )
    }

    pub fn cancel_ix(&self) -> Instruction {
        self.instruction(
            nft_lending::instruction::Cancel {}.data(),
            vec![
                AccountMeta::new(self.borrower.pubkey(), true),
                AccountMeta::new_readonly(self.nft_mint, false),
                AccountMeta::new_readonly(self.loan_mint, false),
                AccountMeta::new(self.loan_agreement, false),
                AccountMeta::new(self.nft_vault, false),
                AccountMeta::new(self.vault, false),
                AccountMeta::new(self.borrower_nft_account, false),
                AccountMeta::new(self.borrower_loan_account, false),
                AccountMeta::new_readonly(token_program_id(), false),
            ],
        )
    }

    fn instruction(&self, data: Vec<u8>, accounts: Vec<AccountMeta>) -> Instruction {
        Instruction {
            program_id: program_id(),
            accounts,
            data,
        }
    }
}
