pub const ANCHOR_DISCRIMINATOR: usize = 8;

pub const LOAN_SEED: &[u8] = b"loan";
pub const NFT_VAULT_SEED: &[u8] = b"nft_vault";
pub const VAULT_SEED: &[u8] = b"vault";

/// An NFT is a mint with zero decimals and a supply of one.
pub const NFT_AMOUNT: u64 = 1;
pub const NFT_DECIMALS: u8 = 0;
