//! Well known development accounts.

/// Mnemonic every local development node (anvil, hardhat) derives its funded
/// accounts from.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Private key of account #0 of [`DEV_MNEMONIC`].
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of account #0 of [`DEV_MNEMONIC`].
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
