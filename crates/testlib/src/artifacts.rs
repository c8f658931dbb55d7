//! Contract artifact JSON in the shapes produced by Truffle and Foundry.

use {
    serde_json::{Value, json},
    std::{fs, path::Path},
};

/// `PUSH1 0 PUSH1 0 RETURN`: creation code of a contract with empty runtime
/// code. Deploying it always succeeds and ignores appended constructor
/// arguments.
pub const EMPTY_RUNTIME_INIT_CODE: &[u8] = &[0x60, 0x00, 0x60, 0x00, 0xf3];
const EMPTY_RUNTIME_INIT_CODE_HEX: &str = "0x60006000f3";

/// A token without constructor arguments.
pub fn token() -> String {
    truffle("KDZTokens", json!([]), EMPTY_RUNTIME_INIT_CODE_HEX)
}

/// A marketplace taking the address of the NFT contract it trades.
pub fn marketplace() -> String {
    truffle(
        "NFT2ETHMarketPlace",
        json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "nftContract", "type": "address", "internalType": "address" }],
        }]),
        EMPTY_RUNTIME_INIT_CODE_HEX,
    )
}

/// A contract taking an `uint256` and a `string`.
pub fn capped_token() -> String {
    truffle(
        "CappedToken",
        json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "cap", "type": "uint256", "internalType": "uint256" },
                { "name": "symbol", "type": "string", "internalType": "string" },
            ],
        }]),
        EMPTY_RUNTIME_INIT_CODE_HEX,
    )
}

/// A contract linking against a library that was never deployed.
pub fn unlinked() -> String {
    truffle(
        "Lib",
        json!([]),
        "0x6080604052__$1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e$__6000f3",
    )
}

/// An interface, which has no bytecode.
pub fn interface() -> String {
    truffle("IERC721", json!([]), "0x")
}

fn truffle(name: &str, abi: Value, bytecode: &str) -> String {
    json!({
        "contractName": name,
        "abi": abi,
        "bytecode": bytecode,
        "deployedBytecode": "0x",
        "networks": {},
    })
    .to_string()
}

/// Stores `json` the way `truffle compile` does: `<dir>/<name>.json`.
pub fn write_truffle(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(format!("{name}.json")), json).unwrap();
}

/// Stores `json` the way `forge build` does: `<dir>/<name>.sol/<name>.json`,
/// with the bytecode nested in an `object` field.
pub fn write_foundry(dir: &Path, name: &str, json: &str) {
    let mut artifact: Value = serde_json::from_str(json).unwrap();
    let bytecode = artifact["bytecode"].take();
    artifact["bytecode"] = json!({ "object": bytecode, "linkReferences": {} });
    let contract_dir = dir.join(format!("{name}.sol"));
    fs::create_dir_all(&contract_dir).unwrap();
    fs::write(contract_dir.join(format!("{name}.json")), artifact.to_string()).unwrap();
}
