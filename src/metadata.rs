//! Metaplex token-metadata support
//!
//! PDA derivation, `CreateMetadataAccountV3` instruction encoding, and a
//! tolerant decoder for the name/symbol/uri fields. The on-chain account
//! layout is
//!
//! ```text
//! key (1) | update_authority (32) | mint (32) | name | symbol | uri | ...
//! ```
//!
//! where each string is a u32 little-endian length prefix followed by
//! utf8 bytes, padded with trailing zeros inside the allocated space.
//! Instruction args carry the same length-prefixed strings without
//! padding, and options as a 0/1 tag byte.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use crate::pipeline::SubmitError;

/// On-chain token metadata program
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

const CREATE_METADATA_ACCOUNT_V3: u8 = 33;

const MAX_NAME_LENGTH: usize = 32;
const MAX_SYMBOL_LENGTH: usize = 10;
const MAX_URI_LENGTH: usize = 200;

/// Token-level metadata fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// Derive the metadata PDA for a mint
pub fn find_metadata_pda(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

/// Build the `CreateMetadataAccountV3` instruction
///
/// The metadata account is created mutable, with no creators,
/// collection, or uses, matching a plain fungible token.
pub fn create_metadata_account_v3(
    mint: &Pubkey,
    mint_authority: &Pubkey,
    payer: &Pubkey,
    update_authority: &Pubkey,
    metadata: &TokenMetadata,
) -> Result<Instruction, SubmitError> {
    if metadata.name.len() > MAX_NAME_LENGTH {
        return Err(SubmitError::Configuration(format!(
            "Token name exceeds {} bytes",
            MAX_NAME_LENGTH
        )));
    }
    if metadata.symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(SubmitError::Configuration(format!(
            "Token symbol exceeds {} bytes",
            MAX_SYMBOL_LENGTH
        )));
    }
    if metadata.uri.len() > MAX_URI_LENGTH {
        return Err(SubmitError::Configuration(format!(
            "Metadata uri exceeds {} bytes",
            MAX_URI_LENGTH
        )));
    }

    let mut data =
        Vec::with_capacity(1 + 3 * 4 + metadata.name.len() + metadata.symbol.len()
            + metadata.uri.len() + 7);
    data.push(CREATE_METADATA_ACCOUNT_V3);
    put_str(&mut data, &metadata.name);
    put_str(&mut data, &metadata.symbol);
    put_str(&mut data, &metadata.uri);
    data.extend_from_slice(&0u16.to_le_bytes()); // seller_fee_basis_points
    data.push(0); // creators: None
    data.push(0); // collection: None
    data.push(0); // uses: None
    data.push(1); // is_mutable
    data.push(0); // collection_details: None

    let metadata_pda = find_metadata_pda(mint);
    Ok(Instruction {
        program_id: TOKEN_METADATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(metadata_pda, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*update_authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// Decode the name/symbol/uri of a metadata account
///
/// Returns `None` for missing or malformed data; callers treat absent
/// metadata as a token without a registered name.
pub fn decode_metadata(data: &[u8]) -> Option<TokenMetadata> {
    // key + update_authority + mint
    let mut offset = 1 + 32 + 32;
    let name = read_str(data, &mut offset)?;
    let symbol = read_str(data, &mut offset)?;
    let uri = read_str(data, &mut offset)?;
    Some(TokenMetadata { name, symbol, uri })
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn read_str(data: &[u8], offset: &mut usize) -> Option<String> {
    let len_bytes = data.get(*offset..*offset + 4)?;
    let len = u32::from_le_bytes(len_bytes.try_into().ok()?) as usize;
    *offset = offset.checked_add(4)?;
    // guard against a corrupt length prefix
    if len > 4 * MAX_URI_LENGTH {
        return None;
    }
    let raw = data.get(*offset..offset.checked_add(len)?)?;
    *offset += len;
    let s = std::str::from_utf8(raw).ok()?;
    Some(s.trim_end_matches('\0').to_string())
}
