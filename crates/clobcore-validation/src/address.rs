//! Account address and subaccount id well-formedness.
//!
//! Addresses are bech32 strings (BIP-173 checksum) under a fixed
//! human-readable prefix. Only syntax is checked: whether the account exists
//! is not this crate's concern.

use clobcore_types::{ClobError, OrderValidationParams, Result, SubaccountId};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];
const CHECKSUM_LEN: usize = 6;
const MAX_ADDRESS_LEN: usize = 90;
const MAX_ADDRESS_BYTES: usize = 255;

/// Checks that a subaccount id is well formed.
///
/// The message validator delegates rule 1 to an implementation of this
/// trait, so hosts with their own account rules can plug them in.
pub trait SubaccountIdValidator: Send + Sync {
    fn validate(&self, subaccount_id: &SubaccountId) -> Result<()>;
}

/// Bech32 owner address under a fixed prefix plus a bounded number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32SubaccountValidator {
    prefix: String,
    max_number: u32,
}

impl Bech32SubaccountValidator {
    #[must_use]
    pub fn new(prefix: impl Into<String>, max_number: u32) -> Self {
        Self {
            prefix: prefix.into(),
            max_number,
        }
    }

    #[must_use]
    pub fn from_params(params: &OrderValidationParams) -> Self {
        Self::new(params.address_prefix.clone(), params.max_subaccount_number)
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for Bech32SubaccountValidator {
    fn default() -> Self {
        Self::from_params(&OrderValidationParams::default())
    }
}

impl SubaccountIdValidator for Bech32SubaccountValidator {
    fn validate(&self, subaccount_id: &SubaccountId) -> Result<()> {
        validate_address("subaccount owner", &subaccount_id.owner, &self.prefix)?;
        if subaccount_id.number > self.max_number {
            return Err(ClobError::InvalidSubaccountNumber {
                number: subaccount_id.number,
                max: self.max_number,
            });
        }
        Ok(())
    }
}

/// Validate a bech32 address under `prefix`.
///
/// `field` names the address in the returned error.
pub fn validate_address(field: &'static str, address: &str, prefix: &str) -> Result<()> {
    let invalid = |reason: &str| ClobError::InvalidAddress {
        field,
        address: address.to_string(),
        reason: reason.to_string(),
    };
    let (hrp, bytes) = decode(address).map_err(invalid)?;
    if hrp != prefix {
        return Err(invalid(&format!("expected prefix {prefix:?}, got {hrp:?}")));
    }
    if bytes.is_empty() || bytes.len() > MAX_ADDRESS_BYTES {
        return Err(invalid("decoded address length out of range"));
    }
    Ok(())
}

/// Split a bech32 string into its human-readable part and payload bytes.
fn decode(address: &str) -> std::result::Result<(String, Vec<u8>), &'static str> {
    if !address.is_ascii() {
        return Err("non-ascii character");
    }
    if address.len() < 1 + 1 + CHECKSUM_LEN || address.len() > MAX_ADDRESS_LEN {
        return Err("invalid length");
    }
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err("mixed case");
    }
    let address = address.to_ascii_lowercase();

    let sep = address.rfind('1').ok_or("missing separator")?;
    if sep == 0 {
        return Err("empty human-readable part");
    }
    if sep + 1 + CHECKSUM_LEN > address.len() {
        return Err("data part too short");
    }
    let (hrp, data) = (&address[..sep], &address[sep + 1..]);
    if hrp.bytes().any(|b| !(33..=126).contains(&b)) {
        return Err("invalid human-readable character");
    }

    let mut values = Vec::with_capacity(data.len());
    for c in data.bytes() {
        let v = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or("invalid data character")?;
        // `position` over a 32-entry table always fits.
        values.push(v as u8);
    }

    let expanded = hrp
        .bytes()
        .map(|b| b >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|b| b & 31));
    if polymod(expanded.chain(values.iter().copied())) != 1 {
        return Err("invalid checksum");
    }

    let payload = &values[..values.len() - CHECKSUM_LEN];
    let bytes = from_base32(payload).ok_or("invalid padding")?;
    Ok((hrp.to_string(), bytes))
}

fn polymod(values: impl Iterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

/// Regroup 5-bit values into bytes. Leftover bits must be zero padding
/// shorter than one group.
fn from_base32(data: &[u8]) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * 5 / 8);
    for &v in data {
        acc = ((acc << 5) | u32::from(v)) & 0xfff;
        bits += 5;
        while bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xff) as u8);
        }
    }
    if bits >= 5 || ((acc << (8 - bits)) & 0xff) != 0 {
        return None;
    }
    Some(out)
}
