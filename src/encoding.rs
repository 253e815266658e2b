//! Length-prefixed framing shared by every wire format.
//!
//! A message is a fixed number of parts, each `[len: u32 BE][bytes]`. Optional
//! fields are encoded as zero-length parts.

use crate::types::Error;

const LEN_BYTES: usize = 4;

pub fn enc_len(len: usize) -> Result<[u8; LEN_BYTES], Error> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::MalformedInput)
}

pub fn enc_tuple(parts: &[&[u8]]) -> Result<Vec<u8>, Error> {
    let total_len: usize = parts.iter().map(|p| LEN_BYTES + p.len()).sum();
    let mut out = Vec::with_capacity(total_len);
    for part in parts {
        out.extend_from_slice(&enc_len(part.len())?);
        out.extend_from_slice(part);
    }
    Ok(out)
}

pub fn enc_opt(part: Option<&[u8]>) -> &[u8] {
    part.unwrap_or(&[])
}

/// Split one part off the front of `input`.
pub fn dec_part(input: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    if input.len() < LEN_BYTES {
        return Err(Error::MalformedInput);
    }
    let (len, rest) = input.split_at(LEN_BYTES);
    let len = dec_u32(len)? as usize;
    if rest.len() < len {
        return Err(Error::MalformedInput);
    }
    Ok(rest.split_at(len))
}

/// Decode exactly `n` parts with nothing left over.
pub fn dec_tuple(mut input: &[u8], n: usize) -> Result<Vec<Vec<u8>>, Error> {
    let mut parts = Vec::with_capacity(n);
    for _ in 0..n {
        let (part, rest) = dec_part(input)?;
        parts.push(part.to_vec());
        input = rest;
    }
    if !input.is_empty() {
        return Err(Error::MalformedInput);
    }
    Ok(parts)
}

pub fn dec_u32(bytes: &[u8]) -> Result<u32, Error> {
    let raw: [u8; 4] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
    Ok(u32::from_be_bytes(raw))
}

pub fn dec_u64(bytes: &[u8]) -> Result<u64, Error> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
    Ok(u64::from_be_bytes(raw))
}
