//! On-disk layout for generated prime tables.
//!
//! A table file is a fixed 8-byte magic/version header followed by a flat
//! array of little-endian `u64`s. `tools/gen_tables.rs` writes this format;
//! [`read`]/[`write`] are the shared codec so the generator and any runtime
//! loader agree on it. Mirrors the original's raw `.dat` blobs, minus their
//! platform-specific `std::array` memory layout.

use std::io;

const MAGIC: [u8; 4] = *b"FEPT"; // FactorEngine Prime Table
const VERSION: u32 = 1;

pub fn write<W: std::io::Write>(mut out: W, values: &[u64]) -> io::Result<()> {
    out.write_all(&MAGIC)?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&(values.len() as u64).to_le_bytes())?;
    for &v in values {
        out.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

pub fn read<R: std::io::Read>(mut input: R) -> io::Result<Vec<u64>> {
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "not a factorengine prime table"));
    }
    let mut version = [0u8; 4];
    input.read_exact(&mut version)?;
    if u32::from_le_bytes(version) != VERSION {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "unsupported prime table version"));
    }
    let mut len_bytes = [0u8; 8];
    input.read_exact(&mut len_bytes)?;
    let len = u64::from_le_bytes(len_bytes) as usize;

    let mut values = Vec::with_capacity(len);
    let mut buf = [0u8; 8];
    for _ in 0..len {
        input.read_exact(&mut buf)?;
        values.push(u64::from_le_bytes(buf));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let values = vec![2, 3, 5, 7, 11, 1_000_003];
        let mut buf = Vec::new();
        write(&mut buf, &values).unwrap();
        let back = read(&buf[..]).unwrap();
        assert_eq!(values, back);
    }
}
