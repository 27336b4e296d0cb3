//! FastLZ block codec.
//!
//! A byte-oriented LZ77 variant with two formats. The top three bits of the
//! first byte carry the format tag (`level - 1`); the rest of the block is a
//! token stream of literal runs and back-references:
//!
//! ```text
//! 000LLLLL                      literal run of L+1 bytes follows
//! LLLDDDDD dddddddd             match, length L+2, distance (D<<8|d)+1
//! 111DDDDD llllllll dddddddd    level 1 long match, length l+9
//! 111DDDDD [ff..] llllllll ...  level 2 long match, length extended by 255s
//! LLL11111 ff hhhhhhhh llllllll level 2 far match, distance (h<<8|l)+8192
//! ```
//!
//! Level 1 reaches back 8 KiB; level 2 reaches back about 72 KiB and is
//! better on long runs. Output of [`compress_level`] is byte-for-byte the
//! classic reference encoder's, so blocks interoperate in both directions.
//!
//! Decoding never writes past the caller's limit and fails on truncated
//! streams, unknown tags, and references before the start of the output.

use num_enum::TryFromPrimitive;

use crate::error::{CompressionError, Result};

const MAX_COPY: usize = 32;
const MAX_LEN: usize = 264;
const MAX_L1_DISTANCE: usize = 8192;
const MAX_L2_DISTANCE: usize = 8191;
const MAX_FAR_DISTANCE: usize = 65535 + MAX_L2_DISTANCE - 1;

const HASH_LOG: u32 = 13;
const HASH_SIZE: usize = 1 << HASH_LOG;
const HASH_MASK: u32 = (HASH_SIZE as u32) - 1;

/// Inputs at least this long are compressed with level 2 by [`compress`].
pub const LEVEL2_THRESHOLD: usize = 65536;

/// FastLZ format level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum Level {
    /// Fast, 8 KiB window.
    One = 1,
    /// Slower, long runs and a ~72 KiB window.
    Two = 2,
}

impl Level {
    /// Level encoded by the top three bits of a block's first byte.
    pub fn from_tag(first: u8) -> Result<Self> {
        let tag = first >> 5;
        Level::try_from(tag + 1).map_err(|_| CompressionError::UnknownLevel(tag))
    }
}

impl TryFrom<i64> for Level {
    type Error = CompressionError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Level::try_from_primitive(v).ok())
            .ok_or(CompressionError::InvalidLevel(value.clamp(0, 255) as u8))
    }
}

/// Compress `input`, picking level 1 for inputs under 64 KiB and level 2
/// otherwise.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let level = if input.len() < LEVEL2_THRESHOLD {
        Level::One
    } else {
        Level::Two
    };
    compress_level(input, level)
}

/// Compress `input` with an explicit format level.
///
/// Empty input compresses to an empty block. Inputs shorter than four bytes
/// become a single literal run (tagged as level 1 regardless of `level`).
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compress_level(input: &[u8], level: Level) -> Vec<u8> {
    let length = input.len();
    let mut out = Vec::with_capacity(length + length / 32 + 2);

    if length < 4 {
        if length > 0 {
            out.push((length - 1) as u8);
            out.extend_from_slice(input);
        }
        return out;
    }

    let ip_bound = length - 2;
    let ip_limit = length.saturating_sub(12);
    let max_distance = match level {
        Level::One => MAX_L1_DISTANCE,
        Level::Two => MAX_FAR_DISTANCE,
    };

    let mut htab = vec![0usize; HASH_SIZE];
    let mut ip = 2usize;
    let mut copy = 2usize;

    // Start with a literal run; its count byte is patched later.
    out.push((MAX_COPY - 1) as u8);
    out.push(input[0]);
    out.push(input[1]);

    while ip < ip_limit {
        let anchor = ip;
        let mut len = 3usize;
        let mut distance;
        let mut reference;

        let matched = 'probe: {
            if level == Level::Two
                && input[ip] == input[ip - 1]
                && read_u16(input, ip - 1) == read_u16(input, ip + 1)
            {
                distance = 1;
                reference = anchor + 2;
                break 'probe true;
            }

            let slot = hash(input, ip);
            reference = htab[slot];
            distance = anchor - reference;
            htab[slot] = anchor;

            if distance == 0
                || distance >= max_distance
                || input[reference..reference + 3] != input[ip..ip + 3]
            {
                break 'probe false;
            }
            reference += 3;

            if level == Level::Two && distance >= MAX_L2_DISTANCE {
                // Far matches must cover at least five bytes.
                if input[reference..reference + 2] != input[ip + 3..ip + 5] {
                    break 'probe false;
                }
                reference += 2;
                len += 2;
            }
            true
        };

        if !matched {
            out.push(input[anchor]);
            ip = anchor + 1;
            copy += 1;
            if copy == MAX_COPY {
                copy = 0;
                out.push((MAX_COPY - 1) as u8);
            }
            continue;
        }

        ip = anchor + len;
        distance -= 1;

        if distance == 0 {
            // Run of a single byte.
            let x = input[ip - 1];
            while ip < ip_bound {
                let b = input[reference];
                reference += 1;
                if b != x {
                    break;
                }
                ip += 1;
            }
        } else {
            // Eight unconditional steps, then a bounded scan. The step count
            // is part of the format's reference output.
            let mut stopped = false;
            for _ in 0..8 {
                let same = input.get(reference) == input.get(ip);
                reference += 1;
                ip += 1;
                if !same {
                    stopped = true;
                    break;
                }
            }
            if !stopped {
                while ip < ip_bound {
                    let same = input[reference] == input[ip];
                    reference += 1;
                    ip += 1;
                    if !same {
                        break;
                    }
                }
            }
        }

        // Close the pending literal run, or drop its unused count byte.
        if copy > 0 {
            let at = out.len() - copy - 1;
            out[at] = (copy - 1) as u8;
        } else {
            out.pop();
        }
        copy = 0;

        ip -= 3;
        let len = ip - anchor;
        match level {
            Level::One => encode_match_l1(&mut out, len, distance),
            Level::Two => encode_match_l2(&mut out, len, distance),
        }

        let slot = hash(input, ip);
        htab[slot] = ip;
        ip += 1;
        let slot = hash(input, ip);
        htab[slot] = ip;
        ip += 1;

        out.push((MAX_COPY - 1) as u8);
    }

    while ip < length {
        out.push(input[ip]);
        ip += 1;
        copy += 1;
        if copy == MAX_COPY {
            copy = 0;
            out.push((MAX_COPY - 1) as u8);
        }
    }

    if copy > 0 {
        let at = out.len() - copy - 1;
        out[at] = (copy - 1) as u8;
    } else {
        out.pop();
    }

    if level == Level::Two {
        out[0] |= 1 << 5;
    }

    out
}

fn encode_match_l1(out: &mut Vec<u8>, mut len: usize, distance: usize) {
    let high = (distance >> 8) as u8;
    let low = (distance & 255) as u8;

    while len > MAX_LEN - 2 {
        out.push((7 << 5) + high);
        out.push((MAX_LEN - 2 - 7 - 2) as u8);
        out.push(low);
        len -= MAX_LEN - 2;
    }

    if len < 7 {
        out.push(((len as u8) << 5) + high);
        out.push(low);
    } else {
        out.push((7 << 5) + high);
        out.push((len - 7) as u8);
        out.push(low);
    }
}

fn encode_match_l2(out: &mut Vec<u8>, len: usize, distance: usize) {
    let (near, distance) = if distance < MAX_L2_DISTANCE {
        (true, distance)
    } else {
        (false, distance - MAX_L2_DISTANCE)
    };
    let high = if near { (distance >> 8) as u8 } else { 31 };

    if len < 7 {
        out.push(((len as u8) << 5) + high);
    } else {
        out.push((7 << 5) + high);
        let mut rest = len - 7;
        while rest >= 255 {
            out.push(255);
            rest -= 255;
        }
        out.push(rest as u8);
    }

    if near {
        out.push((distance & 255) as u8);
    } else {
        out.push(255);
        out.push((distance >> 8) as u8);
        out.push((distance & 255) as u8);
    }
}

/// Decompress a FastLZ block, producing at most `max_len` bytes.
///
/// The level is read from the block's tag. An empty block decodes to an
/// empty buffer.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn decompress(input: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let Some(&first) = input.first() else {
        return Ok(Vec::new());
    };
    let level = Level::from_tag(first)?;

    let mut out: Vec<u8> = Vec::with_capacity(max_len.min(input.len().saturating_mul(8)));
    let mut ip = 1usize;
    let mut ctrl = usize::from(first & 31);

    loop {
        if ctrl >= 32 {
            let mut len = (ctrl >> 5) - 1;
            let ofs = (ctrl & 31) << 8;

            if len == 6 {
                match level {
                    Level::One => len += usize::from(next(input, &mut ip)?),
                    Level::Two => loop {
                        let code = next(input, &mut ip)?;
                        len += usize::from(code);
                        if code != 255 {
                            break;
                        }
                    },
                }
            }

            let code = next(input, &mut ip)?;
            let mut back = ofs + usize::from(code);
            if level == Level::Two && code == 255 && ofs == (31 << 8) {
                let hi = usize::from(next(input, &mut ip)?);
                let lo = usize::from(next(input, &mut ip)?);
                back = ((hi << 8) | lo) + MAX_L2_DISTANCE;
            }

            let count = len + 3;
            if out.len() + count > max_len {
                return Err(CompressionError::OutputOverrun { limit: max_len });
            }
            let distance = back + 1;
            let start = out
                .len()
                .checked_sub(distance)
                .ok_or(CompressionError::InvalidReference {
                    distance,
                    produced: out.len(),
                })?;
            // Overlapping copies repeat the pattern, byte by byte.
            for k in 0..count {
                let b = out[start + k];
                out.push(b);
            }
        } else {
            let count = ctrl + 1;
            if out.len() + count > max_len {
                return Err(CompressionError::OutputOverrun { limit: max_len });
            }
            let literal = input
                .get(ip..ip + count)
                .ok_or(CompressionError::TruncatedInput { offset: input.len() })?;
            out.extend_from_slice(literal);
            ip += count;
        }

        match input.get(ip) {
            Some(&b) => {
                ctrl = usize::from(b);
                ip += 1;
            }
            None => break,
        }
    }

    Ok(out)
}

#[inline]
fn next(input: &[u8], ip: &mut usize) -> Result<u8> {
    let b = *input
        .get(*ip)
        .ok_or(CompressionError::TruncatedInput { offset: *ip })?;
    *ip += 1;
    Ok(b)
}

// Little-endian 16-bit read; bytes past the end read as zero.
#[inline]
fn read_u16(input: &[u8], pos: usize) -> u32 {
    let lo = u32::from(input.get(pos).copied().unwrap_or(0));
    let hi = u32::from(input.get(pos + 1).copied().unwrap_or(0));
    lo | (hi << 8)
}

#[inline]
fn hash(input: &[u8], pos: usize) -> usize {
    let v = read_u16(input, pos);
    let v = v ^ read_u16(input, pos + 1) ^ (v >> (16 - HASH_LOG));
    (v & HASH_MASK) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_zeros_level1_exact_block() {
        let data = [0u8; 16];
        let packed = compress_level(&data, Level::One);
        assert_eq!(packed, [1, 0, 0, 224, 2, 1, 2, 0, 0, 0]);
        assert_eq!(decompress(&packed, 16).unwrap(), data);
    }

    #[test]
    fn test_empty_round_trip() {
        assert!(compress(&[]).is_empty());
        assert!(decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_tiny_input_is_literal_run() {
        assert_eq!(compress_level(b"abc", Level::Two), [2, b'a', b'b', b'c']);
        assert_eq!(decompress(&[2, b'a', b'b', b'c'], 3).unwrap(), b"abc");
    }

    #[test]
    fn test_level2_sets_tag() {
        let data = vec![7u8; 100];
        let packed = compress_level(&data, Level::Two);
        assert_eq!(packed[0] >> 5, 1);
        assert_eq!(decompress(&packed, 100).unwrap(), data);
    }

    #[test]
    fn test_level_from_tag() {
        assert_eq!(Level::from_tag(0x00).unwrap(), Level::One);
        assert_eq!(Level::from_tag(0x20).unwrap(), Level::Two);
        assert!(matches!(
            Level::from_tag(0x40),
            Err(CompressionError::UnknownLevel(2))
        ));
    }

    #[test]
    fn test_level_from_engine_int() {
        assert_eq!(Level::try_from(1i64).unwrap(), Level::One);
        assert_eq!(Level::try_from(2i64).unwrap(), Level::Two);
        assert!(Level::try_from(3i64).is_err());
        assert!(Level::try_from(-1i64).is_err());
    }

    #[test]
    fn test_unknown_tag_rejected_without_decoding() {
        let err = decompress(&[0xE0, 1, 2, 3], 16).unwrap_err();
        assert!(matches!(err, CompressionError::UnknownLevel(7)));
    }

    #[test]
    fn test_output_limit_enforced() {
        let data = [0u8; 16];
        let packed = compress_level(&data, Level::One);
        let err = decompress(&packed, 15).unwrap_err();
        assert!(matches!(err, CompressionError::OutputOverrun { limit: 15 }));
    }

    #[test]
    fn test_truncated_literal_rejected() {
        // Literal run of 4 bytes with only 2 present.
        let err = decompress(&[3, 1, 2], 16).unwrap_err();
        assert!(matches!(err, CompressionError::TruncatedInput { .. }));
    }

    #[test]
    fn test_truncated_match_rejected() {
        // Literal "a", then a match token with its distance byte missing.
        let err = decompress(&[0, b'a', 0x20], 16).unwrap_err();
        assert!(matches!(err, CompressionError::TruncatedInput { .. }));
    }

    #[test]
    fn test_reference_before_start_rejected() {
        // Literal "a", then a 3-byte match at distance 5.
        let err = decompress(&[0, b'a', 0x20, 4], 16).unwrap_err();
        assert!(matches!(
            err,
            CompressionError::InvalidReference {
                distance: 5,
                produced: 1
            }
        ));
    }

    #[test]
    fn test_repetitive_text_shrinks() {
        let data = b"the quick brown fox jumps over the lazy dog. ".repeat(50);
        for level in [Level::One, Level::Two] {
            let packed = compress_level(&data, level);
            assert!(packed.len() < data.len() / 4);
            assert_eq!(decompress(&packed, data.len()).unwrap(), data);
        }
    }

    #[test]
    fn test_long_run_level1_splits_matches() {
        let data = vec![0xAAu8; 1000];
        let packed = compress_level(&data, Level::One);
        assert_eq!(decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_far_match_level2() {
        // A 64-byte pattern repeated after a 20000-byte gap of noise.
        let pattern: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let mut data = pattern.clone();
        let mut x = 0x1234_5678u32;
        for _ in 0..20000 {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            data.push((x >> 24) as u8);
        }
        data.extend_from_slice(&pattern);
        let packed = compress_level(&data, Level::Two);
        assert_eq!(decompress(&packed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_auto_level_selection() {
        let small = vec![1u8; 1000];
        assert_eq!(compress(&small)[0] >> 5, 0);
        let large = vec![1u8; LEVEL2_THRESHOLD];
        assert_eq!(compress(&large)[0] >> 5, 1);
    }
}
