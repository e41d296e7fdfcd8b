//! Encoding of the value payload carried by literal and column-reference expressions.
//!
//! Signed integers and floats use the memcomparable encodings (big-endian, with the sign bit
//! flipped so that byte order matches value order), unsigned integers are plain big-endian, and
//! decimals are a `[precision, frac]` header followed by the MySQL binary decimal format.

use crate::expressions::scalars::{DecimalData, MAX_DECIMAL_PRECISION};
use crate::utils::require;
use crate::{Error, FilterResult};

const SIGN_MASK: u64 = 0x8000_0000_0000_0000;

const DIGITS_PER_WORD: usize = 9;
const WORD_SIZE: usize = 4;
const WORD_BASE: i128 = 1_000_000_000;
/// Number of bytes needed to store a partial word of `n` decimal digits.
const DIG_TO_BYTES: [usize; 10] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 4];

fn read_u64(buf: &[u8], what: &str) -> FilterResult<u64> {
    let bytes: [u8; 8] = buf.try_into().map_err(|_| {
        Error::invalid_payload(format!("{what} payload must be 8 bytes, got {}", buf.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

pub fn encode_int64(value: i64) -> Vec<u8> {
    ((value as u64) ^ SIGN_MASK).to_be_bytes().to_vec()
}

pub fn decode_int64(buf: &[u8]) -> FilterResult<i64> {
    Ok((read_u64(buf, "int64")? ^ SIGN_MASK) as i64)
}

pub fn encode_uint64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

pub fn decode_uint64(buf: &[u8]) -> FilterResult<u64> {
    read_u64(buf, "uint64")
}

pub fn encode_float64(value: f64) -> Vec<u8> {
    let bits = value.to_bits();
    let bits = if value >= 0.0 { bits | SIGN_MASK } else { !bits };
    bits.to_be_bytes().to_vec()
}

pub fn decode_float64(buf: &[u8]) -> FilterResult<f64> {
    let bits = read_u64(buf, "float64")?;
    let bits = if bits & SIGN_MASK != 0 {
        bits & !SIGN_MASK
    } else {
        !bits
    };
    Ok(f64::from_bits(bits))
}

/// Layout of a binary decimal with the given precision and number of fractional digits.
struct DecimalLayout {
    leading_digits: usize,
    int_words: usize,
    frac_words: usize,
    trailing_digits: usize,
}

impl DecimalLayout {
    fn try_new(precision: u8, frac: u8) -> FilterResult<Self> {
        require!(
            (1..=MAX_DECIMAL_PRECISION).contains(&precision) && frac <= precision,
            Error::invalid_payload(format!(
                "unsupported decimal precision/frac: ({precision}, {frac})"
            ))
        );
        Ok(Self::new(precision, frac))
    }

    /// `frac` must not exceed `precision`.
    fn new(precision: u8, frac: u8) -> Self {
        let int_digits = (precision - frac) as usize;
        let frac = frac as usize;
        Self {
            leading_digits: int_digits % DIGITS_PER_WORD,
            int_words: int_digits / DIGITS_PER_WORD,
            frac_words: frac / DIGITS_PER_WORD,
            trailing_digits: frac % DIGITS_PER_WORD,
        }
    }

    /// (digits, bytes) of each stored word, most significant first.
    fn words(&self) -> impl Iterator<Item = (usize, usize)> {
        let full = (DIGITS_PER_WORD, WORD_SIZE);
        let full_words = self.int_words + self.frac_words;
        std::iter::once((self.leading_digits, DIG_TO_BYTES[self.leading_digits]))
            .chain(std::iter::repeat(full).take(full_words))
            .chain(std::iter::once((self.trailing_digits, DIG_TO_BYTES[self.trailing_digits])))
            .filter(|(digits, _)| *digits > 0)
    }

    fn bin_size(&self) -> usize {
        self.words().map(|(_, bytes)| bytes).sum()
    }
}

pub fn encode_decimal(value: &DecimalData) -> Vec<u8> {
    let (precision, frac) = (value.precision(), value.scale());
    let mut buf = vec![precision, frac];
    // DecimalData guarantees scale <= precision <= MAX_DECIMAL_PRECISION
    let layout = DecimalLayout::new(precision, frac);

    // Split the absolute value into its stored words, least significant first.
    let mut abs = value.unscaled().unsigned_abs();
    let mut words = Vec::new();
    if layout.trailing_digits > 0 {
        let base = 10u128.pow(layout.trailing_digits as u32);
        words.push(abs % base);
        abs /= base;
    }
    for _ in 0..layout.int_words + layout.frac_words {
        words.push(abs % WORD_BASE as u128);
        abs /= WORD_BASE as u128;
    }
    if layout.leading_digits > 0 {
        words.push(abs);
    }

    let mask: u8 = if value.unscaled() < 0 { 0xFF } else { 0x00 };
    let start = buf.len();
    for ((_, bytes), word) in layout.words().zip(words.iter().rev()) {
        let be = (*word as u32).to_be_bytes();
        buf.extend(be[WORD_SIZE - bytes..].iter().map(|b| b ^ mask));
    }
    if let Some(first) = buf.get_mut(start) {
        *first ^= 0x80;
    }
    buf
}

pub fn decode_decimal(buf: &[u8]) -> FilterResult<DecimalData> {
    let [precision, frac, bin @ ..] = buf else {
        return Err(Error::invalid_payload("decimal payload is missing its header"));
    };
    let layout = DecimalLayout::try_new(*precision, *frac)?;
    require!(
        bin.len() == layout.bin_size(),
        Error::invalid_payload(format!(
            "decimal({precision}, {frac}) payload must be {} bytes, got {}",
            layout.bin_size(),
            bin.len()
        ))
    );

    let negative = bin.first().is_some_and(|b| b & 0x80 == 0);
    let mask: u8 = if negative { 0xFF } else { 0x00 };
    let mut unscaled: i128 = 0;
    let mut offset = 0;
    for (digits, bytes) in layout.words() {
        let word = bin[offset..offset + bytes]
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| {
                let b = if offset + i == 0 { b ^ 0x80 } else { *b };
                (acc << 8) | (b ^ mask) as u32
            });
        offset += bytes;

        let base = 10i128.pow(digits as u32);
        require!(
            (word as i128) < base,
            Error::invalid_payload(format!("corrupted decimal word {word}"))
        );
        unscaled = unscaled
            .checked_mul(base)
            .and_then(|v| v.checked_add(word as i128))
            .ok_or_else(|| Error::invalid_payload("decimal overflow"))?;
    }
    if negative {
        unscaled = -unscaled;
    }
    DecimalData::try_new(unscaled, *precision, *frac)
}
