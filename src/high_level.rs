//! User data to high level encoding conversion: the numeric, text and byte
//! compactors and the loop driving them over the segmenter's runs.

use log::{debug, trace};

use crate::config::EncodingControl;
use crate::segmenter::{next_run, RunKind};
use crate::tables::{NO_CODE, POW900, TEXT_CODES};
use crate::Pdf417Error;

use awint_core::{InlAwi, Bits};
type U160 = InlAwi<160, { Bits::unstable_raw_digits(160) }>;

/// Codeword used to latch to text mode
pub const M_LATCH_TEXT: u16 = 900;
/// Codeword used to latch to byte mode (if length is multiple of 6 use
/// M_LATCH_BYTE_M6).
pub const M_LATCH_BYTE: u16 = 901;
/// Codeword used to latch to numeric mode
pub const M_LATCH_NUMERIC: u16 = 902;

// 903 to 912: reserved for future use

/// Codeword used to switch to byte mode for next codedword (usable only if
/// the current mode is text).
pub const M_SHIFT_BYTE: u16 = 913;

// 914 to 920: reserved for future use
// 921: reader initialization
// 922 to 923: Macro PDF417

/// Codeword used to latch to byte mode when the byte count is a multiple of 6
pub const M_LATCH_BYTE_M6: u16 = 924;

// 925 to 927: GLI, see config.rs
// 928: Macro PDF417 control block

/// Codeword used as padding at the end of the data section
pub const CW_PADDING: u16 = M_LATCH_TEXT;

/// Digits per numeric group (a leading 1 is added before conversion).
pub const MAX_NUMERIC_CHUNK: usize = 44;

// text sub-mode switching codes
const LL: u8 = 27;
const ML: u8 = 28;
const PS: u8 = 29;
const PL: u8 = 25;
const AL: u8 = 28;
// alpha latch from punctuation
const PAL: u8 = 29;
const PAD: u8 = 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Byte,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubMode {
    Upper = 0,
    Lower = 1,
    Mixed = 2,
    Punctuation = 3,
}

impl SubMode {
    /// Code of `b` in this sub-mode, if any.
    #[inline]
    pub fn code(self, b: u8) -> Option<u8> {
        let code = *TEXT_CODES[self as usize].get(b as usize)?;
        (code != NO_CODE).then_some(code)
    }

    /// Sub-modes to try, in order, when a byte is missing from this one.
    const fn fallback(self) -> [SubMode; 3] {
        use SubMode::*;
        match self {
            Upper => [Lower, Mixed, Punctuation],
            Lower => [Mixed, Upper, Punctuation],
            Mixed => [Lower, Upper, Punctuation],
            Punctuation => [Upper, Lower, Mixed],
        }
    }

    /// Codes latching from this sub-mode to `target`.
    const fn latch_to(self, target: SubMode) -> &'static [u8] {
        use SubMode::*;
        match (self, target) {
            (Upper, Lower) | (Mixed, Lower) => &[LL],
            (Upper, Mixed) | (Lower, Mixed) => &[ML],
            (Lower, Upper) => &[ML, AL],
            (Mixed, Upper) => &[AL],
            (Upper, Punctuation) | (Lower, Punctuation) => &[ML, PL],
            (Mixed, Punctuation) => &[PL],
            (Punctuation, Upper) => &[PAL],
            (Punctuation, Lower) => &[PAL, LL],
            (Punctuation, Mixed) => &[PAL, ML],
            _ => &[],
        }
    }
}

/// Everything the compactors carry from one run to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionState {
    pub mode: Mode,
    pub sub_mode: SubMode,
    /// Index of the next input byte to consume
    pub cursor: usize,
}

impl Default for CompactionState {
    fn default() -> Self {
        // starting outside text mode makes the first text run emit its latch
        Self { mode: Mode::Byte, sub_mode: SubMode::Upper, cursor: 0 }
    }
}

/// Packs text codes two by two into codewords.
struct TextPacker<'a> {
    out: &'a mut Vec<u16>,
    pending: Option<u8>,
}

impl<'a> TextPacker<'a> {
    fn new(out: &'a mut Vec<u16>) -> Self {
        Self { out, pending: None }
    }

    fn push(&mut self, code: u8) {
        match self.pending.take() {
            Some(high) => self.out.push(high as u16 * 30 + code as u16),
            None => self.pending = Some(code),
        }
    }

    fn finish(self) {
        if let Some(high) = self.pending {
            self.out.push(high as u16 * 30 + PAD as u16);
        }
    }
}

/// Returns 3 when the next three bytes of `rest` all have a punctuation
/// code, 0 otherwise (including when fewer than three bytes are left).
fn punctuation_ahead(rest: &[u8]) -> usize {
    match rest.get(..3) {
        Some(next) if next.iter().all(|&b| SubMode::Punctuation.code(b).is_some()) => 3,
        _ => 0,
    }
}

/// Text compaction of the `len` bytes at the cursor.
pub fn compact_text(state: &mut CompactionState, data: &[u8], len: usize, out: &mut Vec<u16>) -> Result<(), Pdf417Error> {
    if state.mode != Mode::Text {
        out.push(M_LATCH_TEXT);
        state.mode = Mode::Text;
        state.sub_mode = SubMode::Upper;
    }

    let run = &data[state.cursor..state.cursor + len];
    let mut packer = TextPacker::new(out);

    for (i, &b) in run.iter().enumerate() {
        if let Some(code) = state.sub_mode.code(b) {
            packer.push(code);
            continue;
        }

        let (target, code) = state.sub_mode.fallback()
            .into_iter()
            .find_map(|m| m.code(b).map(|code| (m, code)))
            .ok_or(Pdf417Error::TextTableGap { byte: b })?;

        if target == SubMode::Punctuation && punctuation_ahead(&run[i..]) < 3 {
            packer.push(PS);
        } else {
            for &latch in state.sub_mode.latch_to(target) {
                packer.push(latch);
            }
            state.sub_mode = target;
        }
        packer.push(code);
    }

    packer.finish();
    state.cursor += len;
    Ok(())
}

/// Divides `value` in place by a single digit `base`, returning the
/// remainder.
fn divmod_small(value: &mut U160, base: u16) -> Option<u16> {
    value.digit_udivide_inplace_(base.into()).map(|r| r as u16)
}

fn compact_numeric_chunk(digits: &[u8], out: &mut Vec<u16>) -> Result<(), Pdf417Error> {
    debug_assert!(digits.len() <= MAX_NUMERIC_CHUNK);
    let error = Pdf417Error::NumericConversion { digits: digits.len() };

    // A leading 1 keeps the leading zeros of the group.
    let mut text = [b'1'; MAX_NUMERIC_CHUNK + 1];
    text[1..=digits.len()].copy_from_slice(digits);

    let mut value = U160::zero();
    let mut pad0 = U160::zero();
    let mut pad1 = U160::zero();
    value.bytes_radix_(None, &text[..=digits.len()], 10, &mut pad0, &mut pad1)
        .map_err(|_| error.clone())?;

    let start = out.len();
    while !value.is_zero() {
        out.push(divmod_small(&mut value, 900).ok_or_else(|| error.clone())?);
    }
    out[start..].reverse();
    Ok(())
}

/// Numeric compaction of the `len` digits at the cursor, 44 digits at a time.
pub fn compact_numeric(state: &mut CompactionState, data: &[u8], len: usize, out: &mut Vec<u16>) -> Result<(), Pdf417Error> {
    if state.mode != Mode::Numeric {
        out.push(M_LATCH_NUMERIC);
        state.mode = Mode::Numeric;
    }

    let run = &data[state.cursor..state.cursor + len];
    for chunk in run.chunks(MAX_NUMERIC_CHUNK) {
        compact_numeric_chunk(chunk, out)?;
    }

    state.cursor += len;
    Ok(())
}

/// Byte compaction of the `len` bytes at the cursor. A lone byte inside text
/// is shifted instead of latched.
pub fn compact_bytes(state: &mut CompactionState, data: &[u8], len: usize, out: &mut Vec<u16>) {
    let bytes = &data[state.cursor..state.cursor + len];

    if bytes.len() == 1 && state.mode == Mode::Text {
        out.extend([M_SHIFT_BYTE, bytes[0] as u16]);
    } else {
        out.push(if bytes.len() % 6 == 0 { M_LATCH_BYTE_M6 } else { M_LATCH_BYTE });
        state.mode = Mode::Byte;

        let mut groups = bytes.chunks_exact(6);
        for group in &mut groups {
            // pack six bytes, unpack five base 900 digits
            let mut s = group.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
            for &p in POW900[..5].iter().rev() {
                out.push((s / p) as u16);
                s %= p;
            }
        }

        // remaining
        out.extend(groups.remainder().iter().map(|&b| b as u16));
    }

    state.cursor += len;
}

/// Compacts the whole input, appending the codewords to `out`.
pub fn compact(data: &[u8], control: EncodingControl, out: &mut Vec<u16>) -> Result<CompactionState, Pdf417Error> {
    let mut state = CompactionState::default();

    while state.cursor < data.len() {
        let run = next_run(&data[state.cursor..], control);
        let before = out.len();
        debug!("{:?} run of {} bytes at {}", run.kind, run.len, state.cursor);

        match run.kind {
            RunKind::Numeric => compact_numeric(&mut state, data, run.len, out)?,
            RunKind::Text => compact_text(&mut state, data, run.len, out)?,
            RunKind::Byte => compact_bytes(&mut state, data, run.len, out),
        }
        trace!("run produced {} codewords", out.len() - before);
    }

    Ok(state)
}
