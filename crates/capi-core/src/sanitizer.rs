//! Terminal control sequence stripping for untrusted log text.

use std::borrow::Cow;

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';
/// Single-character C1 control sequence introducer.
const CSI: char = '\u{9b}';
const ST_FINAL: char = '\\';

/// Remove CSI, OSC/DCS/PM/APC/SOS and bare escape sequences from `input`.
///
/// Plain text between sequences is copied in whole runs. Sequences cut off
/// by the end of input are dropped up to the end. When `input` contains no
/// escape introducer at all it is returned borrowed, without allocating.
///
/// ```
/// use capi_core::strip_ansi;
///
/// assert_eq!(strip_ansi("a\x1b[31mb\x1b[0mc"), "abc");
/// assert_eq!(strip_ansi("x\x1b]8;;http://a"), "x");
/// ```
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find([ESC, CSI]) else {
        return Cow::Borrowed(input);
    };

    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut next = Some(first);

    while let Some(start) = next {
        output.push_str(&input[cursor..start]);
        cursor = skip_sequence(input, start);
        next = input[cursor..].find([ESC, CSI]).map(|offset| cursor + offset);
    }

    output.push_str(&input[cursor..]);
    Cow::Owned(output)
}

/// Returns the byte index just past the sequence introduced at `start`.
fn skip_sequence(input: &str, start: usize) -> usize {
    let mut chars = input[start..].chars();

    match chars.next() {
        Some(CSI) => skip_csi(input, start + CSI.len_utf8()),
        Some(ESC) => {
            let after_esc = start + ESC.len_utf8();
            match chars.next() {
                Some('[') => skip_csi(input, after_esc + 1),
                Some(']' | 'P' | 'X' | '^' | '_') => skip_string_terminated(input, after_esc + 1),
                Some(other) => after_esc + other.len_utf8(),
                None => input.len(),
            }
        }
        Some(other) => start + other.len_utf8(),
        None => input.len(),
    }
}

/// Skip parameters up to and including a final character in 0x40-0x7E.
fn skip_csi(input: &str, start: usize) -> usize {
    input[start..]
        .char_indices()
        .find(|(_, c)| ('\u{40}'..='\u{7e}').contains(c))
        .map_or(input.len(), |(offset, c)| start + offset + c.len_utf8())
}

/// Skip a string payload terminated by BEL or ESC `\`.
fn skip_string_terminated(input: &str, start: usize) -> usize {
    let mut chars = input[start..].char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c == BEL {
            return start + offset + BEL.len_utf8();
        }
        if c == ESC && matches!(chars.peek(), Some((_, ST_FINAL))) {
            return start + offset + ESC.len_utf8() + ST_FINAL.len_utf8();
        }
    }

    input.len()
}
