//! LRC checksum
//!
//! Responses end their payload with a longitudinal redundancy check: the XOR
//! of every byte in a range, rendered as two uppercase hex characters.
//! Commands carry no checksum.

use tracing::trace;

/// XOR of `data[start..end]`
///
/// A range that falls outside `data` contributes nothing, so the result is 0.
///
/// # Examples
///
/// ```
/// use hfscale_core::checksum;
///
/// assert_eq!(checksum::calculate(b"\x02AB", 1, 3), b'A' ^ b'B');
/// ```
pub fn calculate(data: &[u8], start: usize, end: usize) -> u8 {
    data.get(start..end)
        .unwrap_or_default()
        .iter()
        .fold(0, |lrc, byte| lrc ^ byte)
}

/// Render a checksum the way the scale transmits it
pub fn to_hex(lrc: u8) -> String {
    format!("{lrc:02X}")
}

/// Checksum of `data[start..end]` as two uppercase hex characters
pub fn compute(data: &[u8], start: usize, end: usize) -> String {
    let lrc = to_hex(calculate(data, start, end));

    trace!(start, end, lrc = %lrc, "Calculated LRC");

    lrc
}

/// Compare the checksum of `data[start..end]` against the declared one
pub fn verify(data: &[u8], start: usize, end: usize, declared: &str) -> bool {
    compute(data, start, end) == declared
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lrc_known_value() {
        // '0' ^ '0' ^ 'F' ^ 'F' cancels, leaving 'r'
        let data = b"\x0200FFr";
        assert_eq!(calculate(data, 1, 6), b'r');
        assert_eq!(compute(data, 1, 6), "72");
    }

    #[test]
    fn test_lrc_uppercase_padded() {
        assert_eq!(to_hex(0x0A), "0A");
        assert_eq!(to_hex(0xFE), "FE");
    }

    #[test]
    fn test_lrc_empty_range() {
        assert_eq!(calculate(b"abc", 2, 2), 0);
        assert_eq!(compute(b"", 0, 0), "00");
    }

    #[test]
    fn test_lrc_out_of_bounds_range() {
        assert_eq!(calculate(b"abc", 1, 10), 0);
        assert_eq!(calculate(b"abc", 3, 1), 0);
    }

    #[test]
    fn test_verify() {
        let data = b"\x0200FFr";
        assert!(verify(data, 1, 6, "72"));
        assert!(!verify(data, 1, 6, "73"));
        assert!(!verify(data, 1, 6, "72 "));
    }

    proptest! {
        #[test]
        fn prop_lrc_self_inverse(data in proptest::collection::vec(any::<u8>(), 0..64), split in 0usize..64) {
            let start = split.min(data.len());
            let lrc = calculate(&data, start, data.len());

            let mut extended = data.clone();
            extended.push(lrc);

            prop_assert_eq!(calculate(&extended, start, extended.len()), 0);
        }

        #[test]
        fn prop_hex_round_trip(byte in any::<u8>()) {
            let rendered = to_hex(byte);
            prop_assert_eq!(rendered.len(), 2);
            prop_assert_eq!(u8::from_str_radix(&rendered, 16).unwrap(), byte);
        }
    }
}
