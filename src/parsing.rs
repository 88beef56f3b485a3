//! Zero-allocation parsing utilities for tab-separated catalog lines.

use memchr::memchr;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty or contains non-digit characters.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Strip a trailing `\n` or `\r\n`.
#[inline(always)]
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split the first `N` tab-separated fields of a line using memchr.
///
/// The last field runs up to the next tab (extra columns are ignored) or the
/// end of the line. Returns the number of fields found when the line is short.
#[inline]
pub fn split_fields<const N: usize>(line: &[u8]) -> Result<[&[u8]; N], usize> {
    let mut fields: [&[u8]; N] = [&[]; N];
    let mut rest = line;
    for (i, field) in fields.iter_mut().enumerate() {
        match memchr(b'\t', rest) {
            Some(tab) => {
                *field = &rest[..tab];
                rest = &rest[tab + 1..];
            }
            None => {
                if i + 1 < N {
                    return Err(i + 1);
                }
                *field = rest;
                rest = &[];
            }
        }
    }
    Ok(fields)
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_fast() {
        assert_eq!(parse_u64_fast(b"12345"), Some(12345));
        assert_eq!(parse_u64_fast(b"0"), Some(0));
        assert_eq!(parse_u64_fast(b""), None);
        assert_eq!(parse_u64_fast(b"abc"), None);
        assert_eq!(parse_u64_fast(b"-5"), None);
        assert_eq!(parse_u64_fast(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_u64_fast(b"18446744073709551616"), None);
    }

    #[test]
    fn test_split_fields() {
        let fields = split_fields::<5>(b"chr1\t100\t200\tTP53\tpromoter").unwrap();
        assert_eq!(fields[0], b"chr1");
        assert_eq!(fields[3], b"TP53");
        assert_eq!(fields[4], b"promoter");

        // Extra columns are ignored
        let fields = split_fields::<3>(b"chr1\t100\t200\textra").unwrap();
        assert_eq!(fields[2], b"200");

        assert_eq!(split_fields::<5>(b"chr1\t100\t200"), Err(3));
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"chr1\t1\n"), b"chr1\t1");
        assert_eq!(trim_line_end(b"chr1\t1\r\n"), b"chr1\t1");
        assert_eq!(trim_line_end(b"chr1\t1"), b"chr1\t1");
    }

    #[test]
    fn test_should_skip_line() {
        assert!(should_skip_line(b""));
        assert!(should_skip_line(b"#comment"));
        assert!(should_skip_line(b"track name=foo"));
        assert!(should_skip_line(b"browser position chr1:1-100"));
        assert!(!should_skip_line(b"chr1\t100\t200"));
    }
}
