//! Fractional ordering keys.
//!
//! Page trees and page contents order siblings by an explicit string key
//! rather than by array position. [`key_between`] produces a key that sorts
//! strictly between its two neighbors, so a caller can move one item without
//! rewriting its siblings.
//!
//! Keys are non-empty strings over a base-62 alphabet whose byte order
//! matches digit order, interpreted as a fraction in `(0, 1)`. A key never
//! ends with the smallest digit, which keeps the text form canonical.

use crate::Error;

const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: u8 = DIGITS.len() as u8;

/// Generates a key strictly between `prev` and `next`.
///
/// `None` stands for the corresponding end of the key space: a key before
/// everything (`prev = None`) or after everything (`next = None`). Fails
/// with [`Error::InvalidOrderingKey`] on malformed keys or when
/// `prev >= next`.
pub fn key_between(prev: Option<&str>, next: Option<&str>) -> crate::Result<String> {
    let prev_digits = prev.map(to_digits).transpose()?;
    let next_digits = next.map(to_digits).transpose()?;

    if let (Some(p), Some(n)) = (&prev_digits, &next_digits)
        && p >= n
    {
        return Err(Error::InvalidOrderingKey(format!(
            "prev key {:?} is not below next key {:?}",
            prev.unwrap_or_default(),
            next.unwrap_or_default(),
        )));
    }

    let digits = midpoint(
        prev_digits.as_deref().unwrap_or(&[]),
        next_digits.as_deref(),
    );
    Ok(digits.iter().map(|&d| DIGITS[d as usize] as char).collect())
}

/// Returns digits `m` with `a < m < b`, where an absent `b` means the upper
/// end of the key space. `a` may be empty (the lower end); a present `b` is
/// never empty.
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Vec<u8> {
    let head_a = a.first().copied().unwrap_or(0);
    let head_b = b.map_or(BASE, |b| b[0]);
    let rest_a = if a.is_empty() { &[][..] } else { &a[1..] };

    if head_b > head_a + 1 {
        // Room for a whole digit strictly in between.
        return vec![(head_a + head_b) / 2];
    }

    if head_b == head_a {
        // Shared leading digit; recurse on the remainders. The remainder of
        // `b` stays non-empty because `a < b` rules out `b` being a prefix.
        let mut out = vec![head_a];
        out.extend(midpoint(rest_a, b.map(|b| &b[1..])));
        return out;
    }

    // Adjacent leading digits: stay under `b` by keeping `a`'s head and
    // extending within (rest of a, upper end).
    let mut out = vec![head_a];
    out.extend(midpoint(rest_a, None));
    out
}

fn to_digits(key: &str) -> crate::Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::InvalidOrderingKey("key is empty".to_owned()));
    }
    if key.as_bytes().last() == Some(&DIGITS[0]) {
        return Err(Error::InvalidOrderingKey(format!(
            "key {key:?} ends with the smallest digit"
        )));
    }
    key.bytes()
        .map(|byte| {
            DIGITS
                .iter()
                .position(|&d| d == byte)
                .map(|idx| idx as u8)
                .ok_or_else(|| {
                    Error::InvalidOrderingKey(format!("key {key:?} holds a non-digit byte"))
                })
        })
        .collect()
}
