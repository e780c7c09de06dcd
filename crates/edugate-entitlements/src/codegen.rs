//! Redemption code generation.
//!
//! Codes are drawn from an alphabet without look-alike characters (no `O`,
//! `0`, `I` or `1`), so they survive being read aloud or copied by hand.

use std::collections::HashSet;

use rand::Rng;

pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CODE_LENGTH: usize = 10;

pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generates `count` codes distinct from each other and from `taken`.
pub fn generate_unique_codes<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    taken: &HashSet<String>,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        let code = generate_code(rng);
        if taken.contains(&code) || !seen.insert(code.clone()) {
            continue;
        }
        codes.push(code);
    }
    codes
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
