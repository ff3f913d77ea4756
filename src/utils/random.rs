use rand::Rng;

pub const DIGITS: &[u8] = b"0123456789";
pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWER_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// `n` random decimal digits.
pub fn rand_numbers(n: usize) -> String {
    rand_from(DIGITS, n)
}

/// `n` random ASCII letters, either case.
pub fn rand_string_runes(n: usize) -> String {
    rand_from(LETTERS, n)
}

/// `n` random lower-case ASCII letters.
pub fn rand_lower_string_runes(n: usize) -> String {
    rand_from(LOWER_LETTERS, n)
}

fn rand_from(alphabet: &[u8], n: usize) -> String {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
