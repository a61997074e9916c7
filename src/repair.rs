/// Character confusions extractors commonly produce in numeric context,
/// with the digit each one stands for.
const CONFUSIONS: [(char, char); 5] = [
    ('O', '0'),
    ('o', '0'),
    ('l', '1'),
    ('I', '1'),
    ('S', '5'),
];

/// Repairs common extraction glitches in numeric text: letter-for-digit
/// confusions adjacent to digits, and a trailing "digits digits" pair that
/// lost its decimal point ("100 00" becomes "100.00").
///
/// A letter is only replaced when the context is numeric: preceded by a
/// digit, or followed by a digit without a preceding letter. Prose keeps
/// its letters. Repairs cascade left to right, so "1OO" resolves fully.
pub fn repair_numeric_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut chars: Vec<char> = text.chars().collect();

    for i in 0..chars.len() {
        let Some(&(_, digit)) = CONFUSIONS.iter().find(|(letter, _)| *letter == chars[i]) else {
            continue;
        };

        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        let prev_is_digit = prev.is_some_and(|c| c.is_ascii_digit());
        let prev_is_letter = prev.is_some_and(|c| c.is_ascii_alphabetic());
        let next_is_digit = next.is_some_and(|c| c.is_ascii_digit());

        if prev_is_digit || (next_is_digit && !prev_is_letter) {
            chars[i] = digit;
        }
    }

    rejoin_trailing_decimal(&mut chars);
    chars.into_iter().collect()
}

/// "digits, whitespace, exactly two digits, end of string" reads as a
/// decimal whose point was dropped; the whitespace becomes the point.
fn rejoin_trailing_decimal(chars: &mut Vec<char>) {
    let n = chars.len();
    if n < 4 {
        return;
    }

    if !(chars[n - 1].is_ascii_digit() && chars[n - 2].is_ascii_digit()) {
        return;
    }

    let mut i = n - 2;
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    // Needs a real whitespace gap and a digit on its left.
    if i == n - 2 || i == 0 || !chars[i - 1].is_ascii_digit() {
        return;
    }

    chars.splice(i..n - 2, ['.']);
}
