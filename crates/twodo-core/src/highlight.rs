//! Per-character classes for short codes, a hint for renderers that colour
//! digits, vowels and consonants differently.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Digit,
    Vowel,
    Consonant,
}

pub fn classify(c: char) -> CharClass {
    match c.to_ascii_lowercase() {
        '0'..='9' => CharClass::Digit,
        'a' | 'e' | 'i' | 'o' | 'u' => CharClass::Vowel,
        _ => CharClass::Consonant,
    }
}

pub fn classify_code(code: &str) -> Vec<(char, CharClass)> {
    code.chars().map(|c| (c, classify(c))).collect()
}
