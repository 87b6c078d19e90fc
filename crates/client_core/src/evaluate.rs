//! Lenient answer checking: every word of the true answer must show up in
//! the guess, in any order, with extra words allowed.

const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

pub fn clean_guess(guess: &str) -> String {
    guess
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Answer tokens come from splitting on single spaces, so a doubled space
/// yields an empty token, which every guess contains.
pub fn is_correct(guess: &str, answer: &str) -> bool {
    let guess = clean_guess(guess);
    answer
        .to_lowercase()
        .split(' ')
        .all(|token| guess.contains(token))
}
