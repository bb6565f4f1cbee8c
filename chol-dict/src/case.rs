//! Case helpers shared by the orthography engine and the typesetter.
use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

#[inline(always)]
pub fn lower_case(s: &str) -> String {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<String>()
}

#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

/// Uppercases the first character and lowercases everything after it.
#[inline(always)]
pub fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &lower_case(c.as_str()),
    }
}

/// True when the first character of `s` is an uppercase letter. Empty
/// input has no first character and is never "first caps".
#[inline(always)]
pub fn is_first_upper(s: &str) -> bool {
    s.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// True when `word` has at least one letter and none of its cased
/// characters are lowercase: `"CH"` and `"A1"` are all caps, `"Ch'"` and
/// `"123"` are not.
pub fn is_all_caps(word: &str) -> bool {
    let mut has_cased = false;

    for ch in word.chars() {
        match GeneralCategory::of(ch) {
            GeneralCategory::LowercaseLetter => return false,
            GeneralCategory::UppercaseLetter => has_cased = true,
            _ => {}
        }
    }

    has_cased
}
