//! Char-for-char text mappings used by record-wide text operations.
//!
//! Every mapping returns exactly one char per input char, so a formatted
//! field keeps its length.

/// Upper case, keeping the original char when the mapping is not 1:1.
pub fn to_upper(c: char) -> char {
    single(c.to_uppercase()).unwrap_or(c)
}

/// Lower case, keeping the original char when the mapping is not 1:1.
pub fn to_lower(c: char) -> char {
    single(c.to_lowercase()).unwrap_or(c)
}

/// Non-ASCII chars become `?`.
pub fn to_ascii(c: char) -> char {
    if c.is_ascii() { c } else { '?' }
}

/// Latin-1 and Latin Extended-A letters to their unaccented base letter.
pub fn remove_accent(c: char) -> char {
    match c {
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ď' | 'Đ' | 'Ð' => 'D',
        'ď' | 'đ' | 'ð' => 'd',
        'È'..='Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĥ' | 'Ħ' => 'H',
        'ĥ' | 'ħ' => 'h',
        'Ì'..='Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'Ĵ' => 'J',
        'ĵ' => 'j',
        'Ķ' => 'K',
        'ķ' | 'ĸ' => 'k',
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => 'L',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' | 'Ŋ' => 'N',
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŉ' | 'ŋ' => 'n',
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => 's',
        'Ţ' | 'Ť' | 'Ŧ' => 'T',
        'ţ' | 'ť' | 'ŧ' => 't',
        'Ù'..='Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ŵ' => 'W',
        'ŵ' => 'w',
        'Ý' | 'Ŷ' | 'Ÿ' => 'Y',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}

/// Accents removed, then ASCII coerced, then upper-cased.
pub fn normalize(c: char) -> char {
    to_upper(to_ascii(remove_accent(c)))
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(s: &str, f: fn(char) -> char) -> String {
        s.chars().map(f).collect()
    }

    #[test]
    fn test_case_mapping_keeps_length() {
        assert_eq!(map("Città ß", to_upper), "CITTÀ ß");
        assert_eq!(map("ÀBC", to_lower), "àbc");
    }

    #[test]
    fn test_remove_accents() {
        assert_eq!(map("àèéìòù ÇŁŽ", remove_accent), "aeeiou CLZ");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(map("naïve €", to_ascii), "na?ve ?");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(map("perché €", normalize), "PERCHE ?");
    }
}
