//! Initials-based avatars for registrants.
//!
//! The colour is derived from the full name, so the same person always gets
//! the same avatar across listings.

/// Background palette, indexed by the name hash.
pub const AVATAR_PALETTE: [&str; 10] = [
    "FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F", "BB8FCE", "85C1E2", "F8B88B",
    "52C9B8",
];

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/initials/svg";

/// Returns up to two uppercase initials, one per word.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Picks the palette colour for `name` from the sum of its UTF-16 code units.
#[must_use]
pub fn avatar_color(name: &str) -> &'static str {
    let hash = name
        .encode_utf16()
        .fold(0_usize, |acc, unit| acc.wrapping_add(usize::from(unit)));
    AVATAR_PALETTE
        .get(hash % AVATAR_PALETTE.len())
        .copied()
        .unwrap_or("FF6B6B")
}

/// Builds the avatar image URL for `name`.
#[must_use]
pub fn avatar_url(name: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?seed={}&backgroundColor={}&scale=80&radius=100",
        initials(name),
        avatar_color(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("ada lovelace byron"), "AL");
        assert_eq!(initials("Grace"), "G");
        assert_eq!(initials("  alan   turing "), "AT");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn color_is_stable_per_name() {
        // 'A' (65) + 'b' (98) = 163 -> 163 % 10 = 3
        assert_eq!(avatar_color("Ab"), "FFA07A");
        assert_eq!(avatar_color("Ab"), avatar_color("Ab"));
        assert_eq!(avatar_color(""), "FF6B6B");
    }

    #[test]
    fn color_sums_surrogate_pairs() {
        // U+1F600 is 0xD83D + 0xDE00 = 112189 in UTF-16 -> 9; its code point would give 2
        assert_eq!(avatar_color("\u{1F600}"), "52C9B8");
        // 'é' is a single unit (233) -> 3
        assert_eq!(avatar_color("\u{e9}"), "FFA07A");
    }

    #[test]
    fn url_embeds_seed_and_color() {
        let url = avatar_url("Ab");
        assert!(url.starts_with(AVATAR_BASE_URL));
        assert!(url.contains("seed=A&"));
        assert!(url.contains("backgroundColor=FFA07A"));
    }
}
