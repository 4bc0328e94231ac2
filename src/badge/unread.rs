//! Unread count extraction from the page title.
//!
//! The page announces unread messages by prefixing its title with a
//! parenthesized count, e.g. `(5) WhatsApp`.

/// Counts above this are shown as [`OVERFLOW_LABEL`] on the rendered badge.
pub const DISPLAY_CEILING: u32 = 99;

pub const OVERFLOW_LABEL: &str = "99+";

/// Number of unread messages announced by a title.
///
/// Zero means "no badge", whether the title said `(0)` or nothing at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnreadCount(u32);

impl UnreadCount {
    pub const ZERO: UnreadCount = UnreadCount(0);

    pub fn new(count: u32) -> Self {
        Self(count)
    }

    /// Parse the leading `(<digits>)` of a title. Anything else yields zero.
    pub fn from_title(title: &str) -> Self {
        let Some(rest) = title.strip_prefix('(') else {
            return Self::ZERO;
        };
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 || rest.as_bytes().get(digits_len) != Some(&b')') {
            return Self::ZERO;
        }

        // Overflowing digit runs still mean "a lot".
        let count = rest[..digits_len]
            .bytes()
            .fold(0u32, |acc, d| {
                acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
            });
        Self(count)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Text drawn inside the rendered badge.
    pub fn display_label(self) -> String {
        if self.0 > DISPLAY_CEILING {
            OVERFLOW_LABEL.to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl std::fmt::Display for UnreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_leading_count() {
        assert_eq!(UnreadCount::from_title("(5) WhatsApp").get(), 5);
        assert_eq!(UnreadCount::from_title("(42)WhatsApp").get(), 42);
        assert_eq!(UnreadCount::from_title("(7)").get(), 7);
        assert_eq!(UnreadCount::from_title("(007) Bond").get(), 7);
    }

    #[test]
    fn test_no_count_is_zero() {
        assert!(UnreadCount::from_title("WhatsApp").is_zero());
        assert!(UnreadCount::from_title("").is_zero());
        assert!(UnreadCount::from_title("(0) WhatsApp").is_zero());
        assert_eq!(
            UnreadCount::from_title("(0) Label"),
            UnreadCount::from_title("Label")
        );
    }

    #[test]
    fn test_malformed_prefix_is_zero() {
        for title in [
            " (5) WhatsApp",
            "WhatsApp (5)",
            "() WhatsApp",
            "(abc) WhatsApp",
            "(5a) WhatsApp",
            "(-5) WhatsApp",
            "(5 WhatsApp",
            "(+5) WhatsApp",
            "(５) WhatsApp",
        ] {
            assert!(UnreadCount::from_title(title).is_zero(), "{title:?}");
        }
    }

    #[test]
    fn test_huge_count_saturates() {
        let count = UnreadCount::from_title("(99999999999999999999) WhatsApp");
        assert_eq!(count.get(), u32::MAX);
        assert_eq!(count.display_label(), "99+");
    }

    #[test]
    fn test_display_label_caps_at_ceiling() {
        assert_eq!(UnreadCount::new(1).display_label(), "1");
        assert_eq!(UnreadCount::new(99).display_label(), "99");
        assert_eq!(UnreadCount::new(100).display_label(), "99+");

        let count = UnreadCount::from_title("(1234) Label");
        assert_eq!(count.get(), 1234);
        assert_eq!(count.display_label(), "99+");
        assert_eq!(count.to_string(), "1234");
    }
}
