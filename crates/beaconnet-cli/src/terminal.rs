//! Terminal capability detection and the color palette used by the tables.

/// ANSI escape codes used by the CLI.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Vessel and body names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Headers and secondary figures.
    pub const GRAY: &str = "\x1b[90m";
    /// Fuel figures.
    pub const CYAN: &str = "\x1b[36m";
    /// Ready destinations and active beacons.
    pub const GREEN: &str = "\x1b[32m";
    /// Destinations the origin cannot pay for.
    pub const YELLOW: &str = "\x1b[33m";
    /// Blocked paths, offline beacons and losses.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes; every field is empty when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
            red: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colors should be emitted.
///
/// Honors `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Whether the locale advertises UTF-8 (`LANG` or `LC_ALL`).
#[must_use]
pub fn supports_unicode() -> bool {
    ["LANG", "LC_ALL"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Marker printed in front of a beacon state or destination status.
#[must_use]
pub fn status_marker(ok: bool) -> &'static str {
    match (supports_unicode(), ok) {
        (true, true) => "●",
        (true, false) => "○",
        (false, true) => "*",
        (false, false) => "-",
    }
}

/// Format a number with thousand separators (commas).
///
/// # Examples
///
/// ```
/// # use beaconnet_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1000), "1,000");
/// assert_eq!(format_with_separators(6477592), "6,477,592");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
