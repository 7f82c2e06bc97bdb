use chrono::NaiveDate;

/// Case-insensitive substring test. `needle_lower` must already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Calendar layout used to display birth dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `1/1/2000` (vi-VN)
    #[default]
    DayMonthYear,
    /// `01/01/2000` (en-GB, fr-FR, ...)
    PaddedDayMonthYear,
    /// `01.01.2000` (de-DE, ru-RU, ...)
    DottedDayMonthYear,
    /// `1/1/2000` month first (en-US)
    MonthDayYear,
    /// `2000/01/01` (ja-JP, zh-CN, ko-KR)
    YearMonthDay,
    /// `2000-01-01`
    Iso,
}

impl DateStyle {
    /// Resolve a locale tag such as `vi-VN`, `en_US` or `de`.
    /// Returns `None` for locales without a known layout.
    pub fn from_locale(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase().replace('_', "-");
        let style = match tag.as_str() {
            "iso" => DateStyle::Iso,
            "en-us" | "en" => DateStyle::MonthDayYear,
            _ => match tag.split('-').next().unwrap_or("") {
                "vi" => DateStyle::DayMonthYear,
                "en" | "fr" | "es" | "it" | "pt" | "nl" => DateStyle::PaddedDayMonthYear,
                "de" | "ru" | "pl" | "cs" | "fi" | "nb" => DateStyle::DottedDayMonthYear,
                "ja" | "zh" | "ko" => DateStyle::YearMonthDay,
                _ => return None,
            },
        };
        Some(style)
    }

    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::DayMonthYear => "%-d/%-m/%Y",
            DateStyle::PaddedDayMonthYear => "%d/%m/%Y",
            DateStyle::DottedDayMonthYear => "%d.%m.%Y",
            DateStyle::MonthDayYear => "%-m/%-d/%Y",
            DateStyle::YearMonthDay => "%Y/%m/%d",
            DateStyle::Iso => "%Y-%m-%d",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Format an optional birth date for display; empty when absent.
pub fn format_birth_date(date: Option<NaiveDate>, style: DateStyle) -> String {
    date.map(|d| style.format(d)).unwrap_or_default()
}
