//! Localized date formatting

use chrono::{DateTime, Datelike, TimeZone};

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Format a publication date the way the locale writes dates
///
/// # Examples
/// ```ignore
/// format_date(&date, "en") // -> "January 2, 2024"
/// format_date(&date, "es") // -> "2 de enero de 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, locale: &str) -> String {
    let month_index = date.month0() as usize;
    match locale {
        "es" => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS_ES[month_index],
            date.year()
        ),
        _ => format!(
            "{} {}, {}",
            MONTHS_EN[month_index],
            date.day(),
            date.year()
        ),
    }
}

/// Machine-readable date for `<time datetime>` and feeds
pub fn date_iso<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

/// Generate a localized `<time>` HTML element
pub fn time_tag<Tz: TimeZone>(date: &DateTime<Tz>, locale: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        r#"<time datetime="{}">{}</time>"#,
        date_iso(date),
        format_date(date, locale)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_format_date_en() {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "en"), "January 15, 2024");
    }

    #[test]
    fn test_format_date_es() {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "es"), "15 de enero de 2024");
    }

    #[test]
    fn test_unknown_locale_reads_as_english() {
        let date = Local.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "fr"), "December 1, 2024");
    }

    #[test]
    fn test_time_tag() {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let tag = time_tag(&date, "en");
        assert!(tag.contains(r#"datetime="2024-01-15""#));
        assert!(tag.contains("January 15, 2024"));
    }
}
