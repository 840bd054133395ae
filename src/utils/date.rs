use chrono::{Local, NaiveDate};

/// Dagens datum i lokal tid
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse ett datum från en sträng (flexibelt format)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let formats = [
        "%Y-%m-%d",    // 2024-01-15
        "%Y/%m/%d",    // 2024/01/15
        "%d.%m.%Y",    // 15.01.2024
        "%d/%m/%Y",    // 15/01/2024
        "%Y%m%d",      // 20240115
    ];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

/// Formatera ett datum för lagring och visning
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-01"),
            Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(
            parse_date("01.05.2024"),
            Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-45"), None);
        assert_eq!(parse_date("invalid"), None);
    }

    #[test]
    fn test_format_today_roundtrips() {
        let s = format_date(today());
        assert_eq!(s.len(), 10);
        assert_eq!(parse_date(&s), Some(today()));
    }
}
