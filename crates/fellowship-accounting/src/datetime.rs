use chrono::{Datelike, NaiveDate};

/// Abbreviated month names, January first
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Get the current date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn current_year() -> i32 {
    today().year()
}

/// Short label like "Mar 2024". Months outside
/// 1..=12 are shown as a number.
pub fn month_label(year: i32, month: u32) -> String {
    match month.checked_sub(1).and_then(|idx| MONTHS.get(idx as usize)) {
        Some(name) => format!("{} {}", name, year),
        None => format!("{:02}/{}", month, year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2024, 1), "Jan 2024");
        assert_eq!(month_label(2023, 12), "Dec 2023");
        assert_eq!(month_label(2023, 0), "00/2023");
        assert_eq!(month_label(2023, 13), "13/2023");
    }

    #[test]
    fn test_current_year() {
        assert_eq!(current_year(), today().year());
    }
}
