/// Render a second count as `m:ss`.
///
/// Minutes are not padded and are allowed to exceed 59:
/// `1500 -> "25:00"`, `65 -> "1:05"`, `0 -> "0:00"`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_known_values() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(3599), "59:59");
    }

    #[test]
    fn minutes_grow_past_an_hour() {
        assert_eq!(format_clock(3600), "60:00");
    }

    proptest! {
        #[test]
        fn seconds_are_always_two_digits(n in 0u64..3600) {
            let out = format_clock(n);
            let (mins, secs) = out.split_once(':').unwrap();
            prop_assert_eq!(secs.len(), 2);
            prop_assert_eq!(mins.parse::<u64>().unwrap(), n / 60);
            prop_assert_eq!(secs.parse::<u64>().unwrap(), n % 60);
            prop_assert!(mins == "0" || !mins.starts_with('0'));
        }
    }
}
