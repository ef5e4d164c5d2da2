//! Time formatting for the transport display and seek tooltip

/// Format a duration in seconds as `mm:ss`, or `hh:mm:ss` past one hour
///
/// Seconds are rounded to the nearest whole second. Negative or non-finite
/// input (an audio source without a known duration) renders as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return String::from("00:00");
    }

    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if seconds > 3600.0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        // Exactly one hour still uses the short form, minutes wrap to 00
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.4), "00:59");
        assert_eq!(format_time(59.6), "01:00");
        assert_eq!(format_time(754.0), "12:34");
    }

    #[test]
    fn test_long_form() {
        assert_eq!(format_time(3601.0), "01:00:01");
        assert_eq!(format_time(7322.0), "02:02:02");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
        assert_eq!(format_time(-5.0), "00:00");
    }
}
