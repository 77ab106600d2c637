/// Formats elapsed seconds as `mm:ss`. Minutes keep counting past 59.
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = (seconds % 60.0).floor() as u64;
    format!("{minutes:02}:{rest:02}")
}

pub fn format_secs(seconds: u64) -> String {
    format_elapsed(seconds as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_secs(90), "01:30");
        assert_eq!(format_secs(0), "00:00");
        assert_eq!(format_secs(59), "00:59");
    }

    #[test]
    fn minutes_do_not_roll_over_into_hours() {
        assert_eq!(format_secs(3661), "61:01");
        assert_eq!(format_secs(6000), "100:00");
    }

    #[test]
    fn fractional_seconds_are_floored() {
        assert_eq!(format_elapsed(15.0), "00:15");
        assert_eq!(format_elapsed(75.9), "01:15");
    }

    #[test]
    fn invalid_input_clamps_to_zero() {
        assert_eq!(format_elapsed(-4.0), "00:00");
        assert_eq!(format_elapsed(f64::NAN), "00:00");
    }
}
