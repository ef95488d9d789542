pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

pub fn format_hours(seconds: i64) -> String {
    format!("{:.2}h", seconds as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_pads_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(61), "0:01:01");
        assert_eq!(format_elapsed(3725), "1:02:05");
        assert_eq!(format_elapsed(36_000), "10:00:00");
    }

    #[test]
    fn format_elapsed_clamps_negative_values() {
        assert_eq!(format_elapsed(-5), "0:00:00");
    }

    #[test]
    fn format_hours_rounds_to_two_places() {
        assert_eq!(format_hours(5400), "1.50h");
        assert_eq!(format_hours(0), "0.00h");
    }
}
