pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms < 3_600_000 {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = ms / 3_600_000;
        let mins = (ms % 3_600_000) / 60_000;
        format!("{}h {}m", hours, mins)
    }
}

/// First line of `text`, cut to `max_chars` characters with an ellipsis.
pub fn one_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let multi_line = text.lines().nth(1).is_some();
    if line.chars().count() > max_chars {
        let head: String = line.chars().take(max_chars).collect();
        format!("{}...", head)
    } else if multi_line {
        format!("{}...", line)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(800), "800ms");
        assert_eq!(format_duration(4000), "4.0s");
        assert_eq!(format_duration(61_000), "1m 1s");
        assert_eq!(format_duration(3_660_000), "1h 1m");
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("short", 10), "short");
        assert_eq!(one_line("abcdefghijkl", 5), "abcde...");
        assert_eq!(one_line("Execution Result: [\n  1\n]", 80), "Execution Result: [...");
        assert_eq!(one_line("", 5), "");
    }
}
