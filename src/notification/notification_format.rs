use chrono::{DateTime, Utc};

/// Relative age of `then` as seen at `now`, floored at each unit.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86400)
    }
}

/// Text shown on the bell badge; `None` hides the badge.
pub fn badge_label(unread_count: usize) -> Option<String> {
    match unread_count {
        0 => None,
        1..=9 => Some(unread_count.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// `home-cleaning` -> `home cleaning`.
pub fn humanize_category(category: &str) -> String {
    category.replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(seconds: i64) -> String {
        let now = Utc::now();
        time_ago(now - Duration::seconds(seconds), now)
    }

    #[test]
    fn test_time_ago_thresholds() {
        assert_eq!(ago(30), "Just now");
        assert_eq!(ago(59), "Just now");
        assert_eq!(ago(60), "1m ago");
        assert_eq!(ago(90), "1m ago");
        assert_eq!(ago(3599), "59m ago");
        assert_eq!(ago(3661), "1h ago");
        assert_eq!(ago(86399), "23h ago");
        assert_eq!(ago(90000), "1d ago");
    }

    #[test]
    fn test_time_ago_future_timestamp() {
        assert_eq!(ago(-120), "Just now");
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(1).as_deref(), Some("1"));
        assert_eq!(badge_label(9).as_deref(), Some("9"));
        assert_eq!(badge_label(10).as_deref(), Some("9+"));
        assert_eq!(badge_label(250).as_deref(), Some("9+"));
    }

    #[test]
    fn test_humanize_category() {
        assert_eq!(humanize_category("plumbing"), "plumbing");
        assert_eq!(humanize_category("home-cleaning"), "home cleaning");
        assert_eq!(humanize_category("ac-repair-service"), "ac repair service");
    }
}
