use std::time::{Duration, Instant};

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Non-blocking lookup error message that hides itself after a fixed delay.
#[derive(Debug, Clone)]
pub struct Banner {
    message: Option<String>,
    raised_at: Option<Instant>,
    dismiss_after: Duration,
}

impl Default for Banner {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl Banner {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            message: None,
            raised_at: None,
            dismiss_after,
        }
    }

    pub fn raise(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.raised_at = Some(now);
    }

    pub fn dismiss(&mut self) {
        self.message = None;
        self.raised_at = None;
    }

    /// Message to show at `now`, or `None` once the delay has passed.
    pub fn visible(&self, now: Instant) -> Option<&str> {
        match (&self.message, self.raised_at) {
            (Some(message), Some(at)) if now.saturating_duration_since(at) < self.dismiss_after => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Clears an expired message. Returns `true` if something was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.message.is_some() && self.visible(now).is_none() {
            self.dismiss();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_auto_dismisses() {
        let start = Instant::now();
        let mut banner = Banner::new(Duration::from_secs(5));
        banner.raise("Failed to load Jira projects", start);

        assert_eq!(banner.visible(start + Duration::from_secs(4)), Some("Failed to load Jira projects"));
        assert!(!banner.tick(start + Duration::from_secs(4)));
        assert_eq!(banner.visible(start + Duration::from_secs(5)), None);
        assert!(banner.tick(start + Duration::from_secs(6)));
        assert!(!banner.tick(start + Duration::from_secs(7)));
    }

    #[test]
    fn test_raise_restarts_timer() {
        let start = Instant::now();
        let mut banner = Banner::default();
        banner.raise("first", start);
        banner.raise("second", start + Duration::from_secs(4));

        assert_eq!(banner.visible(start + Duration::from_secs(8)), Some("second"));
    }
}
