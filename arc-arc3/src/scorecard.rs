use chrono::{DateTime, Duration, Utc};

const SCORECARD_TTL_MINUTES: i64 = 15;
/// Proactively refresh before the server's own expiry window closes (spec
/// §4.6 "if scorecard expires mid-run, the runner MUST detect and either
/// refresh or terminate cleanly").
const SCORECARD_REFRESH_MINUTES: i64 = 12;

/// One open scorecard's local bookkeeping — the server is the source of
/// truth for actual expiry, this just tells the runner when to check.
#[derive(Debug, Clone)]
pub struct Scorecard {
    pub card_id: String,
    opened_at: DateTime<Utc>,
}

impl Scorecard {
    pub fn new(card_id: String) -> Self {
        Self { card_id, opened_at: Utc::now() }
    }

    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        now - self.opened_at >= Duration::minutes(SCORECARD_REFRESH_MINUTES)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.opened_at >= Duration::minutes(SCORECARD_TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_scorecard_needs_no_refresh() {
        let card = Scorecard::new("c1".into());
        assert!(!card.should_refresh(Utc::now()));
        assert!(!card.is_expired(Utc::now()));
    }

    #[test]
    fn refresh_window_opens_before_expiry() {
        let card = Scorecard::new("c1".into());
        let at_twelve = Utc::now() + Duration::minutes(12);
        let at_fifteen = Utc::now() + Duration::minutes(15);
        assert!(card.should_refresh(at_twelve));
        assert!(card.is_expired(at_fifteen));
    }
}
