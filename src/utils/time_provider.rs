use chrono::{DateTime, Duration, Utc};

///
/// An overridable clock - the lockout cool-down is measured against this so tests can time-travel.
///
#[derive(Debug, Default)]
pub struct TimeProvider {
    fixed: Option<DateTime<Utc>>
}

impl TimeProvider {
    pub fn now(&self) -> DateTime<Utc> {
        match self.fixed {
            Some(fixed) => fixed,
            None => Utc::now()
        }
    }

    pub fn fix(&mut self, fixed: Option<DateTime<Utc>>) {
        self.fixed = fixed;
    }

    ///
    /// Move a fixed clock forward. An unfixed clock becomes fixed at now + duration.
    ///
    pub fn advance(&mut self, duration: Duration) {
        self.fixed = Some(self.now() + duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_can_be_advanced_and_released() {
        let start = DateTime::parse_from_rfc3339("2021-08-23T09:30:00Z").unwrap().with_timezone(&Utc);
        let mut clock = TimeProvider::default();

        clock.fix(Some(start));
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(61));
        assert_eq!(clock.now(), start + Duration::seconds(61));

        clock.fix(None);
        assert!(clock.now() > start);
    }
}
