use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Whole days, hours, minutes and seconds left until a target instant.
///
/// Always derived from a millisecond duration, never built field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeRemaining {
    pub const ZERO: TimeRemaining = TimeRemaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a millisecond duration. Anything `<= 0` yields [`Self::ZERO`].
    pub fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            return Self::ZERO;
        }
        Self {
            days: (ms / MS_PER_DAY) as u64,
            hours: ((ms % MS_PER_DAY) / MS_PER_HOUR) as u64,
            minutes: ((ms % MS_PER_HOUR) / MS_PER_MINUTE) as u64,
            seconds: ((ms % MS_PER_MINUTE) / MS_PER_SECOND) as u64,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Total whole seconds represented.
    pub fn total_secs(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_of_each_unit() {
        assert_eq!(
            TimeRemaining::from_millis(90_061_000),
            TimeRemaining {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn non_positive_is_zero() {
        assert!(TimeRemaining::from_millis(0).is_zero());
        assert!(TimeRemaining::from_millis(-5_000).is_zero());
    }

    #[test]
    fn sub_second_floors_to_zero() {
        assert!(TimeRemaining::from_millis(999).is_zero());
        assert_eq!(TimeRemaining::from_millis(1_000).seconds, 1);
    }

    #[test]
    fn display_pads_fields() {
        let r = TimeRemaining::from_millis(3 * MS_PER_DAY + 4 * MS_PER_MINUTE);
        assert_eq!(r.to_string(), "03d 00h 04m 00s");
    }

    proptest! {
        #[test]
        fn fields_stay_in_range(ms in 1i64..10_000_000_000_000i64) {
            let r = TimeRemaining::from_millis(ms);
            prop_assert!(r.hours < 24);
            prop_assert!(r.minutes < 60);
            prop_assert!(r.seconds < 60);
            prop_assert_eq!(r.total_secs() as i64, ms / 1000);
        }
    }
}
