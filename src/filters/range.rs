//! Bounded numeric range filter

/// A `(low, high)` selection inside the fixed domain `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    min: i64,
    max: i64,
    step: i64,
    low: i64,
    high: i64,
}

impl RangeFilter {
    /// Starts out covering the whole domain.
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            step: step.max(1),
            low: min,
            high: max,
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn values(&self) -> (i64, i64) {
        (self.low, self.high)
    }

    /// Clamps the pair into the domain and stores it. An inverted pair is
    /// swapped first. Returns whether the stored pair changed.
    pub fn set(&mut self, low: i64, high: i64) -> bool {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let low = low.clamp(self.min, self.max);
        let high = high.clamp(self.min, self.max);
        let changed = (low, high) != (self.low, self.high);
        self.low = low;
        self.high = high;
        changed
    }

    /// Resets to the full domain. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        self.set(self.min, self.max)
    }

    /// Applies a `"lo,hi"` query value. Missing or malformed values reset the
    /// filter to its full domain.
    pub fn set_from_query(&mut self, value: Option<&str>) -> bool {
        match value.and_then(parse_pair) {
            Some((low, high)) => self.set(low, high),
            None => self.reset(),
        }
    }

    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.low, self.high)
    }

    /// Label of a slider handle: `Min`/`Max` at the domain edges, otherwise
    /// the value scaled by `factor` with thousands separators.
    pub fn label(&self, value: i64, factor: f64) -> String {
        if value <= self.min {
            return "Min".to_string();
        }
        if value >= self.max {
            return "Max".to_string();
        }
        format_number(value as f64 * factor)
    }
}

fn parse_pair(value: &str) -> Option<(i64, i64)> {
    let (low, high) = value.split_once(',')?;
    if high.contains(',') {
        return None;
    }
    Some((low.trim().parse().ok()?, high.trim().parse().ok()?))
}

/// en-US style number: grouped thousands, at most three fraction digits.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let formatted = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_set_clamps_and_reports_change() {
        let mut ibu = RangeFilter::new(0, 301, 1);
        assert!(ibu.set(-5, 40));
        assert_eq!(ibu.values(), (0, 40));
        assert!(!ibu.set(0, 40));
        assert!(ibu.set(10, 500));
        assert_eq!(ibu.values(), (10, 301));
    }

    #[test]
    fn test_inverted_pair_is_swapped() {
        let mut abv = RangeFilter::new(0, 21, 1);
        abv.set(9, 4);
        assert_eq!(abv.values(), (4, 9));
    }

    #[test]
    fn test_query_round_trip() {
        let mut ibu = RangeFilter::new(0, 301, 1);
        assert!(ibu.set_from_query(Some("10,50")));
        assert_eq!(ibu.values(), (10, 50));
        assert_eq!(ibu.to_query_value(), "10,50");
    }

    #[test]
    fn test_malformed_query_resets_to_domain() {
        let mut srm = RangeFilter::new(0, 101, 1);
        srm.set(5, 10);
        for bad in [None, Some(""), Some("abc"), Some("1,2,3"), Some("4"), Some("x,7")] {
            srm.set(5, 10);
            assert!(srm.set_from_query(bad), "{:?} should reset", bad);
            assert_eq!(srm.values(), (0, 101));
        }
    }

    #[test]
    fn test_labels() {
        let og = RangeFilter::new(1000, 1151, 2);
        assert_eq!(og.label(1000, 0.001), "Min");
        assert_eq!(og.label(1151, 0.001), "Max");
        assert_eq!(og.label(1050, 0.001), "1.05");

        let ibu = RangeFilter::new(0, 3001, 1);
        assert_eq!(ibu.label(1500, 1.0), "1,500");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1.0504), "1.05");
        assert_eq!(format_number(-12.5), "-12.5");
    }

    proptest! {
        #[test]
        fn prop_in_domain_pair_round_trips(a in 0i64..=301, b in 0i64..=301) {
            let (low, high) = (a.min(b), a.max(b));
            let mut ibu = RangeFilter::new(0, 301, 1);
            ibu.set_from_query(Some(&format!("{},{}", low, high)));
            prop_assert_eq!(ibu.values(), (low, high));

            let mut restored = RangeFilter::new(0, 301, 1);
            restored.set_from_query(Some(&ibu.to_query_value()));
            prop_assert_eq!(restored, ibu);
        }

        #[test]
        fn prop_malformed_value_resets_to_domain(
            value in prop_oneof![".*", "[-0-9, x]{0,8}"],
            low in 0i64..=101,
            high in 0i64..=101,
        ) {
            prop_assume!(parse_pair(&value).is_none());
            let mut srm = RangeFilter::new(0, 101, 1);
            srm.set(low, high);
            srm.set_from_query(Some(&value));
            prop_assert_eq!(srm.values(), (0, 101));
        }
    }
}
