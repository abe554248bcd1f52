/// Target meal inferred for a chat turn. Never persisted; recomputed from the
/// current hour and the message text on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealHint {
    Breakfast,
    Lunch,
    Dinner,
    Unspecified,
}

const BREAKFAST_MARKERS: &[&str] = &["mic dejun", "breakfast", "diminea"];
const LUNCH_MARKERS: &[&str] = &["pranz", "prânz", "lunch"];
const DINNER_MARKERS: &[&str] = &["cina", "cină", "dinner", "seara"];

impl MealHint {
    /// An explicit meal keyword in the message always wins over the hour
    /// bucket. Matching is plain substring search on the lowercased message.
    pub fn infer(hour: u8, message: &str) -> Self {
        let msg = message.to_lowercase();
        let contains_any = |markers: &[&str]| markers.iter().any(|m| msg.contains(m));

        if contains_any(BREAKFAST_MARKERS) {
            return Self::Breakfast;
        }
        if contains_any(LUNCH_MARKERS) {
            return Self::Lunch;
        }
        if contains_any(DINNER_MARKERS) {
            return Self::Dinner;
        }
        match hour {
            5..=10 => Self::Breakfast,
            11..=15 => Self::Lunch,
            16..=23 => Self::Dinner,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Breakfast => Some("mic dejun"),
            Self::Lunch => Some("prânz"),
            Self::Dinner => Some("cină"),
            Self::Unspecified => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_buckets_without_keywords() {
        for h in 5..11 {
            assert_eq!(MealHint::infer(h, ""), MealHint::Breakfast, "hour {h}");
        }
        for h in 11..16 {
            assert_eq!(MealHint::infer(h, ""), MealHint::Lunch, "hour {h}");
        }
        for h in 16..24 {
            assert_eq!(MealHint::infer(h, ""), MealHint::Dinner, "hour {h}");
        }
        for h in 0..5 {
            assert_eq!(MealHint::infer(h, ""), MealHint::Unspecified, "hour {h}");
        }
    }

    #[test]
    fn explicit_keyword_overrides_hour() {
        assert_eq!(MealHint::infer(3, "cina rapida"), MealHint::Dinner);
        assert_eq!(MealHint::infer(20, "ceva de mic dejun"), MealHint::Breakfast);
        assert_eq!(MealHint::infer(7, "idee de prânz"), MealHint::Lunch);
    }

    #[test]
    fn marker_order_breakfast_before_lunch_before_dinner() {
        // A message naming both meals resolves to the earlier marker list.
        assert_eq!(
            MealHint::infer(20, "mic dejun sau cina?"),
            MealHint::Breakfast
        );
        assert_eq!(MealHint::infer(20, "pranz sau cina?"), MealHint::Lunch);
    }

    #[test]
    fn diminea_stem_matches_inflected_forms() {
        assert_eq!(MealHint::infer(20, "ceva de dimineata"), MealHint::Breakfast);
        assert_eq!(MealHint::infer(20, "dimineața devreme"), MealHint::Breakfast);
    }

    #[test]
    fn infer_is_idempotent() {
        let a = MealHint::infer(9, "ce pot gati?");
        let b = MealHint::infer(9, "ce pot gati?");
        assert_eq!(a, b);
    }
}
