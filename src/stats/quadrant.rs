//! Quadrant Module
//! The four fixed product categories and their colors and labels.

use crate::data::Locale;

/// One of the four buckets formed by splitting X and Y at their medians.
///
/// X grows as unit profit falls, so "high profit" is the low-X (left) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quadrant {
    /// High profit, high volume (top left)
    Star,
    /// Low profit, high volume (top right)
    CashCow,
    /// High profit, low volume (bottom left)
    Niche,
    /// Low profit, low volume (bottom right)
    Dog,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Star,
        Quadrant::CashCow,
        Quadrant::Niche,
        Quadrant::Dog,
    ];

    /// Assign a point to a quadrant. Values equal to a median go to the high side.
    pub fn classify(x: f64, y: f64, x_median: f64, y_median: f64) -> Self {
        let high_profit = x <= x_median;
        let high_volume = y >= y_median;
        match (high_profit, high_volume) {
            (true, true) => Quadrant::Star,
            (false, true) => Quadrant::CashCow,
            (true, false) => Quadrant::Niche,
            (false, false) => Quadrant::Dog,
        }
    }

    /// Sits left of the X median.
    pub fn is_high_profit(self) -> bool {
        matches!(self, Quadrant::Star | Quadrant::Niche)
    }

    /// Sits above the Y median.
    pub fn is_high_volume(self) -> bool {
        matches!(self, Quadrant::Star | Quadrant::CashCow)
    }

    /// RGB color shared by the background tint, markers, caption and legend entry.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Quadrant::Star => (0x2c, 0xa0, 0x2c),
            Quadrant::CashCow => (0x1f, 0x77, 0xb4),
            Quadrant::Niche => (0xff, 0x7f, 0x0e),
            Quadrant::Dog => (0xd6, 0x27, 0x28),
        }
    }

    /// Category text written to the export.
    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Zh, Quadrant::Star) => "明星（高利润×高销量）",
            (Locale::Zh, Quadrant::CashCow) => "金牛（薄利多销）",
            (Locale::Zh, Quadrant::Niche) => "潜力/利基（高利润×低销量）",
            (Locale::Zh, Quadrant::Dog) => "瘦狗（低利润×低销量）",
            (Locale::En, Quadrant::Star) => "Star (high profit × high volume)",
            (Locale::En, Quadrant::CashCow) => "Cash Cow (thin margin, high volume)",
            (Locale::En, Quadrant::Niche) => "Question Mark/Niche (high profit × low volume)",
            (Locale::En, Quadrant::Dog) => "Dog (low profit × low volume)",
        }
    }

    /// Text for the chart legend; zh uses the abbreviated form.
    pub fn legend_label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Zh, Quadrant::Star) => "明星（高利×高销）",
            (Locale::Zh, Quadrant::CashCow) => "金牛（薄利多销）",
            (Locale::Zh, Quadrant::Niche) => "潜力/利基（高利×低销）",
            (Locale::Zh, Quadrant::Dog) => "瘦狗（低利×低销）",
            (Locale::En, _) => self.label(locale),
        }
    }

    /// Two-line caption drawn in the middle of the quadrant: (name, description).
    pub fn caption(self, locale: Locale) -> (&'static str, &'static str) {
        match (locale, self) {
            (Locale::Zh, Quadrant::Star) => ("明星", "(高利×高销)"),
            (Locale::Zh, Quadrant::CashCow) => ("金牛", "(薄利多销)"),
            (Locale::Zh, Quadrant::Niche) => ("潜力/利基", "(高利×低销)"),
            (Locale::Zh, Quadrant::Dog) => ("瘦狗", "(低利×低销)"),
            (Locale::En, Quadrant::Star) => ("Star", "(high profit × high volume)"),
            (Locale::En, Quadrant::CashCow) => ("Cash Cow", "(thin margin, high volume)"),
            (Locale::En, Quadrant::Niche) => ("Question Mark/Niche", "(high profit × low volume)"),
            (Locale::En, Quadrant::Dog) => ("Dog", "(low profit × low volume)"),
        }
    }

    /// Parse a category label written by [`Quadrant::label`] in any locale.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|q| {
            [Locale::Zh, Locale::En]
                .into_iter()
                .any(|locale| q.label(locale) == text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_strict_sides() {
        assert_eq!(Quadrant::classify(0.2, 0.8, 0.5, 0.5), Quadrant::Star);
        assert_eq!(Quadrant::classify(0.8, 0.8, 0.5, 0.5), Quadrant::CashCow);
        assert_eq!(Quadrant::classify(0.2, 0.2, 0.5, 0.5), Quadrant::Niche);
        assert_eq!(Quadrant::classify(0.8, 0.2, 0.5, 0.5), Quadrant::Dog);
    }

    #[test]
    fn test_ties_go_to_high_side() {
        assert_eq!(Quadrant::classify(0.5, 0.5, 0.5, 0.5), Quadrant::Star);
        assert_eq!(Quadrant::classify(0.5, 0.1, 0.5, 0.5), Quadrant::Niche);
        assert_eq!(Quadrant::classify(0.9, 0.5, 0.5, 0.5), Quadrant::CashCow);
    }

    #[test]
    fn test_sides_agree_with_classify() {
        for q in Quadrant::ALL {
            let x = if q.is_high_profit() { 0.1 } else { 0.9 };
            let y = if q.is_high_volume() { 0.9 } else { 0.1 };
            assert_eq!(Quadrant::classify(x, y, 0.5, 0.5), q);
        }
    }

    #[test]
    fn test_label_round_trip() {
        for q in Quadrant::ALL {
            assert_eq!(Quadrant::from_label(q.label(Locale::Zh)), Some(q));
            assert_eq!(Quadrant::from_label(q.label(Locale::En)), Some(q));
        }
        assert_eq!(Quadrant::from_label("unknown"), None);
    }

    #[test]
    fn test_legend_labels() {
        for q in Quadrant::ALL {
            assert_eq!(q.legend_label(Locale::En), q.label(Locale::En));
            let zh = q.legend_label(Locale::Zh);
            assert!(zh.chars().count() <= q.label(Locale::Zh).chars().count());
            assert!(zh.starts_with(q.caption(Locale::Zh).0));
        }
        assert_eq!(Quadrant::Star.legend_label(Locale::Zh), "明星（高利×高销）");
    }

    #[test]
    fn test_colors_are_distinct() {
        let mut colors: Vec<_> = Quadrant::ALL.iter().map(|q| q.rgb()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 4);
    }
}
