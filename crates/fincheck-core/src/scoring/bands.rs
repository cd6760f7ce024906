//! Ordered threshold ladders.
//!
//! Every scoring rule in the engine has the same shape: walk a list of cut
//! points in order and take the outcome of the first band the value falls
//! into, with a catch-all outcome when none matches. [`Ladder`] captures that
//! shape once so each metric only declares its cut points and outcomes.

use rust_decimal::Decimal;

/// Placeholder substituted by [`render`] in explanation templates.
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// How a band's cut point is tested against the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Matches when `value < cut`.
    Below(Decimal),
    /// Matches when `value >= cut`.
    AtLeast(Decimal),
}

impl Bound {
    pub fn contains(&self, value: Decimal) -> bool {
        match *self {
            Bound::Below(cut) => value < cut,
            Bound::AtLeast(cut) => value >= cut,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Band<T> {
    pub bound: Bound,
    pub outcome: T,
}

impl<T> Band<T> {
    pub const fn below(cut: Decimal, outcome: T) -> Self {
        Band {
            bound: Bound::Below(cut),
            outcome,
        }
    }

    pub const fn at_least(cut: Decimal, outcome: T) -> Self {
        Band {
            bound: Bound::AtLeast(cut),
            outcome,
        }
    }
}

/// An ordered set of bands plus the outcome used when no band matches.
#[derive(Debug, Clone, Copy)]
pub struct Ladder<T: 'static> {
    bands: &'static [Band<T>],
    otherwise: T,
}

impl<T: 'static> Ladder<T> {
    pub const fn new(bands: &'static [Band<T>], otherwise: T) -> Self {
        Ladder { bands, otherwise }
    }

    /// Outcome of the first band containing `value`, else the catch-all.
    pub fn evaluate(&self, value: Decimal) -> &T {
        self.bands
            .iter()
            .find(|band| band.bound.contains(value))
            .map(|band| &band.outcome)
            .unwrap_or(&self.otherwise)
    }

    pub fn bands(&self) -> &[Band<T>] {
        self.bands
    }

    pub fn otherwise(&self) -> &T {
        &self.otherwise
    }
}

/// A fixed score, status and explanation template for one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict<S> {
    pub score: u32,
    pub status: S,
    pub template: &'static str,
}

impl<S> Verdict<S> {
    pub const fn new(score: u32, status: S, template: &'static str) -> Self {
        Verdict {
            score,
            status,
            template,
        }
    }
}

/// Fill `{value}` in a template with `value` to one decimal place.
pub fn render(template: &str, value: Decimal) -> String {
    if template.contains(VALUE_PLACEHOLDER) {
        template.replace(VALUE_PLACEHOLDER, &format!("{:.1}", value.round_dp(1)))
    } else {
        template.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    static ASCENDING_BANDS: [Band<&str>; 2] = [
        Band::below(dec!(10), "low"),
        Band::below(dec!(20), "mid"),
    ];
    static ASCENDING: Ladder<&str> = Ladder::new(&ASCENDING_BANDS, "high");

    static DESCENDING_BANDS: [Band<char>; 2] =
        [Band::at_least(dec!(80), 'A'), Band::at_least(dec!(50), 'B')];
    static DESCENDING: Ladder<char> = Ladder::new(&DESCENDING_BANDS, 'C');

    #[test]
    fn test_first_matching_band_wins() {
        assert_eq!(*ASCENDING.evaluate(dec!(5)), "low");
        assert_eq!(*ASCENDING.evaluate(dec!(15)), "mid");
    }

    #[test]
    fn test_below_cut_is_exclusive() {
        assert_eq!(*ASCENDING.evaluate(dec!(10)), "mid");
        assert_eq!(*ASCENDING.evaluate(dec!(20)), "high");
    }

    #[test]
    fn test_at_least_cut_is_inclusive() {
        assert_eq!(*DESCENDING.evaluate(dec!(80)), 'A');
        assert_eq!(*DESCENDING.evaluate(dec!(79.99)), 'B');
        assert_eq!(*DESCENDING.evaluate(dec!(50)), 'B');
    }

    #[test]
    fn test_falls_through_to_catch_all() {
        assert_eq!(*ASCENDING.evaluate(dec!(1_000_000)), "high");
        assert_eq!(*DESCENDING.evaluate(dec!(-5)), 'C');
        assert_eq!(*DESCENDING.otherwise(), 'C');
        assert_eq!(DESCENDING.bands().len(), 2);
    }

    #[test]
    fn test_render_interpolates_one_decimal() {
        assert_eq!(render("at {value}%", dec!(66.666)), "at 66.7%");
        assert_eq!(render("at {value}%", dec!(50)), "at 50.0%");
        assert_eq!(render("no placeholder", dec!(1)), "no placeholder");
    }
}
