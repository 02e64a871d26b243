//! Color exclusion rules
//!
//! A rule is a tolerance window around a target color. A pixel whose four
//! channels all fall inside a rule's inclusive bounds is ineligible to
//! trigger collision, letting callers mask out backgrounds, shadows or other
//! decoration that should never count as contact.

use crate::error::CollisionError;

/// Default alpha tolerance for a new exclusion rule
pub const DEFAULT_ALPHA_RANGE: u8 = 255;

/// Default red/green/blue tolerance for a new exclusion rule
pub const DEFAULT_CHANNEL_RANGE: u8 = 20;

/// Tolerance window around a target color
///
/// Bounds are derived as `channel ± range` with saturating arithmetic, so
/// they stay inside the 0-255 channel domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorExclusionRule {
    color: u32,
    a_min: u8,
    a_max: u8,
    r_min: u8,
    r_max: u8,
    g_min: u8,
    g_max: u8,
    b_min: u8,
    b_max: u8,
}

impl ColorExclusionRule {
    /// Build a rule around a `0xAARRGGBB` color with per-channel tolerances
    pub fn new(color: u32, alpha_range: u8, red_range: u8, green_range: u8, blue_range: u8) -> Self {
        let a = (color >> 24) as u8;
        let r = (color >> 16) as u8;
        let g = (color >> 8) as u8;
        let b = color as u8;
        Self {
            color,
            a_min: a.saturating_sub(alpha_range),
            a_max: a.saturating_add(alpha_range),
            r_min: r.saturating_sub(red_range),
            r_max: r.saturating_add(red_range),
            g_min: g.saturating_sub(green_range),
            g_max: g.saturating_add(green_range),
            b_min: b.saturating_sub(blue_range),
            b_max: b.saturating_add(blue_range),
        }
    }

    /// Build a rule with the default tolerances (alpha 255, colors 20)
    pub fn with_defaults(color: u32) -> Self {
        Self::new(
            color,
            DEFAULT_ALPHA_RANGE,
            DEFAULT_CHANNEL_RANGE,
            DEFAULT_CHANNEL_RANGE,
            DEFAULT_CHANNEL_RANGE,
        )
    }

    /// Target color this rule was built around
    pub fn color(&self) -> u32 {
        self.color
    }

    /// True when all four channels fall inside this rule's inclusive bounds
    pub fn matches(&self, alpha: u8, red: u8, green: u8, blue: u8) -> bool {
        (self.a_min..=self.a_max).contains(&alpha)
            && (self.r_min..=self.r_max).contains(&red)
            && (self.g_min..=self.g_max).contains(&green)
            && (self.b_min..=self.b_max).contains(&blue)
    }
}

/// Rule set for one detection session, keyed by target color
///
/// Adding a color that is already present is a silent no-op; removing a
/// color that was never added is an error. The asymmetry is deliberate and
/// part of the session contract.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    rules: Vec<ColorExclusionRule>,
}

impl ExclusionRules {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; silently ignored when its color is already present
    pub fn add(&mut self, rule: ColorExclusionRule) {
        if self.rules.iter().any(|r| r.color() == rule.color()) {
            log::debug!("color 0x{:08X} already excluded, ignoring", rule.color());
            return;
        }
        self.rules.push(rule);
    }

    /// Remove the rule for a color
    pub fn remove(&mut self, color: u32) -> Result<(), CollisionError> {
        match self.rules.iter().position(|r| r.color() == color) {
            Some(index) => {
                self.rules.remove(index);
                Ok(())
            }
            None => Err(CollisionError::ColorNotFound(color)),
        }
    }

    /// True when no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterate over the registered rules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ColorExclusionRule> {
        self.rules.iter()
    }

    /// True when any rule matches the sample on all four channels
    pub fn excludes(&self, alpha: u8, red: u8, green: u8, blue: u8) -> bool {
        self.rules.iter().any(|r| r.matches(alpha, red, green, blue))
    }

    /// Drop every rule
    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_derivation_saturates() {
        // Near-black target with a wide range: lower bounds clamp at 0
        let rule = ColorExclusionRule::new(0xFF050505, 255, 20, 20, 20);
        assert!(rule.matches(255, 0, 0, 0));
        assert!(rule.matches(0, 25, 25, 25));
        assert!(!rule.matches(255, 26, 0, 0));

        // Near-white target: upper bounds clamp at 255
        let rule = ColorExclusionRule::new(0xFFFAFAFA, 0, 20, 20, 20);
        assert!(rule.matches(255, 255, 255, 255));
        assert!(!rule.matches(254, 255, 255, 255));
    }

    #[test]
    fn test_four_of_four_channel_match() {
        let rule = ColorExclusionRule::new(0xFF00FF00, 10, 10, 10, 10);
        assert!(rule.matches(250, 5, 250, 5));
        // One channel out of range defeats the match
        assert!(!rule.matches(250, 11, 250, 5));
        assert!(!rule.matches(200, 5, 250, 5));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut rules = ExclusionRules::new();
        rules.add(ColorExclusionRule::with_defaults(0xFFFF0000));
        rules.add(ColorExclusionRule::new(0xFFFF0000, 1, 1, 1, 1));
        assert_eq!(rules.len(), 1);
        // The first rule's tolerances survive
        assert!(rules.excludes(255, 235, 20, 20));
    }

    #[test]
    fn test_remove_missing_color_errors() {
        let mut rules = ExclusionRules::new();
        rules.add(ColorExclusionRule::with_defaults(0xFFFF0000));

        let err = rules.remove(0xFF00FF00).unwrap_err();
        assert_eq!(err, CollisionError::ColorNotFound(0xFF00FF00));
        // The failed call leaves the set unchanged
        assert_eq!(rules.len(), 1);

        rules.remove(0xFFFF0000).unwrap();
        assert!(rules.is_empty());
    }
}
