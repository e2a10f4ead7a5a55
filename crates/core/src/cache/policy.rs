use std::fmt;
use std::str::FromStr;

/// When cached listing pages are dropped after a write.
///
/// Single-entity keys are always refreshed on write. Listing pages have no
/// TTL, so this policy alone bounds how stale they can get.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingInvalidation {
    /// Every create, update and delete drops all listing pages of the
    /// written entity type.
    #[default]
    OnWrite,
    /// Listing pages stay cached until `invalidate_listings` is called.
    Manual,
}

impl ListingInvalidation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingInvalidation::OnWrite => "on-write",
            ListingInvalidation::Manual => "manual",
        }
    }
}

impl fmt::Display for ListingInvalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing invalidation policy '{0}', expected 'on-write' or 'manual'")]
pub struct ParsePolicyError(String);

impl FromStr for ListingInvalidation {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on-write" | "on_write" | "onwrite" => Ok(ListingInvalidation::OnWrite),
            "manual" => Ok(ListingInvalidation::Manual),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_on_write() {
        assert_eq!(ListingInvalidation::default(), ListingInvalidation::OnWrite);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "on-write".parse::<ListingInvalidation>(),
            Ok(ListingInvalidation::OnWrite)
        );
        assert_eq!(
            " Manual ".parse::<ListingInvalidation>(),
            Ok(ListingInvalidation::Manual)
        );
        assert!("sometimes".parse::<ListingInvalidation>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [ListingInvalidation::OnWrite, ListingInvalidation::Manual] {
            assert_eq!(policy.to_string().parse::<ListingInvalidation>(), Ok(policy));
        }
    }
}
