//! Tiered social-contribution lookup for freelancers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::{ContributionSchedule, ContributionTier};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Returns the monthly quota for `monthly_yield`.
///
/// Tiers are scanned in order and the first one whose inclusive range holds
/// the yield wins, so a value sitting on a shared boundary belongs to the
/// lower tier. When nothing matches, or the matching tier has no quota or a
/// zero quota, `fallback_quota` applies.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::ContributionTier;
/// use fiscal_core::calculations::lookup_quota;
///
/// let tiers = [
///     ContributionTier { income_min: dec!(0), income_max: dec!(670), quota: Some(dec!(200)) },
///     ContributionTier { income_min: dec!(670), income_max: dec!(900), quota: Some(dec!(220)) },
/// ];
///
/// assert_eq!(lookup_quota(dec!(670), &tiers, dec!(590)), dec!(200));
/// assert_eq!(lookup_quota(dec!(800), &tiers, dec!(590)), dec!(220));
/// assert_eq!(lookup_quota(dec!(5000), &tiers, dec!(590)), dec!(590));
/// ```
pub fn lookup_quota(
    monthly_yield: Decimal,
    tiers: &[ContributionTier],
    fallback_quota: Decimal,
) -> Decimal {
    match tiers.iter().find(|tier| tier.contains(monthly_yield)) {
        Some(tier) => tier
            .quota
            .filter(|quota| *quota > Decimal::ZERO)
            .unwrap_or(fallback_quota),
        None => {
            debug!(%monthly_yield, %fallback_quota, "no contribution tier matched");
            fallback_quota
        }
    }
}

/// Converts an annual net yield to its monthly figure, looks up the quota,
/// and returns `(monthly_quota, annual_quota)`.
pub fn annual_quota(
    annual_net_yield: Decimal,
    schedule: &ContributionSchedule,
) -> (Decimal, Decimal) {
    let monthly_yield = monthly(annual_net_yield);
    let monthly_quota = lookup_quota(monthly_yield, schedule.tiers(), schedule.fallback_quota());
    (monthly_quota, monthly_quota * MONTHS_PER_YEAR)
}

/// Annual to monthly figure.
pub fn monthly(annual: Decimal) -> Decimal {
    annual / MONTHS_PER_YEAR
}
