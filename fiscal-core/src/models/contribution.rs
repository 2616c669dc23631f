use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::TableError;

/// Monthly social-contribution quota for a range of monthly net yield.
///
/// Both ends of the range are inclusive. A tier without a `quota`, or with a
/// zero quota, still matches but resolves to the schedule's fallback quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContributionTier {
    pub income_min: Decimal,
    pub income_max: Decimal,
    #[serde(default)]
    pub quota: Option<Decimal>,
}

impl ContributionTier {
    pub fn contains(&self, monthly_yield: Decimal) -> bool {
        self.income_min <= monthly_yield && monthly_yield <= self.income_max
    }
}

/// Ordered contribution tiers plus the quota used when no tier applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionSchedule {
    tiers: Vec<ContributionTier>,
    fallback_quota: Decimal,
}

impl ContributionSchedule {
    /// Validates tier ordering.
    ///
    /// Tiers must be non-empty, each with `income_min <= income_max`, and
    /// their starts strictly increasing. Where two tiers share a boundary
    /// value, the lower tier wins on lookup. A gap between consecutive tiers
    /// is allowed; yields inside it resolve to the fallback quota.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] describing the first offending tier.
    pub fn new(
        tiers: Vec<ContributionTier>,
        fallback_quota: Decimal,
    ) -> Result<Self, TableError> {
        if tiers.is_empty() {
            return Err(TableError::Empty);
        }
        if fallback_quota < Decimal::ZERO {
            return Err(TableError::NegativeQuota(fallback_quota));
        }

        for (index, tier) in tiers.iter().enumerate() {
            if tier.income_min > tier.income_max {
                return Err(TableError::InvertedTier {
                    index,
                    min: tier.income_min,
                    max: tier.income_max,
                });
            }
            if let Some(quota) = tier.quota.filter(|q| *q < Decimal::ZERO) {
                return Err(TableError::NegativeQuota(quota));
            }
            if index == 0 {
                continue;
            }

            let previous = &tiers[index - 1];
            if tier.income_min <= previous.income_min {
                return Err(TableError::TiersNotIncreasing {
                    index,
                    min: tier.income_min,
                    previous_min: previous.income_min,
                });
            }
            if tier.income_min > previous.income_max {
                warn!(
                    index,
                    previous_max = %previous.income_max,
                    min = %tier.income_min,
                    "contribution tiers leave a gap, yields inside it pay the fallback quota"
                );
            }
        }

        Ok(Self {
            tiers,
            fallback_quota,
        })
    }

    pub fn tiers(&self) -> &[ContributionTier] {
        &self.tiers
    }

    pub fn fallback_quota(&self) -> Decimal {
        self.fallback_quota
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tier(min: Decimal, max: Decimal, quota: Decimal) -> ContributionTier {
        ContributionTier {
            income_min: min,
            income_max: max,
            quota: Some(quota),
        }
    }

    #[test]
    fn accepts_adjacent_tiers_sharing_a_boundary() {
        let schedule = ContributionSchedule::new(
            vec![
                tier(dec!(0), dec!(670), dec!(200)),
                tier(dec!(670), dec!(900), dec!(220)),
            ],
            dec!(590),
        )
        .expect("schedule should be valid");

        assert_eq!(schedule.tiers().len(), 2);
        assert_eq!(schedule.fallback_quota(), dec!(590));
    }

    #[test]
    fn tier_range_is_inclusive() {
        let t = tier(dec!(670), dec!(900), dec!(220));

        assert!(t.contains(dec!(670)));
        assert!(t.contains(dec!(900)));
        assert!(!t.contains(dec!(900.01)));
        assert!(!t.contains(dec!(669.99)));
    }

    #[test]
    fn accepts_cent_step_tiers() {
        let schedule = ContributionSchedule::new(
            vec![
                tier(dec!(0), dec!(670), dec!(200)),
                tier(dec!(670.01), dec!(900), dec!(220)),
            ],
            dec!(590),
        )
        .expect("non-overlapping schedule should be valid");

        assert_eq!(schedule.tiers()[1].income_min, dec!(670.01));
        assert!(!schedule.tiers().iter().any(|t| t.contains(dec!(670.005))));
    }

    #[test]
    fn tier_rejects_unknown_keys() {
        let result = serde_json::from_str::<ContributionTier>(
            r#"{ "income_min": 0, "income_max": 670, "quoat": 220 }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn rejects_inverted_tier() {
        let result = ContributionSchedule::new(vec![tier(dec!(900), dec!(670), dec!(200))], dec!(590));

        assert!(matches!(result, Err(TableError::InvertedTier { index: 0, .. })));
    }

    #[test]
    fn rejects_unordered_tiers() {
        let result = ContributionSchedule::new(
            vec![
                tier(dec!(670), dec!(900), dec!(220)),
                tier(dec!(0), dec!(670), dec!(200)),
            ],
            dec!(590),
        );

        assert!(matches!(result, Err(TableError::TiersNotIncreasing { index: 1, .. })));
    }

    #[test]
    fn rejects_negative_fallback() {
        let result = ContributionSchedule::new(vec![tier(dec!(0), dec!(670), dec!(200))], dec!(-1));

        assert_eq!(result, Err(TableError::NegativeQuota(dec!(-1))));
    }

    #[test]
    fn rejects_empty_schedule() {
        assert_eq!(ContributionSchedule::new(vec![], dec!(590)), Err(TableError::Empty));
    }
}
