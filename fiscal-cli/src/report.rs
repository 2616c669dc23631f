//! Plain-text rendering of a simulation outcome.
//!
//! Amounts are rounded half away from zero to two decimals here and only
//! here; the underlying results keep full precision.

use std::fmt;

use fiscal_core::Regime;
use fiscal_core::calculations::common::round_half_up;
use rust_decimal::Decimal;

use crate::app::Outcome;

const LABEL_WIDTH: usize = 24;
const COLUMN_WIDTH: usize = 16;

fn money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Side-by-side report of the three regimes and the expense analysis.
pub struct Report<'a> {
    outcome: &'a Outcome,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a Outcome) -> Self {
        Self { outcome }
    }

    fn row(
        f: &mut fmt::Formatter<'_>,
        label: &str,
        values: [Decimal; 3],
    ) -> fmt::Result {
        write!(f, "{label:<LABEL_WIDTH$}")?;
        for value in values {
            write!(f, "{:>COLUMN_WIDTH$}", money(value))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let sim = &self.outcome.simulation;
        let (employee, freelancer, company) = (&sim.employee, &sim.freelancer, &sim.company);

        if sim.applied_region == sim.input.region {
            writeln!(f, "Region: {}", sim.applied_region)?;
        } else {
            writeln!(
                f,
                "Region: {} (not in reference data, using {})",
                sim.input.region, sim.applied_region
            )?;
        }
        writeln!(f)?;

        write!(f, "{:<LABEL_WIDTH$}", "")?;
        for regime in Regime::ALL {
            write!(f, "{:>COLUMN_WIDTH$}", regime.label())?;
        }
        writeln!(f)?;

        Self::row(
            f,
            "Gross / revenue",
            [employee.gross, freelancer.revenue, company.revenue],
        )?;
        Self::row(
            f,
            "Deductible expenses",
            [
                Decimal::ZERO,
                freelancer.deductible_expenses,
                company.deductible_expenses,
            ],
        )?;
        Self::row(
            f,
            "Social contributions",
            [
                employee.contribution,
                freelancer.annual_quota,
                company.corporate_contribution,
            ],
        )?;
        Self::row(
            f,
            "Taxable base",
            [
                employee.taxable_base,
                freelancer.taxable_base,
                company.profit_base,
            ],
        )?;
        Self::row(
            f,
            "Taxes",
            [
                employee.total_tax,
                freelancer.total_tax,
                company.corporate_tax + company.dividend_tax + company.administrator_salary_tax,
            ],
        )?;
        Self::row(f, "Net", [employee.net, freelancer.net, company.net])?;
        writeln!(f)?;

        if !employee.personal_expenses.is_zero() {
            writeln!(
                f,
                "Employee net includes {} of personal expenses (official net {}).",
                money(employee.personal_expenses),
                money(employee.official_net)
            )?;
        }
        if !company.administrator_salary_gross.is_zero() {
            writeln!(
                f,
                "Limited company net includes an administrator salary of {} ({} after tax).",
                money(company.administrator_salary_gross),
                money(company.administrator_salary_net)
            )?;
        }

        let best = self.outcome.best_regime;
        write!(f, "Best regime: {best}")?;
        if best != Regime::Employee {
            write!(f, " (+{} vs employee)", money(sim.difference_vs_employee(best)))?;
        }
        writeln!(f)?;

        let classification = &self.outcome.classification;
        if classification.expenses.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(
            f,
            "Expense analysis: risk {}/10, deductible {}",
            classification.risk_score,
            money(classification.total_deductible)
        )?;
        for expense in &classification.expenses {
            writeln!(
                f,
                "  {:<30}{:>12}  {:<18} {}",
                expense.description,
                money(expense.amount),
                expense.category.label(),
                expense.reason
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fiscal_core::expenses::{Expense, ExpenseLedger, KeywordClassifier};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::app::{SimulationRequest, run};

    async fn outcome(
        region: &str,
        expenses: ExpenseLedger,
    ) -> Outcome {
        let data = fiscal_data::parse_dataset(include_str!("../../data/tax_data.toml"))
            .expect("shipped dataset should parse");
        let request = SimulationRequest {
            gross_salary: dec!(30000),
            employee_contribution: Some(dec!(1905)),
            company_contribution: None,
            personal_expenses: Some(dec!(0)),
            freelancer_revenue: None,
            expenses,
            activity_code: "6201".to_string(),
            region: region.to_string(),
            is_new_company: false,
            administrator_salary: dec!(0),
        };
        run(&request, &data, &KeywordClassifier::default())
            .await
            .expect("request should run")
    }

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(money(dec!(2647.09393)), "2647.09");
        assert_eq!(money(dec!(0.005)), "0.01");
        assert_eq!(money(dec!(-1500)), "-1500.00");
    }

    #[tokio::test]
    async fn report_shows_rounded_nets_side_by_side() {
        let outcome = outcome("Madrid", ExpenseLedger::new()).await;

        let text = Report::new(&outcome).to_string();

        assert!(text.starts_with("Region: Madrid\n"));
        assert!(text.contains("Employee"));
        assert!(text.contains("Limited company"));
        // Employee net for 30000 gross in Madrid
        assert!(text.contains("22450.91"));
        assert!(text.contains("Best regime:"));
        assert!(!text.contains("Expense analysis"));
    }

    #[tokio::test]
    async fn report_names_fallback_region() {
        let outcome = outcome("Melilla", ExpenseLedger::new()).await;

        let text = Report::new(&outcome).to_string();

        assert!(text.starts_with(
            "Region: Melilla (not in reference data, using Otros (Ceuta/Melilla/Resto))"
        ));
    }

    #[tokio::test]
    async fn report_lists_classified_expenses() {
        let mut expenses = ExpenseLedger::new();
        expenses
            .add(Expense::new("Comida cliente", dec!(150)))
            .unwrap();
        let outcome = outcome("Madrid", expenses).await;

        let text = Report::new(&outcome).to_string();

        assert!(text.contains("Expense analysis: risk 10/10, deductible 150.00"));
        assert!(text.contains("Comida cliente"));
        assert!(text.contains("conflictive"));
    }
}
