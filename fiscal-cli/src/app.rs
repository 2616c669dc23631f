//! Request handling: validate user input, classify expenses, and run the
//! regime simulation.

use std::path::PathBuf;

use fiscal_core::calculations::RegimeSimulator;
use fiscal_core::expenses::{
    ClassifiedExpenses, ClassifierError, ExpenseClassifier, ExpenseLedger,
};
use fiscal_core::{
    EngineParameters, FallbackSource, ReferenceData, ReferenceDataSource, Regime,
    SimulationInput, SimulationResult,
};
use fiscal_data::TomlFileSource;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning a request into a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("gross salary {gross} is below the minimum of {minimum}")]
    GrossBelowMinimum { gross: Decimal, minimum: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("activity code must not be empty")]
    EmptyActivityCode,

    #[error("expense classification failed: {0}")]
    Classification(#[from] ClassifierError),
}

/// One simulation request as entered by the user.
///
/// Optional amounts are estimated when absent: contributions from the
/// parameter rates, freelancer revenue from the gross salary, and personal
/// expenses from the ledger entries flagged as also paid when salaried.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub gross_salary: Decimal,
    pub employee_contribution: Option<Decimal>,
    pub company_contribution: Option<Decimal>,
    pub personal_expenses: Option<Decimal>,
    pub freelancer_revenue: Option<Decimal>,
    pub expenses: ExpenseLedger,
    pub activity_code: String,
    pub region: String,
    pub is_new_company: bool,
    pub administrator_salary: Decimal,
}

impl SimulationRequest {
    /// Checks the request against the loaded parameters.
    ///
    /// Expense amounts are not rechecked: the ledger only holds positive
    /// amounts.
    pub fn validate(
        &self,
        params: &EngineParameters,
    ) -> Result<(), RequestError> {
        if self.gross_salary <= Decimal::ZERO || self.gross_salary < params.minimum_gross_salary {
            return Err(RequestError::GrossBelowMinimum {
                gross: self.gross_salary,
                minimum: params.minimum_gross_salary,
            });
        }

        let amounts = [
            ("employee contribution", self.employee_contribution),
            ("company contribution", self.company_contribution),
            ("personal expenses", self.personal_expenses),
            ("freelancer revenue", self.freelancer_revenue),
            ("administrator salary", Some(self.administrator_salary)),
        ];
        for (field, value) in amounts {
            if let Some(value) = value.filter(|v| *v < Decimal::ZERO) {
                return Err(RequestError::NegativeAmount { field, value });
            }
        }

        if self.activity_code.trim().is_empty() {
            return Err(RequestError::EmptyActivityCode);
        }
        Ok(())
    }

    /// Builds the engine input once expenses have been classified.
    pub fn to_input(
        &self,
        classified: &ClassifiedExpenses,
        params: &EngineParameters,
    ) -> SimulationInput {
        let estimated = SimulationInput::with_estimated_contributions(
            self.gross_salary,
            self.region.clone(),
            params,
        );

        SimulationInput {
            employee_contribution: self
                .employee_contribution
                .unwrap_or(estimated.employee_contribution),
            company_contribution: self
                .company_contribution
                .unwrap_or(estimated.company_contribution),
            personal_expenses: self
                .personal_expenses
                .unwrap_or_else(|| self.expenses.personal_total()),
            freelancer_revenue: self.freelancer_revenue.unwrap_or(self.gross_salary),
            freelancer_expenses: classified.total_deductible,
            is_new_company: self.is_new_company,
            administrator_salary: self.administrator_salary,
            ..estimated
        }
    }
}

/// Simulation result together with the expense analysis that fed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub best_regime: Regime,
    pub simulation: SimulationResult,
    pub classification: ClassifiedExpenses,
}

/// Validates `request`, classifies its expenses, and simulates all three
/// regimes.
pub async fn run(
    request: &SimulationRequest,
    data: &ReferenceData,
    classifier: &dyn ExpenseClassifier,
) -> Result<Outcome, RequestError> {
    request.validate(&data.parameters)?;

    let classification = classifier
        .classify(request.expenses.as_slice(), &request.activity_code)
        .await?;
    let input = request.to_input(&classification, &data.parameters);
    debug!(
        region = %input.region,
        deductible = %input.freelancer_expenses,
        "running simulation"
    );

    let simulation = RegimeSimulator::from_reference(data).simulate(&input);

    Ok(Outcome {
        best_regime: simulation.best_regime(),
        simulation,
        classification,
    })
}

/// Builds the reference data source: the dataset file, optionally backed by
/// a second dataset used when the first cannot be loaded.
pub fn build_source(
    data: PathBuf,
    fallback: Option<PathBuf>,
    brackets: Option<PathBuf>,
) -> Box<dyn ReferenceDataSource> {
    let with_brackets = |source: TomlFileSource| match &brackets {
        Some(csv) => source.with_bracket_csv(csv),
        None => source,
    };

    let primary = with_brackets(TomlFileSource::new(data));
    match fallback {
        Some(path) => Box::new(FallbackSource::new(
            Box::new(primary),
            Box::new(with_brackets(TomlFileSource::new(path))),
        )),
        None => Box::new(primary),
    }
}
