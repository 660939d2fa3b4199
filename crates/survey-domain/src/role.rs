use crate::{DomainError, SurveyStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actores de la cadena de aprobación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Secretary,
    Manager,
    BranchManager,
    /// Unidad técnica a la que el director de sucursal deriva el registro.
    Unit,
    Inspection,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Secretary => "secretary",
            Role::Manager => "manager",
            Role::BranchManager => "branch_manager",
            Role::Unit => "unit",
            Role::Inspection => "inspection",
        }
    }

    /// Estados cuyos registros alimentan la estadística mensual de este rol.
    pub fn visible_statuses(&self) -> &'static [SurveyStatus] {
        match self {
            Role::Employee => &[],
            Role::Secretary => &[SurveyStatus::SentToManager],
            Role::Manager => &[SurveyStatus::SentToBranch],
            Role::BranchManager => &[SurveyStatus::SentToUnit,
                                     SurveyStatus::AwaitingBranch,
                                     SurveyStatus::SentToBranch,
                                     SurveyStatus::ReturnedByBranch,
                                     SurveyStatus::ReturnedFromUnit,
                                     SurveyStatus::ReturnedToManager,
                                     SurveyStatus::SentToInspection],
            Role::Unit => &[SurveyStatus::SentToUnit],
            Role::Inspection => &[SurveyStatus::SentToInspection],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "secretary" => Ok(Role::Secretary),
            "manager" => Ok(Role::Manager),
            // "branch" aparece en registros antiguos
            "branch_manager" | "branch" => Ok(Role::BranchManager),
            "unit" => Ok(Role::Unit),
            "inspection" => Ok(Role::Inspection),
            other => Err(DomainError::UnknownToken(other.to_string())),
        }
    }
}
