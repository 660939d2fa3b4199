use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Etapa en la que se encuentra un registro dentro de la cadena de
/// aprobación. El conjunto es cerrado: cualquier otro token se rechaza al
/// parsear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    AwaitingSecretary,
    ReturnedBySecretary,
    SentToManager,
    AwaitingManager,
    ReturnedByManager,
    SentToBranch,
    ReturnedByBranch,
    AwaitingBranch,
    ReturnedToManager,
    SentToUnit,
    ReturnedFromUnit,
    SentToInspection,
}

impl SurveyStatus {
    pub const ALL: [SurveyStatus; 12] = [SurveyStatus::AwaitingSecretary,
                                         SurveyStatus::ReturnedBySecretary,
                                         SurveyStatus::SentToManager,
                                         SurveyStatus::AwaitingManager,
                                         SurveyStatus::ReturnedByManager,
                                         SurveyStatus::SentToBranch,
                                         SurveyStatus::ReturnedByBranch,
                                         SurveyStatus::AwaitingBranch,
                                         SurveyStatus::ReturnedToManager,
                                         SurveyStatus::SentToUnit,
                                         SurveyStatus::ReturnedFromUnit,
                                         SurveyStatus::SentToInspection];

    /// Token textual tal como se persiste y exporta.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::AwaitingSecretary => "awaiting_secretary",
            SurveyStatus::ReturnedBySecretary => "returned_by_secretary",
            SurveyStatus::SentToManager => "sent_to_manager",
            SurveyStatus::AwaitingManager => "awaiting_manager",
            SurveyStatus::ReturnedByManager => "returned_by_manager",
            SurveyStatus::SentToBranch => "sent_to_branch",
            SurveyStatus::ReturnedByBranch => "returned_by_branch",
            SurveyStatus::AwaitingBranch => "awaiting_branch",
            SurveyStatus::ReturnedToManager => "returned_to_manager",
            SurveyStatus::SentToUnit => "sent_to_unit",
            SurveyStatus::ReturnedFromUnit => "returned_from_unit",
            SurveyStatus::SentToInspection => "sent_to_inspection",
        }
    }

    /// Estados "devueltos": entrar en ellos exige un motivo no vacío.
    pub fn is_returned(&self) -> bool {
        matches!(self,
                 SurveyStatus::ReturnedBySecretary
                 | SurveyStatus::ReturnedByManager
                 | SurveyStatus::ReturnedByBranch
                 | SurveyStatus::ReturnedToManager
                 | SurveyStatus::ReturnedFromUnit)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SurveyStatus::SentToInspection)
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SurveyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        SurveyStatus::ALL.iter()
                         .copied()
                         .find(|st| st.as_str() == token)
                         .ok_or_else(|| DomainError::UnknownToken(token.to_string()))
    }
}

impl Default for SurveyStatus {
    fn default() -> Self {
        SurveyStatus::AwaitingSecretary
    }
}
