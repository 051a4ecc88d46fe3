use crate::model::{EmployeeId, ShiftId};
use thiserror::Error;

/// Écart de score en dessous duquel deux candidats sont considérés égaux.
pub const SCORE_TIE_EPSILON: f64 = 0.01;

/// Proposition (shift, employé) retenue par le moteur.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Position du shift dans la tranche passée au moteur.
    pub shift_index: usize,
    pub shift_id: ShiftId,
    pub employee_id: EmployeeId,
    pub score: f64,
}

/// Résultat d'un passage du moteur : propositions dans l'ordre de
/// traitement, et shifts laissés vides faute de candidat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRun {
    pub proposals: Vec<Proposal>,
    pub unfilled: Vec<ShiftId>,
}

impl MatchRun {
    /// `true` = « aucune assignation effectuée ».
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("{employee} is not available for the {shift} shift")]
    AssignmentNotAvailable { employee: String, shift: String },
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("duplicate employee id: {0}")]
    DuplicateEmployee(String),
    #[error("invalid employee: {0}")]
    InvalidEmployee(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
