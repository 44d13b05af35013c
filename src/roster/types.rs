use crate::model::{EmployeeId, TemplateId};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statut d'une ligne du plan : affectée, ou demande restée ouverte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Assigned,
    Open,
}

/// Ligne du plan généré. `employee = None, status = Open` est un état
/// terminal attendu (demande non couverte), pas une erreur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub template: TemplateId,
    pub role: String,
    pub employee: Option<EmployeeId>,
    pub status: AssignmentStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl RosterAssignment {
    pub fn is_open(&self) -> bool {
        self.status == AssignmentStatus::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterStatus {
    Draft,
    Published,
}

/// Plan daté d'affectations + métadonnées de cycle de vie.
///
/// Une régénération remplace le roster entier et repart en `Draft` ;
/// la publication est une action explicite distincte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: RosterStatus,
    pub assignments: Vec<RosterAssignment>,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_by: Option<String>,
}

impl Roster {
    pub fn assigned_rows(&self) -> impl Iterator<Item = &RosterAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::Assigned)
    }

    pub fn open_rows(&self) -> impl Iterator<Item = &RosterAssignment> {
        self.assignments.iter().filter(|a| a.is_open())
    }
}

/// Motif de refus d'un couple (employé, créneau). Issue normale du
/// prédicat de contraintes, jamais une erreur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    RoleMismatch,
    UnavailableWeekday,
    Absent,
    TemplateNotPreferred,
    WeeklyCapExceeded,
    DailyCapExceeded,
    InsufficientRest,
}

/// Verdict du prédicat de contraintes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject(RejectReason),
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid period: end must not precede start")]
    InvalidPeriod,
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("cannot publish a roster without assignments")]
    EmptyRoster,
    #[error("roster status conflict: expected {expected:?}, found {actual:?}")]
    StatusConflict {
        expected: RosterStatus,
        actual: RosterStatus,
    },
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
