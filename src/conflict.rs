use crate::model::{Absence, EmployeeId, SchedulingLimits, Shift, ShiftId, ShiftStatus};
use crate::roster::PlanError;
use crate::util;
use chrono::{DateTime, NaiveDate, Utc};

/// Shift proposé (création ou édition) à valider avant écriture.
#[derive(Debug, Clone)]
pub struct ShiftProposal<'a> {
    pub employee: &'a EmployeeId,
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Exclut le shift édité de sa propre re-validation.
    pub exclude: Option<&'a ShiftId>,
}

/// Violation du repos minimal, avec les deux bornes et l'écart constaté.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestViolation {
    pub previous_shift: ShiftId,
    pub previous_end: DateTime<Utc>,
    pub proposed_start: DateTime<Utc>,
    pub gap_minutes: i64,
    pub required_minutes: i64,
}

/// Rapport de conflits. Toute liste non vide doit faire refuser l'écriture
/// par l'appelant ; le détecteur ne résout rien lui-même.
#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    pub overlapping_shifts: Vec<Shift>,
    pub absences: Vec<Absence>,
    pub rest_violations: Vec<RestViolation>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.overlapping_shifts.is_empty()
            && self.absences.is_empty()
            && self.rest_violations.is_empty()
    }
}

/// Vérifie un shift proposé contre les shifts persistés, les absences
/// approuvées et le repos minimal.
///
/// Pré-contrôle synchrone uniquement : sous créations concurrentes, deux
/// propositions peuvent passer sur le même instantané périmé. La garantie
/// finale revient à la contrainte d'unicité du store à l'écriture.
pub fn detect_conflicts(
    shifts: &[Shift],
    absences: &[Absence],
    limits: &SchedulingLimits,
    proposal: &ShiftProposal<'_>,
) -> Result<ConflictReport, PlanError> {
    if proposal.end <= proposal.start {
        return Err(PlanError::InvalidTimeRange);
    }

    let mut report = ConflictReport::default();

    // Seuls les shifts actifs comptent : ni annulés, ni brouillons.
    let relevant = |s: &&Shift| {
        s.employee == *proposal.employee
            && s.status != ShiftStatus::Cancelled
            && s.status != ShiftStatus::Draft
            && proposal.exclude != Some(&s.id)
    };

    for shift in shifts.iter().filter(relevant) {
        if shift.date == proposal.date
            && util::overlaps(shift.start, shift.end, proposal.start, proposal.end)
        {
            report.overlapping_shifts.push(shift.clone());
        }
    }

    for absence in absences.iter() {
        if absence.employee == *proposal.employee
            && absence.is_approved()
            && absence.covers(proposal.date)
        {
            report.absences.push(absence.clone());
        }
    }

    // Shift précédent le plus proche : date puis heure de fin, décroissantes.
    let previous = shifts
        .iter()
        .filter(relevant)
        .filter(|s| s.end <= proposal.start)
        .max_by_key(|s| (s.date, s.end));

    if let Some(prev) = previous {
        let required = i64::from(limits.min_rest_hours) * 60;
        let gap = (proposal.start - prev.end).num_minutes();
        if gap < required {
            report.rest_violations.push(RestViolation {
                previous_shift: prev.id.clone(),
                previous_end: prev.end,
                proposed_start: proposal.start,
                gap_minutes: gap,
                required_minutes: required,
            });
        }
    }

    Ok(report)
}
