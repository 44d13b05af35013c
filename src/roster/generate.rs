use super::availability::AvailabilityIndex;
use super::constraints::{evaluate, DemandSlot};
use super::ledger::HourLedger;
use super::types::{AssignmentStatus, PlanError, Roster, RosterAssignment, RosterStatus};
use crate::model::{Absence, AvailabilityProfile, SchedulingLimits, ShiftTemplate};
use crate::util;
use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Génère un plan d'affectation glouton first-fit sur `[period_start, period_end]`.
///
/// Parcours : dates croissantes, puis templates dans l'ordre fourni, puis
/// rôles dans l'ordre du template, puis chaque unité d'effectif requis. Pour
/// chaque unité, le pool est balayé dans l'ordre des profils et le premier
/// employé accepté l'emporte ; le ledger est mis à jour avant l'unité
/// suivante, ce qui répartit la charge sans optimiseur. Pas de retour en
/// arrière : une demande sans candidat devient une ligne `Open`.
///
/// Déterministe : mêmes entrées, même plan. `generated_at` est fourni par
/// l'appelant, le moteur ne lit jamais l'horloge.
pub fn generate_roster(
    templates: &[ShiftTemplate],
    profiles: &[AvailabilityProfile],
    absences: &[Absence],
    limits: &SchedulingLimits,
    period_start: NaiveDate,
    period_end: NaiveDate,
    generated_at: DateTime<Utc>,
) -> Result<Roster, PlanError> {
    if period_end < period_start {
        return Err(PlanError::InvalidPeriod);
    }
    for template in templates {
        template
            .validate()
            .map_err(|e| PlanError::InvalidTemplate(e.to_string()))?;
    }

    let index = AvailabilityIndex::new(profiles, absences);
    let mut ledger = HourLedger::new();
    let mut assignments = Vec::new();

    let mut current = period_start;
    loop {
        let weekday = current.weekday();

        for template in templates.iter().filter(|t| t.recurs_on(weekday)) {
            let (start, end) = util::slot_instants(current, template.start_time, template.end_time);

            for demand in &template.demands {
                for _ in 0..demand.required {
                    let slot = DemandSlot {
                        date: current,
                        weekday,
                        template: &template.id,
                        role: &demand.role,
                        start,
                        end,
                    };

                    let chosen = index
                        .profiles()
                        .find(|p| evaluate(p, &slot, &index, &ledger, limits).is_accept());

                    let (employee, status) = match chosen {
                        Some(profile) => {
                            ledger.record(&profile.employee, current, start, end);
                            (Some(profile.employee.clone()), AssignmentStatus::Assigned)
                        }
                        None => (None, AssignmentStatus::Open),
                    };

                    assignments.push(RosterAssignment {
                        date: current,
                        weekday,
                        template: template.id.clone(),
                        role: demand.role.clone(),
                        employee,
                        status,
                        start,
                        end,
                        duration_minutes: (end - start).num_minutes(),
                    });
                }
            }
        }

        if current == period_end {
            break;
        }
        current = current.succ_opt().context("date overflow")?;
    }

    Ok(Roster {
        period_start,
        period_end,
        status: RosterStatus::Draft,
        assignments,
        generated_at,
        published_at: None,
        published_by: None,
    })
}
