use super::types::{PlanError, Roster, RosterAssignment, RosterStatus};
use crate::model::EmployeeId;
use chrono::{DateTime, Utc};

/// Charge utile de notification d'une publication : une entrée par employé
/// affecté, portant la liste complète de ses lignes pour la période.
#[derive(Debug, Clone)]
pub struct PublishDispatch {
    pub employee: EmployeeId,
    pub assignments: Vec<RosterAssignment>,
}

/// Publie un roster brouillon.
///
/// Précondition vérifiée façon compare-and-set : la transition n'a lieu que
/// si le statut courant est `Draft`. Publier un roster déjà publié échoue
/// sans toucher `published_at` / `published_by`. Les lignes `Open` ne
/// produisent jamais de dispatch.
///
/// La livraison effective des dispatches est externe ; un renvoi après échec
/// partiel est acceptable (at-least-once assumé : un doublon vaut mieux
/// qu'une notification perdue).
pub fn publish(
    roster: &mut Roster,
    actor: &str,
    at: DateTime<Utc>,
) -> Result<Vec<PublishDispatch>, PlanError> {
    if roster.status != RosterStatus::Draft {
        return Err(PlanError::StatusConflict {
            expected: RosterStatus::Draft,
            actual: roster.status,
        });
    }
    if roster.assignments.is_empty() {
        return Err(PlanError::EmptyRoster);
    }

    let dispatches = group_by_employee(&roster.assignments);

    roster.status = RosterStatus::Published;
    roster.published_at = Some(at);
    roster.published_by = Some(actor.to_owned());

    Ok(dispatches)
}

/// Repasse un roster publié en brouillon sans toucher aux affectations.
/// Dépublier un brouillon est une erreur explicite, pas un no-op silencieux.
pub fn unpublish(roster: &mut Roster) -> Result<(), PlanError> {
    if roster.status != RosterStatus::Published {
        return Err(PlanError::StatusConflict {
            expected: RosterStatus::Published,
            actual: roster.status,
        });
    }
    roster.status = RosterStatus::Draft;
    roster.published_at = None;
    roster.published_by = None;
    Ok(())
}

/// Regroupe les lignes affectées par employé, dans l'ordre du plan.
fn group_by_employee(assignments: &[RosterAssignment]) -> Vec<PublishDispatch> {
    let mut dispatches: Vec<PublishDispatch> = Vec::new();
    for row in assignments {
        let Some(employee) = row.employee.as_ref() else {
            continue;
        };
        match dispatches.iter_mut().find(|d| &d.employee == employee) {
            Some(dispatch) => dispatch.assignments.push(row.clone()),
            None => dispatches.push(PublishDispatch {
                employee: employee.clone(),
                assignments: vec![row.clone()],
            }),
        }
    }
    dispatches
}
