use crate::model::{Absence, AvailabilityProfile, EmployeeId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Vue indexée des profils et absences pour une passe de génération.
///
/// L'ordre de fourniture des profils est conservé : c'est lui qui départage
/// les candidats à égalité (first-fit stable).
#[derive(Debug)]
pub struct AvailabilityIndex<'a> {
    profiles: Vec<&'a AvailabilityProfile>,
    absences: HashMap<&'a EmployeeId, Vec<(NaiveDate, NaiveDate)>>,
}

impl<'a> AvailabilityIndex<'a> {
    /// Seules les absences approuvées entrent dans l'index ; les absences
    /// en attente ou refusées sont invisibles pour le moteur.
    pub fn new(profiles: &'a [AvailabilityProfile], absences: &'a [Absence]) -> Self {
        let mut by_employee: HashMap<&'a EmployeeId, Vec<(NaiveDate, NaiveDate)>> = HashMap::new();
        for absence in absences.iter().filter(|a| a.is_approved()) {
            by_employee
                .entry(&absence.employee)
                .or_default()
                .push((absence.start_date, absence.end_date));
        }
        Self {
            profiles: profiles.iter().collect(),
            absences: by_employee,
        }
    }

    /// Itère les profils dans l'ordre de fourniture.
    pub fn profiles(&self) -> impl Iterator<Item = &'a AvailabilityProfile> + '_ {
        self.profiles.iter().copied()
    }

    pub fn profile(&self, id: &EmployeeId) -> Option<&'a AvailabilityProfile> {
        self.profiles.iter().copied().find(|p| &p.employee == id)
    }

    pub fn is_absent(&self, id: &EmployeeId, date: NaiveDate) -> bool {
        self.absences
            .get(id)
            .map(|ranges| ranges.iter().any(|(s, e)| *s <= date && date <= *e))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
