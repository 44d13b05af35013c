use crate::model::EmployeeId;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::HashMap;

/// Clé de semaine ISO (année, numéro de semaine).
type WeekKey = (i32, u32);

fn week_key(date: NaiveDate) -> WeekKey {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Accumulateur d'heures d'une seule passe de génération.
///
/// Minutes par (employé, semaine ISO), minutes par (employé, jour) et fin du
/// dernier shift affecté. Jamais réutilisé entre deux passes : aucune donnée
/// d'un roster précédent ne s'y glisse.
#[derive(Debug, Default)]
pub struct HourLedger {
    week_minutes: HashMap<(EmployeeId, WeekKey), i64>,
    day_minutes: HashMap<(EmployeeId, NaiveDate), i64>,
    last_end: HashMap<EmployeeId, DateTime<Utc>>,
}

impl HourLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn week_minutes(&self, employee: &EmployeeId, date: NaiveDate) -> i64 {
        self.week_minutes
            .get(&(employee.clone(), week_key(date)))
            .copied()
            .unwrap_or(0)
    }

    pub fn day_minutes(&self, employee: &EmployeeId, date: NaiveDate) -> i64 {
        self.day_minutes
            .get(&(employee.clone(), date))
            .copied()
            .unwrap_or(0)
    }

    pub fn last_shift_end(&self, employee: &EmployeeId) -> Option<DateTime<Utc>> {
        self.last_end.get(employee).copied()
    }

    /// Enregistre une acceptation : la charge est visible pour toutes les
    /// unités de demande suivantes de la même passe.
    pub fn record(
        &mut self,
        employee: &EmployeeId,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        let minutes = (end - start).num_minutes();
        *self
            .week_minutes
            .entry((employee.clone(), week_key(date)))
            .or_insert(0) += minutes;
        *self
            .day_minutes
            .entry((employee.clone(), date))
            .or_insert(0) += minutes;
        self.last_end
            .entry(employee.clone())
            .and_modify(|prev| *prev = (*prev).max(end))
            .or_insert(end);
    }
}
