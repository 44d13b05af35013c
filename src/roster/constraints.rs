use super::availability::AvailabilityIndex;
use super::ledger::HourLedger;
use super::types::{Decision, RejectReason};
use crate::model::{AvailabilityProfile, SchedulingLimits, TemplateId};
use chrono::{DateTime, NaiveDate, Utc, Weekday};

/// Une unité de demande à couvrir : un rôle d'un template, un jour donné.
#[derive(Debug, Clone)]
pub struct DemandSlot<'a> {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub template: &'a TemplateId,
    pub role: &'a str,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DemandSlot<'_> {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Prédicat pur d'acceptation d'un couple (employé, créneau).
///
/// Les motifs sont testés dans un ordre fixe ; le premier échec gagne
/// (l'ordre sert au diagnostic). Aucun effet de bord : c'est l'appelant
/// qui met le ledger à jour en cas d'acceptation.
pub fn evaluate(
    profile: &AvailabilityProfile,
    slot: &DemandSlot<'_>,
    index: &AvailabilityIndex<'_>,
    ledger: &HourLedger,
    limits: &SchedulingLimits,
) -> Decision {
    if !profile.has_role(slot.role) {
        return Decision::Reject(RejectReason::RoleMismatch);
    }
    if profile.unavailable_weekdays.contains(&slot.weekday) {
        return Decision::Reject(RejectReason::UnavailableWeekday);
    }
    if index.is_absent(&profile.employee, slot.date) {
        return Decision::Reject(RejectReason::Absent);
    }
    if !profile.accepts_template(slot.template) {
        return Decision::Reject(RejectReason::TemplateNotPreferred);
    }

    let duration = slot.duration_minutes();

    // Plafond hebdo : le plus contraignant de la capacité de l'employé et
    // du plafond tenant. L'heure sup le lève, le repos jamais.
    if !limits.allow_overtime {
        let weekly_cap =
            i64::from(profile.weekly_hours.min(limits.max_hours_per_week)) * 60;
        if ledger.week_minutes(&profile.employee, slot.date) + duration > weekly_cap {
            return Decision::Reject(RejectReason::WeeklyCapExceeded);
        }
        let daily_cap = i64::from(limits.max_hours_per_day) * 60;
        if ledger.day_minutes(&profile.employee, slot.date) + duration > daily_cap {
            return Decision::Reject(RejectReason::DailyCapExceeded);
        }
    }

    if let Some(prev_end) = ledger.last_shift_end(&profile.employee) {
        let rest = (slot.start - prev_end).num_minutes();
        if rest < i64::from(limits.min_rest_hours) * 60 {
            return Decision::Reject(RejectReason::InsufficientRest);
        }
    }

    Decision::Accept
}
