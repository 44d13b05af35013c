use crate::model::{AvailabilityProfile, Booking, BookingStatus, CustomerId, EmployeeId};
use crate::util;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Fenêtre glissante par défaut de `RoundRobin`, en jours.
pub const DEFAULT_ROTATION_WINDOW_DAYS: i64 = 30;

/// Une des cinq politiques interchangeables de choix d'un employé pour un
/// rendez-vous unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentStrategy {
    /// Premier candidat libre (maximise les prises de rendez-vous).
    Availability,
    /// Le moins chargé sur la journée demandée. Stratégie par défaut.
    WorkloadBalance,
    /// Charge glissante normalisée par le taux d'activité : un employé à
    /// 10 % tolère 10 fois moins de rendez-vous qu'un plein temps.
    RoundRobin { window_days: i64 },
    /// Liste de priorité explicite ; repli sur le premier candidat.
    Priority { order: Vec<EmployeeId> },
    /// Même employé que le dernier rendez-vous terminé/payé du client ;
    /// repli sur l'ordre de `WorkloadBalance`.
    SameEmployee,
}

impl Default for AssignmentStrategy {
    fn default() -> Self {
        AssignmentStrategy::WorkloadBalance
    }
}

/// Contexte de sélection : le créneau demandé et les instantanés externes.
#[derive(Debug, Clone)]
pub struct SelectionContext<'a> {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Rendez-vous existants (tous employés confondus).
    pub bookings: &'a [Booking],
    pub profiles: &'a [AvailabilityProfile],
    pub customer: Option<&'a CustomerId>,
}

/// Écarte du pool les employés dont un rendez-vous existant du jour chevauche
/// le créneau demandé. Même test de chevauchement que la détection de conflits.
pub fn filter_candidates(pool: &[EmployeeId], ctx: &SelectionContext<'_>) -> Vec<EmployeeId> {
    pool.iter()
        .filter(|employee| {
            !ctx.bookings.iter().any(|b| {
                b.status != BookingStatus::Cancelled
                    && b.employee.as_ref() == Some(*employee)
                    && b.start.date_naive() == ctx.date
                    && util::overlaps(b.start, b.end(), ctx.start, ctx.end)
            })
        })
        .cloned()
        .collect()
}

/// Applique la stratégie sur des candidats déjà filtrés des conflits.
///
/// `None` n'est jamais une erreur : un rendez-vous sans employé reste valide,
/// en attente d'affectation manuelle.
pub fn select(
    strategy: &AssignmentStrategy,
    candidates: &[EmployeeId],
    ctx: &SelectionContext<'_>,
) -> Option<EmployeeId> {
    if candidates.is_empty() {
        return None;
    }
    match strategy {
        AssignmentStrategy::Availability => candidates.first().cloned(),
        AssignmentStrategy::WorkloadBalance => workload_balance(candidates, ctx),
        AssignmentStrategy::RoundRobin { window_days } => {
            round_robin(candidates, ctx, *window_days)
        }
        AssignmentStrategy::Priority { order } => order
            .iter()
            .find(|id| candidates.contains(id))
            .cloned()
            .or_else(|| candidates.first().cloned()),
        AssignmentStrategy::SameEmployee => same_employee(candidates, ctx),
    }
}

/// Point d'entrée côté réservation : ne tourne que si le rendez-vous n'a pas
/// déjà un employé imposé.
pub fn select_for_booking(
    booking: &Booking,
    pool: &[EmployeeId],
    strategy: &AssignmentStrategy,
    ctx: &SelectionContext<'_>,
) -> Option<EmployeeId> {
    if let Some(preset) = booking.employee.as_ref() {
        return Some(preset.clone());
    }
    let candidates = filter_candidates(pool, ctx);
    select(strategy, &candidates, ctx)
}

/// Nombre de rendez-vous actifs du candidat sur la journée demandée.
fn day_count(ctx: &SelectionContext<'_>, employee: &EmployeeId) -> usize {
    ctx.bookings
        .iter()
        .filter(|b| {
            b.status != BookingStatus::Cancelled
                && b.employee.as_ref() == Some(employee)
                && b.start.date_naive() == ctx.date
        })
        .count()
}

fn workload_balance(candidates: &[EmployeeId], ctx: &SelectionContext<'_>) -> Option<EmployeeId> {
    // Tri stable : à charge égale, l'ordre d'entrée départage.
    let mut ranked: Vec<&EmployeeId> = candidates.iter().collect();
    ranked.sort_by_key(|e| day_count(ctx, e));
    ranked.first().map(|e| (*e).clone())
}

/// Rendez-vous actifs du candidat dans la fenêtre glissante précédant le
/// créneau demandé.
fn trailing_count(ctx: &SelectionContext<'_>, employee: &EmployeeId, window_days: i64) -> i64 {
    let floor = ctx.start - Duration::days(window_days);
    ctx.bookings
        .iter()
        .filter(|b| {
            b.status != BookingStatus::Cancelled
                && b.employee.as_ref() == Some(employee)
                && b.start > floor
                && b.start <= ctx.start
        })
        .count() as i64
}

fn workload_percent(ctx: &SelectionContext<'_>, employee: &EmployeeId) -> i64 {
    ctx.profiles
        .iter()
        .find(|p| &p.employee == employee)
        .map(|p| i64::from(p.workload_percent))
        .unwrap_or(100)
}

/// Charge normalisée `count / (percent / 100)`, comparée en produits croisés
/// pour rester entière. Un taux de 0 % vaut +infini : jamais choisi ici.
fn round_robin(
    candidates: &[EmployeeId],
    ctx: &SelectionContext<'_>,
    window_days: i64,
) -> Option<EmployeeId> {
    let mut best: Option<(&EmployeeId, i64, i64)> = None;
    for candidate in candidates {
        let percent = workload_percent(ctx, candidate);
        if percent == 0 {
            continue;
        }
        let count = trailing_count(ctx, candidate, window_days);
        match best {
            // count/percent < best_count/best_percent, sans division
            Some((_, best_count, best_percent))
                if count * best_percent >= best_count * percent => {}
            _ => best = Some((candidate, count, percent)),
        }
    }
    best.map(|(e, _, _)| e.clone())
}

fn same_employee(candidates: &[EmployeeId], ctx: &SelectionContext<'_>) -> Option<EmployeeId> {
    if let Some(customer) = ctx.customer {
        let last = ctx
            .bookings
            .iter()
            .filter(|b| {
                b.customer.as_ref() == Some(customer)
                    && b.employee.is_some()
                    && matches!(b.status, BookingStatus::Completed | BookingStatus::Paid)
            })
            .max_by_key(|b| b.start);

        if let Some(previous) = last.and_then(|b| b.employee.as_ref()) {
            if candidates.contains(previous) {
                return Some(previous.clone());
            }
        }
    }
    workload_balance(candidates, ctx)
}
