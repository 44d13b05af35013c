#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use roulement::{
    detect_conflicts, Absence, AbsenceKind, AbsenceStatus, EmployeeId, PlanError,
    SchedulingLimits, Shift, ShiftProposal, ShiftStatus,
};

#[test]
fn proposed_start_inside_existing_interval() {
    // Shift existant 09:30-11:00, proposition 09:00-10:00 : chevauchement.
    let emp = EmployeeId::random();
    let existing = shift(&emp, 8, (9, 30), (11, 0));
    let report = detect_conflicts(
        &[existing.clone()],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 10, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert_eq!(report.overlapping_shifts.len(), 1);
    assert_eq!(report.overlapping_shifts[0].id, existing.id);
}

#[test]
fn identical_shift_always_reported() {
    let emp = EmployeeId::random();
    let existing = shift(&emp, 8, (9, 0), (17, 0));
    let report = detect_conflicts(
        &[existing],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 17, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert!(!report.overlapping_shifts.is_empty());
}

#[test]
fn excluded_shift_does_not_conflict_with_itself() {
    // Re-validation d'une édition : le shift édité s'exclut lui-même.
    let emp = EmployeeId::random();
    let existing = shift(&emp, 8, (9, 0), (17, 0));
    let report = detect_conflicts(
        &[existing.clone()],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 10, 0),
            end: at(8, 16, 0),
            exclude: Some(&existing.id),
        },
    )
    .unwrap();

    assert!(report.is_empty());
}

#[test]
fn cancelled_and_draft_shifts_are_ignored() {
    let emp = EmployeeId::random();
    let mut cancelled = shift(&emp, 8, (9, 0), (17, 0));
    cancelled.status = ShiftStatus::Cancelled;
    let mut draft = shift(&emp, 8, (9, 0), (17, 0));
    draft.status = ShiftStatus::Draft;

    let report = detect_conflicts(
        &[cancelled, draft],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 17, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert!(report.is_empty());
}

#[test]
fn other_employee_shifts_do_not_conflict() {
    let emp = EmployeeId::random();
    let other = EmployeeId::random();
    let existing = shift(&other, 8, (9, 0), (17, 0));
    let report = detect_conflicts(
        &[existing],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 17, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert!(report.is_empty());
}

#[test]
fn approved_absence_blocks_the_date() {
    let emp = EmployeeId::random();
    let approved = Absence::new(
        emp.clone(),
        date(7),
        date(9),
        AbsenceStatus::Approved,
        AbsenceKind::Vacation,
    )
    .unwrap();
    let pending = Absence::new(
        emp.clone(),
        date(7),
        date(9),
        AbsenceStatus::Pending,
        AbsenceKind::Sick,
    )
    .unwrap();

    let report = detect_conflicts(
        &[],
        &[approved, pending],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 17, 0),
            exclude: None,
        },
    )
    .unwrap();

    // Seule l'absence approuvée est visible.
    assert_eq!(report.absences.len(), 1);
    assert!(report.absences[0].is_approved());
}

#[test]
fn rest_violation_reports_boundaries_and_gap() {
    // Fin la veille à 22:00, reprise à 06:00 : 8h < 11h de repos.
    let emp = EmployeeId::random();
    let previous = shift(&emp, 7, (14, 0), (22, 0));
    let report = detect_conflicts(
        &[previous.clone()],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 6, 0),
            end: at(8, 12, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert_eq!(report.rest_violations.len(), 1);
    let violation = &report.rest_violations[0];
    assert_eq!(violation.previous_shift, previous.id);
    assert_eq!(violation.previous_end, at(7, 22, 0));
    assert_eq!(violation.proposed_start, at(8, 6, 0));
    assert_eq!(violation.gap_minutes, 8 * 60);
    assert_eq!(violation.required_minutes, 11 * 60);
}

#[test]
fn nearest_prior_shift_wins_the_rest_check() {
    // Deux shifts antérieurs : seul le plus proche (date puis fin) compte.
    let emp = EmployeeId::random();
    let old = shift(&emp, 5, (8, 0), (16, 0));
    let near = shift(&emp, 7, (14, 0), (23, 0));
    let report = detect_conflicts(
        &[old, near.clone()],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 6, 0),
            end: at(8, 12, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert_eq!(report.rest_violations.len(), 1);
    assert_eq!(report.rest_violations[0].previous_shift, near.id);
}

#[test]
fn sufficient_rest_is_clean() {
    let emp = EmployeeId::random();
    let previous = shift(&emp, 7, (8, 0), (16, 0));
    let report = detect_conflicts(
        &[previous],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 9, 0),
            end: at(8, 17, 0),
            exclude: None,
        },
    )
    .unwrap();

    assert!(report.is_empty());
}

#[test]
fn inverted_time_range_is_a_validation_error() {
    let emp = EmployeeId::random();
    let err = detect_conflicts(
        &[],
        &[],
        &SchedulingLimits::default(),
        &ShiftProposal {
            employee: &emp,
            date: date(8),
            start: at(8, 17, 0),
            end: at(8, 9, 0),
            exclude: None,
        },
    )
    .unwrap_err();

    assert!(matches!(err, PlanError::InvalidTimeRange));
}

// ---- helpers ----

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

fn at(d: u32, h: u32, m: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, d, h, m, 0).unwrap()
}

fn shift(employee: &EmployeeId, d: u32, start: (u32, u32), end: (u32, u32)) -> Shift {
    Shift::new(
        employee.clone(),
        date(d),
        at(d, start.0, start.1),
        at(d, end.0, end.1),
    )
    .unwrap()
}
