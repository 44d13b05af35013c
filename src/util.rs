use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Test de chevauchement standard sur intervalles semi-ouverts [start, end).
pub(crate) fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Construit les instants absolus d'un créneau ; une fin <= début passe au
/// jour suivant (créneau de nuit).
pub(crate) fn slot_instants(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_dt = Utc.from_utc_datetime(&NaiveDateTime::new(date, start_time));
    let mut end_date = date;
    if end_time <= start_time {
        end_date = end_date.succ_opt().unwrap_or(end_date);
    }
    let end_dt = Utc.from_utc_datetime(&NaiveDateTime::new(end_date, end_time));
    (start_dt, end_dt)
}
