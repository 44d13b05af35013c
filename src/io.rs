use crate::model::{Absence, AbsenceKind, AbsenceStatus, AvailabilityProfile, TemplateId};
use crate::roster::{AssignmentStatus, Roster};
use anyhow::{bail, Context};
use chrono::{NaiveDate, Weekday};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de profils depuis CSV :
/// header `name,roles,weekly_hours[,workload_percent][,unavailable_days][,preferred_templates]`.
/// Les listes utilisent `;` comme séparateur.
pub fn import_profiles_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AvailabilityProfile>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let roles_raw = rec.get(1).context("missing roles")?.trim();
        let hours_raw = rec.get(2).context("missing weekly_hours")?.trim();
        if name.is_empty() || roles_raw.is_empty() {
            bail!("invalid profile row (empty)");
        }
        let weekly_hours: u32 = hours_raw
            .parse()
            .with_context(|| format!("invalid weekly_hours for {name}"))?;

        let mut profile = AvailabilityProfile::new(name, split_list(roles_raw), weekly_hours);

        if let Some(percent) = rec.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            profile.workload_percent = percent
                .parse()
                .with_context(|| format!("invalid workload_percent for {name}"))?;
        }
        if let Some(days) = rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            profile.unavailable_weekdays = parse_weekdays(days)
                .with_context(|| format!("invalid unavailable_days for {name}"))?;
        }
        if let Some(templates) = rec.get(5).map(str::trim).filter(|s| !s.is_empty()) {
            profile.preferred_templates =
                split_list(templates).into_iter().map(TemplateId::new).collect();
        }
        out.push(profile);
    }
    Ok(out)
}

/// Import d'absences depuis CSV : header `name,start,end[,status][,kind]`
/// (dates `%Y-%m-%d`). `name` doit correspondre à un profil déjà chargé.
pub fn import_absences_csv<P: AsRef<Path>>(
    path: P,
    profiles: &[AvailabilityProfile],
) -> anyhow::Result<Vec<Absence>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let start = parse_date(rec.get(1).context("missing start")?.trim())?;
        let end = parse_date(rec.get(2).context("missing end")?.trim())?;

        let employee = profiles
            .iter()
            .find(|p| p.display_name == name)
            .map(|p| p.employee.clone())
            .with_context(|| format!("unknown employee name: {name}"))?;

        let status = match rec.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_status(raw)?,
            None => AbsenceStatus::Approved,
        };
        let kind = match rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_kind(raw),
            None => AbsenceKind::Vacation,
        };

        out.push(Absence::new(employee, start, end, status, kind).map_err(anyhow::Error::msg)?);
    }
    Ok(out)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_weekdays(raw: &str) -> anyhow::Result<Vec<Weekday>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| anyhow::anyhow!("invalid weekday: {s}"))
        })
        .collect()
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_status(raw: &str) -> anyhow::Result<AbsenceStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "approved" | "approuvee" => Ok(AbsenceStatus::Approved),
        "pending" | "en_attente" => Ok(AbsenceStatus::Pending),
        "rejected" | "refusee" => Ok(AbsenceStatus::Rejected),
        _ => bail!("invalid absence status: {raw}"),
    }
}

fn parse_kind(raw: &str) -> AbsenceKind {
    match raw.to_ascii_lowercase().as_str() {
        "vacation" | "conges" => AbsenceKind::Vacation,
        "sick" | "maladie" => AbsenceKind::Sick,
        "training" | "formation" => AbsenceKind::Training,
        other => AbsenceKind::Custom(other.to_string()),
    }
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des lignes du plan :
/// header `date,weekday,template,role,employee,status,start,end`
pub fn export_roster_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    profiles: &[AvailabilityProfile],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "date", "weekday", "template", "role", "employee", "status", "start", "end",
    ])?;
    for row in &roster.assignments {
        let employee = row
            .employee
            .as_ref()
            .and_then(|id| profiles.iter().find(|p| &p.employee == id))
            .map(|p| p.display_name.as_str())
            .unwrap_or("");
        let status = match row.status {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Open => "open",
        };
        w.write_record([
            row.date.to_string().as_str(),
            format!("{:?}", row.weekday).as_str(),
            row.template.as_str(),
            row.role.as_str(),
            employee,
            status,
            row.start.to_rfc3339().as_str(),
            row.end.to_rfc3339().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
