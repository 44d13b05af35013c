use anyhow::{bail, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour un employé
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un template de shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un shift persisté
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un rendez-vous
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(String);

impl BookingId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Besoin en personnel d'un template : (rôle, effectif requis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDemand {
    pub role: String,
    pub required: u32,
}

/// Modèle de demande récurrente : horaires + jours de récurrence + rôles requis.
///
/// Immuable une fois référencé par un roster publié ; validé avant toute
/// génération.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: TemplateId,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub weekdays: Vec<Weekday>,
    pub demands: Vec<RoleDemand>,
}

impl ShiftTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.label.trim().is_empty() {
            bail!("template label cannot be empty");
        }
        if self.start_time == self.end_time {
            bail!("template start_time and end_time cannot be equal");
        }
        if self.weekdays.is_empty() {
            bail!("template must recur on at least one weekday");
        }
        if self.demands.is_empty() {
            bail!("template must require at least one role");
        }
        for demand in &self.demands {
            if demand.role.trim().is_empty() {
                bail!("template role cannot be empty");
            }
            if demand.required == 0 {
                bail!("template role {} requires a count > 0", demand.role);
            }
        }
        Ok(())
    }

    pub fn recurs_on(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }
}

/// Profil de disponibilité d'un employé (lecture seule pendant la génération).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityProfile {
    pub employee: EmployeeId,
    pub display_name: String,
    pub roles: Vec<String>,
    /// Capacité hebdomadaire en heures.
    pub weekly_hours: u32,
    /// Taux d'activité en pourcent (100 = plein temps) ; utilisé par ROUND_ROBIN.
    #[serde(default = "full_workload")]
    pub workload_percent: u32,
    /// Vide = aucune préférence, accepte tous les templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_templates: Vec<TemplateId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_weekdays: Vec<Weekday>,
}

fn full_workload() -> u32 {
    100
}

impl AvailabilityProfile {
    pub fn new<D: Into<String>>(display_name: D, roles: Vec<String>, weekly_hours: u32) -> Self {
        Self {
            employee: EmployeeId::random(),
            display_name: display_name.into(),
            roles,
            weekly_hours,
            workload_percent: full_workload(),
            preferred_templates: Vec::new(),
            unavailable_weekdays: Vec::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Vide = aucune préférence.
    pub fn accepts_template(&self, template: &TemplateId) -> bool {
        self.preferred_templates.is_empty() || self.preferred_templates.contains(template)
    }
}

/// Statut d'une absence ; seules les absences approuvées sont visibles du moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceKind {
    Vacation,
    Sick,
    Training,
    Custom(String),
}

/// Absence sur un intervalle de dates inclusif [start_date, end_date].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Absence {
    pub employee: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AbsenceStatus,
    pub kind: AbsenceKind,
}

impl Absence {
    pub fn new(
        employee: EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: AbsenceStatus,
        kind: AbsenceKind,
    ) -> Result<Self, String> {
        if end_date < start_date {
            return Err("absence end_date must not precede start_date".to_string());
        }
        Ok(Self {
            employee,
            start_date,
            end_date,
            status,
            kind,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.status == AbsenceStatus::Approved
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Contraintes de planification du tenant (singleton, lecture seule).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchedulingLimits {
    pub max_hours_per_week: u32,
    pub max_hours_per_day: u32,
    pub min_rest_hours: u32,
    /// Assouplit les plafonds horaires, jamais le repos minimal.
    pub allow_overtime: bool,
}

impl Default for SchedulingLimits {
    fn default() -> Self {
        Self {
            max_hours_per_week: 40,
            max_hours_per_day: 10,
            min_rest_hours: 11,
            allow_overtime: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftStatus {
    Draft,
    Published,
    Cancelled,
}

/// Shift concret persisté, indépendant du roster : c'est contre lui que
/// travaille la détection de conflits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub break_minutes: u32,
    pub status: ShiftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shift {
    /// Crée un shift publié en validant que `end > start`.
    pub fn new(
        employee: EmployeeId,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("shift end must be strictly after start".to_string());
        }
        Ok(Self {
            id: ShiftId::random(),
            employee,
            date,
            start,
            end,
            break_minutes: 0,
            status: ShiftStatus::Published,
            location: None,
            service: None,
            notes: None,
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Paid,
    Cancelled,
}

/// Rendez-vous côté demande ; l'auto-affectation ne tourne que si
/// `employee` est vide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new<S: Into<String>>(
        service: S,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Self, String> {
        if duration_minutes <= 0 {
            return Err("booking duration must be positive".to_string());
        }
        Ok(Self {
            id: BookingId::random(),
            service: service.into(),
            employee: None,
            customer: None,
            start,
            duration_minutes,
            status: BookingStatus::Confirmed,
        })
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

/// Instantané en lecture seule des données externes consommées par le moteur.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub templates: Vec<ShiftTemplate>,
    #[serde(default)]
    pub profiles: Vec<AvailabilityProfile>,
    #[serde(default)]
    pub absences: Vec<Absence>,
    #[serde(default)]
    pub limits: SchedulingLimits,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Snapshot {
    pub fn find_profile<'a>(&'a self, id: &EmployeeId) -> Option<&'a AvailabilityProfile> {
        self.profiles.iter().find(|p| &p.employee == id)
    }
    pub fn find_profile_by_name<'a>(&'a self, name: &str) -> Option<&'a AvailabilityProfile> {
        self.profiles.iter().find(|p| p.display_name == name)
    }
    pub fn find_template<'a>(&'a self, id: &TemplateId) -> Option<&'a ShiftTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }
}
