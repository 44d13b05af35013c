#![forbid(unsafe_code)]
//! Roulement — moteur de planification du personnel (sans BD).
//!
//! - Génération de rosters : templates récurrents + disponibilités +
//!   contraintes de travail, glouton first-fit déterministe.
//! - Cycle de vie brouillon/publié avec dispatch de notifications.
//! - Détection de conflits d'un shift isolé (chevauchements, absences,
//!   repos minimal).
//! - Auto-affectation d'un rendez-vous via cinq stratégies interchangeables.
//! - Tout en UTC ; parsing RFC3339 ; affichage local en dehors de la lib.

pub mod conflict;
pub mod io;
pub mod model;
pub mod notification;
pub mod roster;
pub mod storage;
pub mod strategy;
pub mod templates;

mod util;

pub use conflict::{detect_conflicts, ConflictReport, RestViolation, ShiftProposal};
pub use model::{
    Absence, AbsenceKind, AbsenceStatus, AvailabilityProfile, Booking, BookingId, BookingStatus,
    CustomerId, EmployeeId, RoleDemand, SchedulingLimits, Shift, ShiftId, ShiftStatus,
    ShiftTemplate, Snapshot, TemplateId,
};
pub use notification::{prepare_notices, NoticeRenderer, ShiftNotice, TextNotice};
pub use roster::{
    generate_roster, publish, unpublish, AssignmentStatus, AvailabilityIndex, Decision,
    HourLedger, PlanError, PublishDispatch, RejectReason, Roster, RosterAssignment, RosterStatus,
};
pub use storage::{load_roster, save_roster, JsonStorage, Storage};
pub use strategy::{
    filter_candidates, select, select_for_booking, AssignmentStrategy, SelectionContext,
    DEFAULT_ROTATION_WINDOW_DAYS,
};
pub use templates::{
    export_template_json, load_template_from_file, TemplateInfo, TemplateStore,
};
