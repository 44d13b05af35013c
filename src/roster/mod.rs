mod availability;
mod constraints;
mod generate;
mod ledger;
mod lifecycle;
mod types;

pub use availability::AvailabilityIndex;
pub use constraints::{evaluate, DemandSlot};
pub use generate::generate_roster;
pub use ledger::HourLedger;
pub use lifecycle::{publish, unpublish, PublishDispatch};
pub use types::{
    AssignmentStatus, Decision, PlanError, RejectReason, Roster, RosterAssignment, RosterStatus,
};
