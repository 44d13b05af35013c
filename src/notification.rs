use crate::model::{AvailabilityProfile, EmployeeId};
use crate::roster::{PublishDispatch, Roster};
use anyhow::{Context, Result};

/// Message prêt à remettre au sous-système de notification (externe).
#[derive(Debug, Clone)]
pub struct ShiftNotice {
    pub employee: EmployeeId,
    pub display_name: String,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, mail, SMS, etc.).
pub trait NoticeRenderer {
    fn render(
        &self,
        profile: &AvailabilityProfile,
        dispatch: &PublishDispatch,
        roster: &Roster,
    ) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(
        &self,
        profile: &AvailabilityProfile,
        dispatch: &PublishDispatch,
        roster: &Roster,
    ) -> String {
        let mut lines = String::new();
        for row in &dispatch.assignments {
            lines.push_str(&format!(
                "- {date} ({role}) : {start} -> {end}\n",
                date = row.date,
                role = row.role,
                start = row.start.to_rfc3339(),
                end = row.end.to_rfc3339(),
            ));
        }
        format!(
            "Bonjour {name},\n\nLe planning du {from} au {to} est publié.\nTes créneaux :\n{lines}\nMerci de signaler toute indisponibilité au plus tôt.\n",
            name = profile.display_name,
            from = roster.period_start,
            to = roster.period_end,
            lines = lines,
        )
    }
}

/// Rend un message par dispatch de publication. Une ligne `Open` n'ayant pas
/// d'employé, elle ne produit jamais de message.
pub fn prepare_notices(
    roster: &Roster,
    dispatches: &[PublishDispatch],
    profiles: &[AvailabilityProfile],
    renderer: &dyn NoticeRenderer,
) -> Result<Vec<ShiftNotice>> {
    let mut out = Vec::with_capacity(dispatches.len());
    for dispatch in dispatches {
        let profile = profiles
            .iter()
            .find(|p| p.employee == dispatch.employee)
            .with_context(|| format!("unknown employee: {}", dispatch.employee.as_str()))?;
        out.push(ShiftNotice {
            employee: dispatch.employee.clone(),
            display_name: profile.display_name.clone(),
            content: renderer.render(profile, dispatch, roster),
        });
    }
    Ok(out)
}
