//! Fixed option lists offered by the registration form.

use serde::Serialize;

use crate::participant::InterestType;

/// Industry sectors.
pub const INDUSTRIES: &[&str] = &[
    "Cybersécurité",
    "Défense & Armement",
    "Intelligence Artificielle",
    "Infrastructure Critique",
    "Gouvernement & Secteur Public",
    "Services Financiers",
    "Télécommunications",
    "Autre",
];

/// Security services.
pub const SERVICES: &[&str] = &[
    "Audit & Conseil en Sécurité",
    "Cybersécurité & SOC",
    "Surveillance Physique & Gardiennage",
    "Installation de Systèmes Vidéo",
    "Protection de Hautes Personnalités",
    "Sécurité Événementielle",
];

/// Training programmes.
pub const FORMATIONS: &[&str] = &[
    "Formation Cybersécurité Avancée",
    "Gestion de Crise & Risques",
    "Secourisme en Milieu Hostile",
    "Formation Agent de Protection",
    "Intelligence Économique",
    "Droit de la Sécurité",
];

/// Where participants may have heard about the forum or the organizer.
pub const REFERRAL_SOURCES: &[&str] = &[
    "Facebook",
    "Instagram",
    "TikTok",
    "Site Web",
    "LinkedIn",
    "Bouche à oreille",
];

/// Offerings selectable for an interest family.
pub fn offerings_for(interest: InterestType) -> &'static [&'static str] {
    match interest {
        InterestType::Services => SERVICES,
        InterestType::Formations => FORMATIONS,
        InterestType::None => &[],
    }
}

/// All option lists, as served to the registration form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Industry sectors.
    pub industries: &'static [&'static str],
    /// Security services.
    pub services: &'static [&'static str],
    /// Training programmes.
    pub formations: &'static [&'static str],
    /// Referral sources.
    pub referral_sources: &'static [&'static str],
}

impl Catalog {
    /// The event's catalog.
    pub fn current() -> Self {
        Self {
            industries: INDUSTRIES,
            services: SERVICES,
            formations: FORMATIONS,
            referral_sources: REFERRAL_SOURCES,
        }
    }
}
