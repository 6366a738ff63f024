//! # Welcome Message
//!
//! The prompt sent to the text generator and the templated fallback used
//! whenever the generator is unavailable, fails, or returns nothing.

use crate::registration::{Salutation, ValidatedRegistration};

/// Organization used in the prompt when the registrant left it blank.
pub const DEFAULT_ORGANIZATION: &str = "Indépendant";

/// Inputs to the welcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeRequest {
    /// Form of address.
    pub salutation: Salutation,
    /// `"First Last"`.
    pub full_name: String,
    /// Organization, defaulted when blank.
    pub organization: String,
}

impl WelcomeRequest {
    /// Build the request from a validated registration.
    pub fn from_registration(registration: &ValidatedRegistration) -> Self {
        let company = registration.form().company.trim();
        Self {
            salutation: registration.salutation(),
            full_name: registration.full_name(),
            organization: if company.is_empty() {
                DEFAULT_ORGANIZATION.to_string()
            } else {
                company.to_string()
            },
        }
    }

    /// The generation prompt.
    pub fn prompt(&self) -> String {
        format!(
            "Tu es le Directeur de la Communication d'Assirou Sécurité. \
             Rédige un message de bienvenue institutionnel, court (max 2-3 phrases) \
             et très prestigieux pour {} {} de l'organisation {}, qui vient de \
             s'inscrire au Forum Assirou Sécurité 2026. Le ton doit être solennel, \
             professionnel et chaleureux.",
            self.salutation.abbreviation(),
            self.full_name,
            self.organization
        )
    }

    /// Deterministic greeting used when generation fails. Never empty.
    pub fn fallback(&self) -> String {
        format!(
            "{} {}, Assirou Sécurité est honorée de vous compter parmi les \
             participants de notre forum 2026. Nous nous réjouissons de votre \
             présence pour échanger sur les enjeux critiques de la sécurité globale.",
            self.salutation.honorific(),
            self.full_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::fixtures::form;
    use crate::registration::RegistrationForm;

    #[test]
    fn prompt_names_registrant_and_organization() {
        let req = WelcomeRequest::from_registration(&form().validate().unwrap());
        let prompt = req.prompt();
        assert!(prompt.contains("M. Awa Diop de l'organisation Sonatel"));
        assert!(prompt.contains("Forum Assirou Sécurité 2026"));
    }

    #[test]
    fn blank_company_defaults_to_independent() {
        let f = RegistrationForm {
            company: "   ".into(),
            salutation: Salutation::Madame,
            ..form()
        };
        let req = WelcomeRequest::from_registration(&f.validate().unwrap());
        assert_eq!(req.organization, DEFAULT_ORGANIZATION);
        assert!(req.fallback().starts_with("Madame Awa Diop, Assirou Sécurité"));
    }
}
