//! # Registration Form
//!
//! The payload of the three-step registration wizard, and its validation.
//! Only a [`ValidatedRegistration`] can become a
//! [`Participant`](crate::Participant), so every stored record has passed
//! the same checks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::participant::InterestType;

/// Maximum characters for short text fields.
pub const MAX_TEXT_LEN: usize = 200;
/// Maximum characters for the free-text opinion.
pub const MAX_OPINION_LEN: usize = 2000;
/// Minimum characters for first and last names.
pub const MIN_NAME_LEN: usize = 2;
/// Accepted phone number lengths, in digits.
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=12;

/// Form of address used in the welcome message. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Salutation {
    /// Monsieur.
    #[default]
    #[serde(rename = "M.")]
    Monsieur,
    /// Madame.
    #[serde(rename = "Mme")]
    Madame,
}

impl Salutation {
    /// The spelled-out honorific used in prose.
    pub fn honorific(&self) -> &'static str {
        match self {
            Self::Monsieur => "Monsieur",
            Self::Madame => "Madame",
        }
    }

    /// The abbreviated form shown on the form.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Monsieur => "M.",
            Self::Madame => "Mme",
        }
    }
}

/// Raw registration submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    /// Form of address.
    pub salutation: Salutation,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Organization.
    pub company: String,
    /// Job title.
    pub job_title: String,
    /// Industry sector.
    pub industry: String,
    /// Interest family.
    pub interest_type: InterestType,
    /// Offerings chosen within the interest family.
    pub selected_offerings: BTreeSet<String>,
    /// Free-text opinion.
    pub opinion: String,
    /// Sources for the forum.
    pub referral_forum: BTreeSet<String>,
    /// Sources for the organizer.
    pub referral_assirou: BTreeSet<String>,
}

/// A registration form that passed [`RegistrationForm::validate`].
///
/// Fields are trimmed, the email is lowercased and offerings are consistent
/// with the interest type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    form: RegistrationForm,
}

impl ValidatedRegistration {
    /// Borrow the cleaned form.
    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Form of address chosen by the registrant.
    pub fn salutation(&self) -> Salutation {
        self.form.salutation
    }

    /// `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.form.first_name, self.form.last_name)
    }

    /// Consume into the cleaned form.
    pub fn into_form(self) -> RegistrationForm {
        self.form
    }
}

impl RegistrationForm {
    /// Clean and validate the submission.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking names, then
    /// email, then phone, then field lengths.
    pub fn validate(self) -> Result<ValidatedRegistration, ValidationError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        check_name("firstName", &first_name)?;
        check_name("lastName", &last_name)?;

        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        let phone = self.phone.trim().to_string();
        if !PHONE_DIGITS.contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        let company = self.company.trim().to_string();
        let job_title = self.job_title.trim().to_string();
        let industry = self.industry.trim().to_string();
        let opinion = self.opinion.trim().to_string();
        for (field, value) in [
            ("firstName", &first_name),
            ("lastName", &last_name),
            ("email", &email),
            ("company", &company),
            ("jobTitle", &job_title),
            ("industry", &industry),
        ] {
            check_len(field, value, MAX_TEXT_LEN)?;
        }
        check_len("opinion", &opinion, MAX_OPINION_LEN)?;

        let selected_offerings = match self.interest_type {
            InterestType::None => BTreeSet::new(),
            _ => clean_labels("selectedOfferings", self.selected_offerings)?,
        };

        Ok(ValidatedRegistration {
            form: RegistrationForm {
                salutation: self.salutation,
                first_name,
                last_name,
                email,
                phone,
                company,
                job_title,
                industry,
                interest_type: self.interest_type,
                selected_offerings,
                opinion,
                referral_forum: clean_labels("referralForum", self.referral_forum)?,
                referral_assirou: clean_labels("referralAssirou", self.referral_assirou)?,
            },
        })
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort { field });
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Trim labels, drop blanks, and cap each label's length.
fn clean_labels(
    field: &'static str,
    labels: BTreeSet<String>,
) -> Result<BTreeSet<String>, ValidationError> {
    let mut out = BTreeSet::new();
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        check_len(field, label, MAX_TEXT_LEN)?;
        out.insert(label.to_string());
    }
    Ok(out)
}

/// `local@domain.tld` with a lowercase alphabetic TLD of at least two letters.
///
/// Expects already-lowercased input.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    let Some((domain, tld)) = host.rsplit_once('.') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._%+-".contains(c));
    let domain_ok = !domain.is_empty()
        && domain
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_lowercase());
    local_ok && domain_ok && tld_ok
}
