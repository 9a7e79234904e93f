//! Admin roles and capabilities.
//!
//! Owners may do anything. Admins work only in the sections they were
//! granted and can never change permissions. The check is meant to run at
//! the gateway boundary, not in view code.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{DashError, Result};
use crate::record::Record;

/// Collection holding one permission record per admin, keyed by email.
pub const PERMISSIONS_COLLECTION: &str = "admin_permissions";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Owner,
    #[default]
    Admin,
}

/// Areas of the dashboard that permissions are granted on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Section {
    Courses,
    Mentors,
    PromoCodes,
    HomeContent,
    Users,
    Permissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
}

/// The person acting on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub sections: BTreeSet<Section>,
}

impl Principal {
    pub fn owner(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Owner,
            sections: Section::iter().collect(),
        }
    }

    pub fn admin(email: impl Into<String>, sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            email: email.into(),
            role: Role::Admin,
            sections: sections.into_iter().collect(),
        }
    }

    pub fn allows(&self, section: Section, capability: Capability) -> bool {
        match self.role {
            Role::Owner => true,
            Role::Admin => {
                let granted = self.sections.contains(&section);
                match capability {
                    Capability::Read => granted,
                    Capability::Write => granted && section != Section::Permissions,
                }
            }
        }
    }

    /// Returns `Forbidden` unless the capability is held.
    pub fn require(&self, section: Section, capability: Capability) -> Result<()> {
        if self.allows(section, capability) {
            Ok(())
        } else {
            Err(DashError::forbidden(format!(
                "{} ({}) may not {} {}",
                self.email, self.role, capability, section
            )))
        }
    }

    /// Builds a principal from a stored `admin_permissions` record
    /// (`email`, `role`, comma-separated `sections`).
    pub fn from_permission_record(record: &Record) -> Result<Self> {
        let text = |field: &str| {
            record
                .get(field)
                .and_then(|v| v.as_text())
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let email = text("email");
        if email.is_empty() {
            return Err(DashError::config("permission record has no email"));
        }
        let role: Role = text("role")
            .parse()
            .map_err(|_| DashError::config(format!("unknown role for {}", email)))?;
        let sections = parse_sections(&text("sections"))?;

        Ok(match role {
            Role::Owner => Self::owner(email),
            Role::Admin => Self::admin(email, sections),
        })
    }
}

/// Parses `"courses, mentors"` into sections. Blank input is no sections.
pub fn parse_sections(input: &str) -> Result<BTreeSet<Section>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Section>()
                .map_err(|_| DashError::config(format!("unknown section '{}'", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_do_everything() {
        let owner = Principal::owner("owner@example.com");
        for section in Section::iter() {
            assert!(owner.allows(section, Capability::Read));
            assert!(owner.allows(section, Capability::Write));
        }
    }

    #[test]
    fn test_admin_limited_to_granted_sections() {
        let admin = Principal::admin("a@example.com", [Section::Courses]);
        assert!(admin.allows(Section::Courses, Capability::Write));
        assert!(!admin.allows(Section::Mentors, Capability::Read));
        assert!(!admin.allows(Section::Mentors, Capability::Write));
    }

    #[test]
    fn test_admin_never_writes_permissions() {
        let admin = Principal::admin("a@example.com", [Section::Permissions]);
        assert!(admin.allows(Section::Permissions, Capability::Read));
        assert!(!admin.allows(Section::Permissions, Capability::Write));

        let err = admin.require(Section::Permissions, Capability::Write).unwrap_err();
        assert!(err.is_forbidden());
        assert!(err.to_string().contains("may not write permissions"));
    }

    #[test]
    fn test_from_permission_record() {
        let record = Record::new()
            .with("email", "a@example.com")
            .with("role", "Admin")
            .with("sections", "courses, promo_codes");
        let principal = Principal::from_permission_record(&record).unwrap();
        assert_eq!(principal.role, Role::Admin);
        assert!(principal.sections.contains(&Section::PromoCodes));
        assert_eq!(principal.sections.len(), 2);
    }

    #[test]
    fn test_from_permission_record_rejects_unknown_section() {
        let record = Record::new()
            .with("email", "a@example.com")
            .with("role", "admin")
            .with("sections", "courses, billing");
        assert!(Principal::from_permission_record(&record).is_err());
    }

    #[test]
    fn test_owner_record_gets_all_sections() {
        let record = Record::new().with("email", "o@example.com").with("role", "owner");
        let principal = Principal::from_permission_record(&record).unwrap();
        assert_eq!(principal.sections.len(), Section::iter().count());
    }
}
