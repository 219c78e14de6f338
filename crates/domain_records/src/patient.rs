//! Patients as seen by billing and reporting

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::PatientId;

/// Category label reported for patients whose category is missing
pub const UNSPECIFIED_CATEGORY: &str = "Unspecified";

/// How a patient is covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatientCategory {
    /// Self-paying patient
    Standard,
    /// Covered by health insurance
    Insured,
    #[serde(rename = "VIP")]
    Vip,
}

impl PatientCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PatientCategory::Standard => "Standard",
            PatientCategory::Insured => "Insured",
            PatientCategory::Vip => "VIP",
        }
    }

    /// Label used to group visits, falling back for a missing category
    pub fn label_or_unspecified(category: Option<PatientCategory>) -> &'static str {
        category.map_or(UNSPECIFIED_CATEGORY, |c| c.label())
    }
}

impl fmt::Display for PatientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PatientCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(PatientCategory::Standard),
            "insured" => Ok(PatientCategory::Insured),
            "vip" => Ok(PatientCategory::Vip),
            other => Err(format!("unknown patient category '{other}'")),
        }
    }
}

/// A registered patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<PatientCategory>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            id: PatientId::new_v7(),
            full_name: full_name.into(),
            phone: None,
            date_of_birth: None,
            category: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_category(mut self, category: PatientCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Projection joined onto records in reports
    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id,
            name: Some(self.full_name.clone()),
            phone: self.phone.clone(),
            category: self.category,
        }
    }
}

/// The patient fields reports carry alongside a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: PatientId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub category: Option<PatientCategory>,
}

impl PatientSummary {
    pub fn category_label(&self) -> &'static str {
        PatientCategory::label_or_unspecified(self.category)
    }
}
