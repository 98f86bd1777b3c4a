//! Vehicle domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Vehicle availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleStatus {
    /// Free to be assigned
    Available,
    /// Bound to an assigned request or an active trip
    InUse,
    /// Taken out of the pool by a manager
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "in_use" => Some(Self::InUse),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub number_plate: String,
    pub description: Option<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Manager edits to a vehicle; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub name: Option<String>,
    pub number_plate: Option<String>,
    pub description: Option<String>,
    pub status: Option<VehicleStatus>,
}

impl Vehicle {
    pub fn new(
        name: impl Into<String>,
        number_plate: impl Into<String>,
        description: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let number_plate = number_plate.into().trim().to_string();
        if name.is_empty() || number_plate.is_empty() {
            return Err(DomainError::Validation(
                "Vehicle name and number plate are required".into(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            number_plate,
            description: description.filter(|d| !d.trim().is_empty()),
            status: VehicleStatus::Available,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }

    /// Apply manager edits.
    ///
    /// `in_use` is owned by trip assignment: it can neither be set by hand
    /// nor cleared while the vehicle is out on an assignment.
    pub fn apply(&mut self, changes: VehicleChanges) -> DomainResult<()> {
        if let Some(status) = changes.status {
            if status == VehicleStatus::InUse && self.status != VehicleStatus::InUse {
                return Err(DomainError::Validation(
                    "Vehicles become in_use only through assignment".into(),
                ));
            }
            if self.status == VehicleStatus::InUse && status != VehicleStatus::InUse {
                return Err(DomainError::Conflict(format!(
                    "Vehicle {} is in use and cannot change status",
                    self.number_plate
                )));
            }
            self.status = status;
        }
        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::Validation("Vehicle name cannot be empty".into()));
            }
            self.name = name.to_string();
        }
        if let Some(plate) = changes.number_plate {
            let plate = plate.trim();
            if plate.is_empty() {
                return Err(DomainError::Validation("Number plate cannot be empty".into()));
            }
            self.number_plate = plate.to_string();
        }
        if let Some(description) = changes.description {
            self.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
