//! Trip request domain entity
//!
//! Request layer of the trip lifecycle:
//!
//! ```text
//! pending --approve--> approved --assign(vehicle)--> assigned
//! pending --reject(reason)--> rejected
//! ```
//!
//! `rejected` and `assigned` are terminal for the request itself.

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Assigned,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Assigned => "assigned",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "assigned" => Some(Self::Assigned),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// The only edges of the request state machine.
    pub fn can_transition_to(&self, next: ApprovalStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Assigned)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Assigned | Self::Rejected)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub id: String,
    pub employee_id: String,
    pub vehicle_id: Option<String>,
    pub destination: String,
    pub purpose: String,
    pub expected_time: DateTime<Utc>,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub assigned_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TripRequest {
    pub fn new(
        employee_id: impl Into<String>,
        destination: impl Into<String>,
        purpose: impl Into<String>,
        expected_time: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let destination = destination.into().trim().to_string();
        let purpose = purpose.into().trim().to_string();
        if destination.is_empty() {
            return Err(DomainError::Validation("Destination is required".into()));
        }
        if purpose.is_empty() {
            return Err(DomainError::Validation("Purpose is required".into()));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee_id.into(),
            vehicle_id: None,
            destination,
            purpose,
            expected_time,
            approval_status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            assigned_by: None,
            rejection_reason: None,
            created_at: Utc::now(),
        })
    }

    pub fn is_owned_by(&self, employee_id: &str) -> bool {
        self.employee_id == employee_id
    }

    fn ensure_transition(&self, next: ApprovalStatus) -> DomainResult<()> {
        if self.approval_status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::Conflict(format!(
                "Trip request {} is {} and cannot become {}",
                self.id, self.approval_status, next
            )))
        }
    }

    pub fn approve(&mut self, manager_id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_transition(ApprovalStatus::Approved)?;
        self.approval_status = ApprovalStatus::Approved;
        self.approved_by = Some(manager_id.to_string());
        self.approved_at = Some(at);
        Ok(())
    }

    /// Blank or whitespace-only reasons are refused before any state change.
    pub fn reject(&mut self, manager_id: &str, reason: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::Validation(
                "Please provide a rejection reason".into(),
            ));
        }
        self.ensure_transition(ApprovalStatus::Rejected)?;
        self.approval_status = ApprovalStatus::Rejected;
        self.approved_by = Some(manager_id.to_string());
        self.approved_at = Some(at);
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn assign(&mut self, manager_id: &str, vehicle_id: &str) -> DomainResult<()> {
        self.ensure_transition(ApprovalStatus::Assigned)?;
        self.approval_status = ApprovalStatus::Assigned;
        self.vehicle_id = Some(vehicle_id.to_string());
        self.assigned_by = Some(manager_id.to_string());
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
