//! The record store.
//!
//! Owns every persisted collection plus the PIN gate, and writes the whole
//! state back through its [`BlobStore`] after each mutation. The scheduling
//! code only reads from it; assignment changes go through
//! [`RecordStore::set_assignment`].

mod backend;
mod state;

pub use backend::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use state::AppState;

use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::appointment::{Appointment, AppointmentInput};
use crate::assignment;
use crate::constants::{
    APPOINTMENT_WINDOW_MONTHS, PIN_LENGTH, RECENT_SERVICES, STATE_KEY, UNLOCK_KEY,
};
use crate::error::{ServiceBookError, ServiceBookResult};
use crate::member::{Member, MemberInput};
use crate::occurrence::{ResponsibilityOccurrence, upcoming};
use crate::recurrence::Horizon;
use crate::responsibility::{Responsibility, ResponsibilityInput};
use crate::service::{Service, ServiceInput};

pub struct RecordStore<B: BlobStore> {
    backend: B,
    state: AppState,
    unlocked: bool,
}

impl<B: BlobStore> RecordStore<B> {
    /// Load state from the backend.
    ///
    /// A stored blob that does not parse is kept aside under
    /// `<STATE_KEY>.corrupt` and the store starts from the default state.
    pub fn open(mut backend: B) -> ServiceBookResult<Self> {
        let state = match backend.load(STATE_KEY)? {
            None => AppState::default(),
            Some(raw) => match AppState::from_json(&raw) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(error = %e, "stored state is malformed, starting fresh");
                    backend.save(&format!("{STATE_KEY}.corrupt"), &raw)?;
                    AppState::default()
                }
            },
        };

        let unlocked = backend
            .load(UNLOCK_KEY)?
            .is_some_and(|raw| raw.trim() == "true");

        Ok(RecordStore {
            backend,
            state,
            unlocked,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn save(&mut self) -> ServiceBookResult<()> {
        let json = self
            .state
            .to_json()
            .map_err(|e| ServiceBookError::Serialization(e.to_string()))?;
        self.backend.save(STATE_KEY, &json)?;
        tracing::debug!(bytes = json.len(), "saved state");
        Ok(())
    }

    // =========================================================================
    // PIN gate
    // =========================================================================

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn ensure_unlocked(&self) -> ServiceBookResult<()> {
        if self.unlocked {
            Ok(())
        } else {
            Err(ServiceBookError::Locked)
        }
    }

    /// Unlock when `pin` matches the stored PIN. Returns whether it matched.
    ///
    /// A stored PIN is always accepted verbatim, even one edited by hand to
    /// something other than four digits. Any other input must be well formed.
    pub fn unlock(&mut self, pin: &str) -> ServiceBookResult<bool> {
        if pin != self.state.pin {
            validate_pin(pin)?;
            tracing::debug!("unlock rejected");
            return Ok(false);
        }

        self.set_unlocked(true)?;
        Ok(true)
    }

    pub fn lock(&mut self) -> ServiceBookResult<()> {
        self.set_unlocked(false)
    }

    fn set_unlocked(&mut self, unlocked: bool) -> ServiceBookResult<()> {
        self.unlocked = unlocked;
        self.backend
            .save(UNLOCK_KEY, if unlocked { "true" } else { "false" })
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Services, most recently logged first.
    pub fn services(&self) -> Vec<&Service> {
        let mut services: Vec<&Service> = self.state.services.iter().collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        services
    }

    pub fn recent_services(&self) -> Vec<&Service> {
        let mut services = self.services();
        services.truncate(RECENT_SERVICES);
        services
    }

    pub fn service(&self, id: &str) -> ServiceBookResult<&Service> {
        self.state
            .services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Service", id))
    }

    pub fn add_service(&mut self, input: ServiceInput) -> ServiceBookResult<Service> {
        let service = Service::new(input);
        self.state.services.insert(0, service.clone());
        self.save()?;
        Ok(service)
    }

    pub fn update_service(&mut self, id: &str, input: ServiceInput) -> ServiceBookResult<()> {
        let service = self
            .state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Service", id))?;
        service.apply(input);
        self.save()
    }

    pub fn remove_service(&mut self, id: &str) -> ServiceBookResult<()> {
        remove_by_id(&mut self.state.services, id, |s| &s.id, "Service")?;
        self.save()
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Appointments by date, soonest first.
    pub fn appointments(&self) -> Vec<&Appointment> {
        let mut appointments: Vec<&Appointment> = self.state.appointments.iter().collect();
        appointments.sort_by_key(|a| a.date);
        appointments
    }

    /// Appointments strictly after `now` and before `now` plus three months.
    pub fn upcoming_appointments(&self, now: NaiveDateTime) -> Vec<&Appointment> {
        let window_end = now
            .checked_add_months(Months::new(APPOINTMENT_WINDOW_MONTHS))
            .unwrap_or(NaiveDateTime::MAX);

        self.appointments()
            .into_iter()
            .filter(|a| a.date > now && a.date < window_end)
            .collect()
    }

    pub fn appointment(&self, id: &str) -> ServiceBookResult<&Appointment> {
        self.state
            .appointments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Appointment", id))
    }

    pub fn add_appointment(&mut self, input: AppointmentInput) -> ServiceBookResult<Appointment> {
        input.validate()?;
        let appointment = Appointment::new(input);
        self.state.appointments.push(appointment.clone());
        self.save()?;
        Ok(appointment)
    }

    pub fn update_appointment(
        &mut self,
        id: &str,
        input: AppointmentInput,
    ) -> ServiceBookResult<()> {
        input.validate()?;
        let appointment = self
            .state
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Appointment", id))?;
        appointment.apply(input);
        self.save()
    }

    pub fn remove_appointment(&mut self, id: &str) -> ServiceBookResult<()> {
        remove_by_id(&mut self.state.appointments, id, |a| &a.id, "Appointment")?;
        self.save()
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Members sorted by name, ignoring case.
    pub fn members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.state.members.iter().collect();
        members.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        members
    }

    pub fn member(&self, id: &str) -> ServiceBookResult<&Member> {
        self.state
            .members
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Member", id))
    }

    pub fn add_member(&mut self, input: MemberInput) -> ServiceBookResult<Member> {
        input.validate()?;
        let member = Member::new(input);
        self.state.members.push(member.clone());
        self.save()?;
        Ok(member)
    }

    pub fn update_member(&mut self, id: &str, input: MemberInput) -> ServiceBookResult<()> {
        input.validate()?;
        let member = self
            .state
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Member", id))?;
        member.apply(input);
        self.save()
    }

    /// Remove a member and clear (not delete) every assignment naming them.
    pub fn remove_member(&mut self, id: &str) -> ServiceBookResult<()> {
        remove_by_id(&mut self.state.members, id, |m| &m.id, "Member")?;

        for responsibility in &mut self.state.responsibilities {
            assignment::clear_member(&mut responsibility.assignments, id);
        }
        self.save()
    }

    // =========================================================================
    // Responsibilities
    // =========================================================================

    /// Responsibilities, most recently created first.
    pub fn responsibilities(&self) -> Vec<&Responsibility> {
        let mut responsibilities: Vec<&Responsibility> =
            self.state.responsibilities.iter().collect();
        responsibilities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        responsibilities
    }

    pub fn responsibility(&self, id: &str) -> ServiceBookResult<&Responsibility> {
        self.state
            .responsibilities
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Responsibility", id))
    }

    pub fn add_responsibility(
        &mut self,
        input: ResponsibilityInput,
    ) -> ServiceBookResult<Responsibility> {
        input.validate()?;
        let responsibility = Responsibility::new(input);
        self.state.responsibilities.push(responsibility.clone());
        self.save()?;
        Ok(responsibility)
    }

    pub fn update_responsibility(
        &mut self,
        id: &str,
        input: ResponsibilityInput,
    ) -> ServiceBookResult<()> {
        input.validate()?;
        let responsibility = self.responsibility_mut(id)?;
        responsibility.apply(input);
        self.save()
    }

    pub fn remove_responsibility(&mut self, id: &str) -> ServiceBookResult<()> {
        remove_by_id(
            &mut self.state.responsibilities,
            id,
            |r| &r.id,
            "Responsibility",
        )?;
        self.save()
    }

    /// Assign `member_id` to one occurrence, or clear it with `None`.
    pub fn set_assignment(
        &mut self,
        responsibility_id: &str,
        date: NaiveDate,
        member_id: Option<String>,
    ) -> ServiceBookResult<()> {
        if let Some(member_id) = &member_id {
            self.member(member_id)?;
        }

        let responsibility = self.responsibility_mut(responsibility_id)?;
        assignment::set_assignment(&mut responsibility.assignments, date, member_id);
        self.save()
    }

    /// The merged occurrence list, in the same order as [`Self::responsibilities`].
    pub fn upcoming_responsibilities(
        &self,
        today: NaiveDate,
        horizon: Horizon,
        limit: usize,
    ) -> Vec<ResponsibilityOccurrence> {
        upcoming(
            self.responsibilities(),
            &self.state.members,
            today,
            horizon,
            limit,
        )
    }

    fn responsibility_mut(&mut self, id: &str) -> ServiceBookResult<&mut Responsibility> {
        self.state
            .responsibilities
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceBookError::not_found("Responsibility", id))
    }
}

/// A PIN is exactly four ASCII digits.
pub fn validate_pin(pin: &str) -> ServiceBookResult<()> {
    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceBookError::Validation(format!(
            "Enter the {PIN_LENGTH}-digit PIN"
        )));
    }
    Ok(())
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &str,
    id_of: impl Fn(&T) -> &String,
    kind: &'static str,
) -> ServiceBookResult<()> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);

    if items.len() == before {
        return Err(ServiceBookError::not_found(kind, id));
    }
    Ok(())
}
