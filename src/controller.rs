//! The user list controller: owns the fetched users, the visible slice, the
//! open draft and the single-slot error, and changes them only through its
//! operations.
//!
//! Every remote operation is split in two. A `begin_*` method checks
//! preconditions, takes the busy flag and returns the [`RemoteCall`] to run;
//! [`UserListController::complete`] applies the matching [`CallOutcome`] and
//! always releases the busy flag. The async methods (`load`, `search`,
//! `commit_edit`, `remove`, `commit_create`) chain both halves for callers
//! that can simply await the service.
use tracing::{debug, info, warn};

use crate::error::{ControllerError, RemoteCallFailure};
use crate::remote::{CallOutcome, NewUser, RemoteCall, RemoteUserService, UserField, UserId, UserRecord};
use crate::search::query_param;

/// Number of users rendered from the front of the collection.
pub const VISIBLE_LIMIT: usize = 5;

/// The one draft that may be open at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Draft {
    #[default]
    Idle,
    /// Working copy of an existing user, detached from the collection.
    Editing(UserRecord),
    /// Create form contents.
    Creating(NewUser),
}

/// State behind the users screen.
#[derive(Clone, Debug, Default)]
pub struct UserListController {
    users: Vec<UserRecord>,
    visible: Vec<UserRecord>,
    draft: Draft,
    search_query: String,
    busy: bool,
    last_error: Option<String>,
}

impl UserListController {
    /// Empty controller: no users, nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full collection from the last successful list, in service order.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// The rendered prefix of [`users`](Self::users).
    pub fn visible(&self) -> &[UserRecord] {
        &self.visible
    }

    /// The open draft, if any.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Working copy of the user being edited.
    pub fn edit_draft(&self) -> Option<&UserRecord> {
        match &self.draft {
            Draft::Editing(record) => Some(record),
            _ => None,
        }
    }

    /// Contents of the create form while it is open.
    pub fn create_draft(&self) -> Option<&NewUser> {
        match &self.draft {
            Draft::Creating(user) => Some(user),
            _ => None,
        }
    }

    /// Last accepted search; empty means unfiltered.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether a remote call is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Message of the most recent failed call, until the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn acquire(&mut self) -> Result<(), ControllerError> {
        if self.busy {
            return Err(ControllerError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    fn resync_visible(&mut self) {
        self.visible = self.users.iter().take(VISIBLE_LIMIT).cloned().collect();
    }

    fn record_failure(&mut self, op: &str, failure: &RemoteCallFailure) {
        warn!(op, error = %failure, "remote call failed");
        self.last_error = Some(failure.message.clone());
    }

    // ---- loading ----------------------------------------------------------

    fn list_call(query: Option<&str>) -> RemoteCall {
        let query = query.and_then(query_param).map(str::to_owned);
        debug!(?query, "loading users");
        RemoteCall::List { query }
    }

    /// Start fetching the collection.
    ///
    /// # Arguments
    ///
    /// * `query` - Server-side filter; `None` or an empty string lists everyone.
    ///
    /// # Returns
    ///
    /// * `Ok(RemoteCall::List)` to hand to the worker
    /// * `Err(ControllerError::Busy)` if another call is in flight
    pub fn begin_load(&mut self, query: Option<&str>) -> Result<RemoteCall, ControllerError> {
        self.acquire()?;
        Ok(Self::list_call(query))
    }

    /// Store `query` as the current search scope and start a filtered reload.
    ///
    /// A busy rejection leaves the stored query untouched.
    pub fn begin_search(&mut self, query: &str) -> Result<RemoteCall, ControllerError> {
        self.acquire()?;
        self.search_query = query.to_string();
        Ok(Self::list_call(Some(query)))
    }

    // ---- editing ----------------------------------------------------------

    /// Open an edit draft holding a copy of `record`.
    ///
    /// Re-opening the user already being edited keeps the current draft.
    pub fn begin_edit(&mut self, record: &UserRecord) -> Result<(), ControllerError> {
        match &self.draft {
            Draft::Editing(current) if current.id == record.id => Ok(()),
            Draft::Editing(_) | Draft::Creating(_) => Err(ControllerError::DraftOpen),
            Draft::Idle => {
                if !self.users.iter().any(|u| u.id == record.id) {
                    return Err(ControllerError::UnknownUser(record.id));
                }
                self.draft = Draft::Editing(record.clone());
                Ok(())
            }
        }
    }

    /// Overwrite one field of the edit draft. The collection is not touched.
    pub fn update_draft_field(
        &mut self,
        field: UserField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        match &mut self.draft {
            Draft::Editing(record) => {
                record.set_field(field, value.into());
                Ok(())
            }
            _ => Err(ControllerError::NoEditDraft),
        }
    }

    /// Start sending the edit draft to the service.
    ///
    /// # Returns
    ///
    /// * `Ok(RemoteCall::Update)` carrying a copy of the draft
    /// * `Err(ControllerError::NoEditDraft)` if nothing is being edited
    /// * `Err(ControllerError::Busy)` if another call is in flight
    pub fn begin_commit_edit(&mut self) -> Result<RemoteCall, ControllerError> {
        let record = self.edit_draft().cloned().ok_or(ControllerError::NoEditDraft)?;
        self.acquire()?;
        debug!(id = %record.id, "updating user");
        Ok(RemoteCall::Update(record))
    }

    /// Drop the edit draft, if any.
    pub fn cancel_edit(&mut self) {
        if matches!(self.draft, Draft::Editing(_)) {
            self.draft = Draft::Idle;
        }
    }

    // ---- deleting ---------------------------------------------------------

    /// Start deleting the user with `id`.
    ///
    /// Every record with that id leaves the collection once the service
    /// confirms; until then nothing changes.
    pub fn begin_remove(&mut self, id: UserId) -> Result<RemoteCall, ControllerError> {
        self.acquire()?;
        debug!(%id, "deleting user");
        Ok(RemoteCall::Delete(id))
    }

    // ---- creating ---------------------------------------------------------

    /// Open the create form. Already open: keeps what was typed.
    pub fn begin_create(&mut self) -> Result<(), ControllerError> {
        match self.draft {
            Draft::Idle => {
                self.draft = Draft::Creating(NewUser::default());
                Ok(())
            }
            Draft::Creating(_) => Ok(()),
            Draft::Editing(_) => Err(ControllerError::DraftOpen),
        }
    }

    /// Close the create form, discarding its contents.
    pub fn cancel_create(&mut self) {
        if matches!(self.draft, Draft::Creating(_)) {
            self.draft = Draft::Idle;
        }
    }

    pub fn update_create_field(
        &mut self,
        field: UserField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        match &mut self.draft {
            Draft::Creating(user) => {
                user.set_field(field, value.into());
                Ok(())
            }
            _ => Err(ControllerError::NoCreateDraft),
        }
    }

    /// Start creating a user from the create form.
    ///
    /// # Returns
    ///
    /// * `Ok(RemoteCall::Create)` carrying a copy of the form
    /// * `Err(ControllerError::NoCreateDraft)` if the form is closed
    /// * `Err(ControllerError::Busy)` if another call is in flight
    pub fn begin_commit_create(&mut self) -> Result<RemoteCall, ControllerError> {
        let user = self.create_draft().cloned().ok_or(ControllerError::NoCreateDraft)?;
        self.acquire()?;
        debug!("creating user");
        Ok(RemoteCall::Create(user))
    }

    // ---- completion -------------------------------------------------------

    /// Apply the outcome of a call started by one of the `begin_*` methods.
    ///
    /// Releases the busy flag whatever the outcome. A failure leaves users,
    /// slice and draft as they were and lands in the error slot.
    pub fn complete(&mut self, outcome: CallOutcome) -> Result<(), RemoteCallFailure> {
        self.busy = false;
        match outcome {
            CallOutcome::Listed(Ok(users)) => {
                info!(count = users.len(), "users loaded");
                self.users = users;
                self.resync_visible();
                self.last_error = None;
                if let Draft::Editing(record) = &self.draft
                    && !self.users.iter().any(|u| u.id == record.id)
                {
                    debug!(id = %record.id, "edited user left the list, dropping draft");
                    self.draft = Draft::Idle;
                }
                Ok(())
            }
            CallOutcome::Created(Ok(record)) => {
                info!(id = %record.id, "user created");
                self.users.push(record);
                self.resync_visible();
                self.cancel_create();
                Ok(())
            }
            CallOutcome::Updated {
                record,
                result: Ok(()),
            } => {
                info!(id = %record.id, "user updated");
                if let Draft::Editing(current) = &self.draft
                    && current.id == record.id
                {
                    self.draft = Draft::Idle;
                }
                for slot in self.users.iter_mut().filter(|u| u.id == record.id) {
                    *slot = record.clone();
                }
                self.resync_visible();
                Ok(())
            }
            CallOutcome::Deleted { id, result: Ok(()) } => {
                info!(%id, "user deleted");
                self.users.retain(|u| u.id != id);
                self.resync_visible();
                if let Draft::Editing(current) = &self.draft
                    && current.id == id
                {
                    self.draft = Draft::Idle;
                }
                Ok(())
            }
            CallOutcome::Listed(Err(failure)) => {
                self.record_failure("list", &failure);
                Err(failure)
            }
            CallOutcome::Created(Err(failure)) => {
                self.record_failure("create", &failure);
                Err(failure)
            }
            CallOutcome::Updated {
                result: Err(failure),
                ..
            } => {
                self.record_failure("update", &failure);
                Err(failure)
            }
            CallOutcome::Deleted {
                result: Err(failure),
                ..
            } => {
                self.record_failure("delete", &failure);
                Err(failure)
            }
        }
    }

    async fn run<S>(&mut self, service: &S, call: RemoteCall) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let outcome = call.execute(service).await;
        self.complete(outcome)?;
        Ok(())
    }

    /// [`begin_load`](Self::begin_load) and apply the result.
    pub async fn load<S>(&mut self, service: &S, query: Option<&str>) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let call = self.begin_load(query)?;
        self.run(service, call).await
    }

    /// [`begin_search`](Self::begin_search) and apply the result.
    pub async fn search<S>(&mut self, service: &S, query: &str) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let call = self.begin_search(query)?;
        self.run(service, call).await
    }

    /// [`begin_commit_edit`](Self::begin_commit_edit) and apply the result.
    pub async fn commit_edit<S>(&mut self, service: &S) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let call = self.begin_commit_edit()?;
        self.run(service, call).await
    }

    /// [`begin_remove`](Self::begin_remove) and apply the result.
    pub async fn remove<S>(&mut self, service: &S, id: UserId) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let call = self.begin_remove(id)?;
        self.run(service, call).await
    }

    /// [`begin_commit_create`](Self::begin_commit_create) and apply the result.
    pub async fn commit_create<S>(&mut self, service: &S) -> Result<(), ControllerError>
    where
        S: RemoteUserService + ?Sized,
    {
        let call = self.begin_commit_create()?;
        self.run(service, call).await
    }
}
