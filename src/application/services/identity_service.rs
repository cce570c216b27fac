use crate::application::ports::auth_gateway::AuthGateway;
use crate::application::ports::repositories::{
    OrganizerRepository, ProfileRepository, StudentRepository,
};
use crate::domain::entities::{Account, Organizer, Profile, Role, Student};
use crate::domain::value_objects::Usn;
use crate::shared::error::AppError;
use crate::shared::validation;
use std::sync::Arc;
use tracing::debug;

/// Outcome of resolving the signed-in account to a role.
///
/// `ProfileIncomplete` is a terminal state the UI routes to the
/// profile-completion flow; it is not an error and never defaults a role.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Student(Student),
    Organizer(Organizer),
    ProfileIncomplete,
}

pub struct IdentityService {
    auth: Arc<dyn AuthGateway>,
    profiles: Arc<dyn ProfileRepository>,
    students: Arc<dyn StudentRepository>,
    organizers: Arc<dyn OrganizerRepository>,
}

impl IdentityService {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        profiles: Arc<dyn ProfileRepository>,
        students: Arc<dyn StudentRepository>,
        organizers: Arc<dyn OrganizerRepository>,
    ) -> Self {
        Self {
            auth,
            profiles,
            students,
            organizers,
        }
    }

    pub async fn current_account(&self) -> Result<Account, AppError> {
        self.auth
            .current_account()
            .await?
            .ok_or_else(|| AppError::Unauthenticated("no active session".to_string()))
    }

    /// Resolves the signed-in account to its role and profile record.
    /// Primary-key lookup on the account id; the email scan across role
    /// collections is a fallback for legacy rows with no profile document.
    pub async fn resolve(&self) -> Result<Resolution, AppError> {
        let account = self.current_account().await?;

        if let Some(profile) = self.profiles.get_profile(&account.id).await? {
            return match profile.role {
                Role::Student => Ok(self
                    .students
                    .get_student(&account.id)
                    .await?
                    .map(Resolution::Student)
                    .unwrap_or(Resolution::ProfileIncomplete)),
                Role::Organizer => Ok(self
                    .organizers
                    .get_organizer(&account.id)
                    .await?
                    .map(Resolution::Organizer)
                    .unwrap_or(Resolution::ProfileIncomplete)),
            };
        }

        // Legacy fallback: role records keyed by email only. Students take
        // precedence, matching the original resolution order.
        debug!(account_id = %account.id, "no profile document, falling back to email scan");
        if let Some(student) = self.students.get_student_by_email(&account.email).await? {
            return Ok(Resolution::Student(student));
        }
        if let Some(organizer) = self
            .organizers
            .get_organizer_by_email(&account.email)
            .await?
        {
            return Ok(Resolution::Organizer(organizer));
        }

        Ok(Resolution::ProfileIncomplete)
    }

    pub async fn require_student(&self) -> Result<Student, AppError> {
        match self.resolve().await? {
            Resolution::Student(student) => Ok(student),
            Resolution::Organizer(_) => Err(AppError::WrongRole(
                "operation requires a student account".to_string(),
            )),
            Resolution::ProfileIncomplete => Err(AppError::Unauthenticated(
                "complete your profile before continuing".to_string(),
            )),
        }
    }

    pub async fn require_organizer(&self) -> Result<Organizer, AppError> {
        match self.resolve().await? {
            Resolution::Organizer(organizer) => Ok(organizer),
            Resolution::Student(_) => Err(AppError::WrongRole(
                "operation requires an organizer account".to_string(),
            )),
            Resolution::ProfileIncomplete => Err(AppError::Unauthenticated(
                "complete your profile before continuing".to_string(),
            )),
        }
    }

    /// Creates the student role for the signed-in account, exactly once.
    pub async fn register_student_profile(
        &self,
        name: &str,
        usn: &Usn,
        semester: u8,
        contact_no: Option<&str>,
    ) -> Result<Student, AppError> {
        let account = self.current_account().await?;
        let name = validation::require_non_empty("name", name)?;
        validation::validate_semester(semester)?;
        let contact_no = contact_no
            .map(|c| validation::validate_contact_no(c).map(str::to_string))
            .transpose()?;

        if self.profiles.get_profile(&account.id).await?.is_some() {
            return Err(AppError::AlreadyRegistered(
                "account already has a profile".to_string(),
            ));
        }

        let profile = Profile::new(&account, Role::Student);
        let student = Student::new(
            account.id.clone(),
            name.to_string(),
            usn.clone(),
            account.email.clone(),
            semester,
            contact_no,
        );
        self.profiles.create_profile(&profile).await?;
        self.students.create_student(&student).await?;
        Ok(student)
    }

    /// Creates the organizer role for the signed-in account, exactly once.
    pub async fn register_organizer_profile(
        &self,
        org_name: &str,
        description: &str,
    ) -> Result<Organizer, AppError> {
        let account = self.current_account().await?;
        let org_name = validation::require_non_empty("organization name", org_name)?;

        if self.profiles.get_profile(&account.id).await?.is_some() {
            return Err(AppError::AlreadyRegistered(
                "account already has a profile".to_string(),
            ));
        }

        let profile = Profile::new(&account, Role::Organizer);
        let organizer = Organizer::new(
            account.id.clone(),
            org_name.to_string(),
            account.email.clone(),
            description.to_string(),
        );
        self.profiles.create_profile(&profile).await?;
        self.organizers.create_organizer(&organizer).await?;
        Ok(organizer)
    }
}
