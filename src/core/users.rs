use crate::core::date_math::{age_from_birthdate, parse_iso_date, to_iso_date, LEGACY_FORMAT};
use crate::core::notice::NoticeBoard;
use crate::domain::model::{
    AddUserRequest, AgeBreakdown, EditUserRequest, NoticeKind, UserListResponse, UserRecord,
};
use crate::domain::ports::UserDirectory;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;

/// What the add-user form collects. `dob` comes from a date picker, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddUserForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub gender: String,
    pub dob: String,
    pub phone_number: String,
    pub photo_base64: String,
}

impl AddUserForm {
    /// Converts the form into the façade's payload: legacy `dob` plus the
    /// age in whole years at `today`.
    pub fn into_request(self, today: NaiveDate) -> Result<AddUserRequest> {
        validate_non_empty_string("email", &self.email)?;
        validate_non_empty_string("password", &self.password)?;
        validate_non_empty_string("fullName", &self.full_name)?;

        let birth = parse_iso_date(&self.dob)?;
        let age = age_from_birthdate(birth, today)?;

        Ok(AddUserRequest {
            email: self.email,
            password: self.password,
            full_name: self.full_name,
            role: self.role,
            gender: self.gender,
            phone_number: self.phone_number,
            photo_base64: self.photo_base64,
            dob: birth.format(LEGACY_FORMAT).to_string(),
            age: age.years.to_string(),
        })
    }
}

/// A user as the edit form shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub uid: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub dob_iso: Option<String>,
    pub age: Option<AgeBreakdown>,
}

impl ProfileView {
    pub fn from_record(user: &UserRecord, today: NaiveDate) -> Self {
        let dob = user.dob.as_deref().filter(|dob| !dob.is_empty());
        let dob_iso = dob.and_then(|dob| match to_iso_date(dob) {
            Ok(iso) => Some(iso),
            Err(e) => {
                tracing::warn!("User {} has an unreadable dob: {}", user.uid, e);
                None
            }
        });
        let age = dob_iso
            .as_deref()
            .and_then(|iso| parse_iso_date(iso).ok())
            .and_then(|birth| age_from_birthdate(birth, today).ok());

        Self {
            uid: user.uid.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            gender: user.gender.clone(),
            phone_number: user.phone_number.clone(),
            photo_url: user.photo_url.clone(),
            dob_iso,
            age,
        }
    }
}

pub fn find_user<'a>(list: &'a UserListResponse, uid: &str) -> Option<&'a UserRecord> {
    list.user_list.iter().find(|user| user.uid == uid)
}

/// User list and mutations, with a notice raised after every mutation.
pub struct UserManager<D: UserDirectory> {
    directory: D,
    notices: NoticeBoard,
}

impl<D: UserDirectory> UserManager<D> {
    pub fn new(directory: D, notices: NoticeBoard) -> Self {
        Self {
            directory,
            notices,
        }
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub async fn refresh(&self) -> Result<UserListResponse> {
        let list = self.directory.list_users().await?;
        tracing::debug!(
            "Fetched {} profiles out of {} accounts",
            list.user_list.len(),
            list.count
        );
        Ok(list)
    }

    pub async fn add_user(&self, form: AddUserForm, today: NaiveDate) -> Result<()> {
        let email = form.email.clone();
        self.track("add", async {
            let request = form.into_request(today)?;
            self.directory.add_user(&request).await
        })
        .await?;
        tracing::info!("Added user {}", email);
        Ok(())
    }

    pub async fn edit_user(&self, uid: &str, request: &EditUserRequest) -> Result<()> {
        self.track("edit", self.directory.edit_user(uid, request))
            .await?;
        tracing::info!("Updated user {}", uid);
        Ok(())
    }

    pub async fn delete_user(&self, uid: &str) -> Result<()> {
        self.track("delete", self.directory.delete_user(uid)).await?;
        tracing::info!("Deleted user {}", uid);
        Ok(())
    }

    async fn track<T, F>(&self, action: &str, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match operation.await {
            Ok(value) => {
                self.notices.show(NoticeKind::Success);
                Ok(value)
            }
            Err(e) => {
                tracing::error!("User {} failed: {}", action, e);
                self.notices.show(NoticeKind::Failure);
                Err(e)
            }
        }
    }
}
