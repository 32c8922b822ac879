use crate::domain::model::UserRecord;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRow<'a> {
    uid: &'a str,
    email: Option<&'a str>,
    full_name: Option<&'a str>,
    role: Option<&'a str>,
    gender: Option<&'a str>,
    phone_number: Option<&'a str>,
    dob: Option<&'a str>,
    created_at: Option<&'a str>,
    rating: Option<f64>,
    feedback: Option<&'a str>,
}

impl<'a> From<&'a UserRecord> for UserRow<'a> {
    fn from(user: &'a UserRecord) -> Self {
        Self {
            uid: &user.uid,
            email: user.email.as_deref(),
            full_name: user.full_name.as_deref(),
            role: user.role.as_deref(),
            gender: user.gender.as_deref(),
            phone_number: user.phone_number.as_deref(),
            dob: user.dob.as_deref(),
            created_at: user.created_at.as_deref(),
            rating: user.rating,
            feedback: user.feedback_text.as_deref(),
        }
    }
}

pub fn write_users_csv<W: Write>(users: &[UserRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for user in users {
        csv_writer.serialize(UserRow::from(user))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_users_csv(users: &[UserRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_users_csv(users, file)?;
    tracing::info!("Exported {} users to {}", users.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> UserRecord {
        UserRecord {
            uid: "u1".to_string(),
            email: Some("ana@example.com".to_string()),
            full_name: Some("Lima, Ana".to_string()),
            role: Some("user".to_string()),
            photo_url: None,
            created_at: None,
            feedback_text: Some("Great".to_string()),
            rating: Some(5.0),
            dob: Some("17/03/1990".to_string()),
            gender: None,
            phone_number: None,
        }
    }

    #[test]
    fn test_write_users_csv() {
        let mut out = Vec::new();
        write_users_csv(&[user()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("uid,email,fullName,role,gender,phoneNumber,dob,createdAt,rating,feedback")
        );
        assert_eq!(
            lines.next(),
            Some("u1,ana@example.com,\"Lima, Ana\",user,,,17/03/1990,,5.0,Great")
        );
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports/users.csv");
        export_users_csv(&[user()], &path).unwrap();
        assert!(path.exists());
    }
}
