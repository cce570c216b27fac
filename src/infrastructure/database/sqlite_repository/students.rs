use super::queries::{
    INSERT_STUDENT, PRUNE_STUDENT_EVENTS, SELECT_STUDENT, SELECT_STUDENT_BY_EMAIL,
    SELECT_STUDENT_BY_USN, SELECT_STUDENT_EVENT_IDS, UPDATE_STUDENT,
};
use super::{SqliteRepository, is_unique_violation};
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::StudentRepository;
use crate::domain::entities::Student;
use crate::domain::value_objects::{EventId, Usn};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct StudentRow {
    account_id: String,
    name: String,
    usn: String,
    email: String,
    semester: i64,
    contact_no: Option<String>,
    created_at: i64,
}

impl StudentRow {
    fn into_domain(self) -> Result<Student, AppError> {
        let usn = Usn::new(&self.usn)
            .map_err(|err| AppError::Serialization(format!("invalid USN in student row: {err}")))?;
        let semester = u8::try_from(self.semester).map_err(|_| {
            AppError::Serialization(format!("invalid semester in student row: {}", self.semester))
        })?;
        Ok(Student {
            account_id: self.account_id,
            name: self.name,
            usn,
            email: self.email,
            semester,
            contact_no: self.contact_no,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl StudentRepository for SqliteRepository {
    async fn create_student(&self, student: &Student) -> Result<(), AppError> {
        sqlx::query(INSERT_STUDENT)
            .bind(&student.account_id)
            .bind(&student.name)
            .bind(student.usn.as_str())
            .bind(&student.email)
            .bind(i64::from(student.semester))
            .bind(&student.contact_no)
            .bind(student.created_at)
            .execute(self.pool.get_pool())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::AlreadyRegistered(format!(
                        "student record exists for {}",
                        student.usn
                    ))
                } else {
                    err.into()
                }
            })?;
        self.notify(StoreCollection::Students);
        Ok(())
    }

    async fn get_student(&self, account_id: &str) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(SELECT_STUDENT)
            .bind(account_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(StudentRow::into_domain).transpose()
    }

    async fn get_student_by_usn(&self, usn: &Usn) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(SELECT_STUDENT_BY_USN)
            .bind(usn.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(StudentRow::into_domain).transpose()
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(SELECT_STUDENT_BY_EMAIL)
            .bind(email)
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(StudentRow::into_domain).transpose()
    }

    async fn update_student(&self, student: &Student) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_STUDENT)
            .bind(&student.name)
            .bind(student.usn.as_str())
            .bind(i64::from(student.semester))
            .bind(&student.contact_no)
            .bind(&student.account_id)
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "student {}",
                student.account_id
            )));
        }
        self.notify(StoreCollection::Students);
        Ok(())
    }

    async fn registered_event_ids(&self, usn: &Usn) -> Result<Vec<EventId>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_STUDENT_EVENT_IDS)
            .bind(usn.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter()
            .map(|(id,)| {
                EventId::new(id).map_err(|err| {
                    AppError::Serialization(format!("invalid event id in reference list: {err}"))
                })
            })
            .collect()
    }

    async fn prune_orphan_references(&self) -> Result<u32, AppError> {
        let result = sqlx::query(PRUNE_STUDENT_EVENTS)
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() > 0 {
            self.notify(StoreCollection::Students);
        }
        Ok(result.rows_affected() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_repository;
    use super::*;

    fn sample_student() -> Student {
        Student::new(
            "uid-1".to_string(),
            "Asha Rao".to_string(),
            Usn::new("4NI21CS001").unwrap(),
            "asha@college.edu".to_string(),
            4,
            Some("9876543210".to_string()),
        )
    }

    #[tokio::test]
    async fn create_and_lookup_by_all_keys() {
        let repo = memory_repository().await;
        repo.create_student(&sample_student()).await.expect("created");

        let by_account = repo.get_student("uid-1").await.unwrap().unwrap();
        assert_eq!(by_account.name, "Asha Rao");

        let by_usn = repo
            .get_student_by_usn(&Usn::new("4NI21CS001").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_usn.account_id, "uid-1");

        let by_email = repo
            .get_student_by_email("asha@college.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.account_id, "uid-1");
    }

    #[tokio::test]
    async fn duplicate_usn_is_rejected() {
        let repo = memory_repository().await;
        repo.create_student(&sample_student()).await.expect("created");
        let mut other = sample_student();
        other.account_id = "uid-2".to_string();
        other.email = "other@college.edu".to_string();
        let result = repo.create_student(&other).await;
        assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn update_missing_student_is_not_found() {
        let repo = memory_repository().await;
        let result = repo.update_student(&sample_student()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn reference_list_is_empty_for_new_student() {
        let repo = memory_repository().await;
        repo.create_student(&sample_student()).await.expect("created");
        let ids = repo
            .registered_event_ids(&Usn::new("4NI21CS001").unwrap())
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
