//! Student records service

use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        self.repository.students.list().await
    }

    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<Student>> {
        let term = term.ok_or_else(|| AppError::Validation("Search term is required".to_string()))?;
        self.repository.students.search(term).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    pub async fn create(&self, data: &StudentInput) -> AppResult<Student> {
        self.repository.students.create(data).await
    }

    pub async fn update(&self, id: i32, data: &StudentInput) -> AppResult<Student> {
        self.repository.students.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.students.delete(id).await?;
        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }
}
