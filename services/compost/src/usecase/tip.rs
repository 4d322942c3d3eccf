use chrono::Utc;
use uuid::Uuid;

use compost_domain::pagination::PageRequest;

use crate::domain::repository::TipRepository;
use crate::domain::types::{TITLE_MAX_LEN, Tip};
use crate::error::CompostServiceError;
use crate::usecase::forum::CONTENT_MAX_LEN;
use crate::usecase::required_text;

pub struct ListTipsUseCase<R: TipRepository> {
    pub repo: R,
}

impl<R: TipRepository> ListTipsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Tip>, CompostServiceError> {
        self.repo.list(page.clamped()).await
    }
}

pub struct CreateTipInput {
    pub title: String,
    pub content: String,
}

pub struct CreateTipUseCase<R: TipRepository> {
    pub repo: R,
}

impl<R: TipRepository> CreateTipUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateTipInput,
    ) -> Result<Tip, CompostServiceError> {
        let tip = Tip {
            id: Uuid::now_v7(),
            author_id: user_id,
            title: required_text(&input.title, "title", TITLE_MAX_LEN)?,
            content: required_text(&input.content, "content", CONTENT_MAX_LEN)?,
            created_at: Utc::now(),
        };
        self.repo.create(&tip).await?;
        Ok(tip)
    }
}
