//! Review endpoints under `/reviews`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use taroudant_domain::api::{ReviewApi, ReviewDraft};
use taroudant_domain::entity::PlaceId;
use taroudant_domain::error::Result;
use taroudant_domain::types::{Rating, Review, ReviewId, UserId};

use crate::ApiClient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewDto {
    id: ReviewId,
    user_id: UserId,
    place_id: PlaceId,
    rating: Rating,
    comment: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        Self {
            id: dto.id,
            author: dto.user_id,
            place: dto.place_id,
            rating: dto.rating,
            comment: dto.comment,
            created_at: dto.created_at,
        }
    }
}

#[async_trait]
impl ReviewApi for ApiClient {
    async fn submit(&self, draft: ReviewDraft) -> Result<Review> {
        let body = json!({
            "placeId": draft.place,
            "rating": draft.rating,
            "comment": draft.comment,
        });
        let dto: ReviewDto = self.post_json("/reviews", &body).await?;
        Ok(dto.into())
    }

    async fn list_for_place(&self, place: PlaceId) -> Result<Vec<Review>> {
        let dtos: Vec<ReviewDto> = self.get_json(&format!("/reviews/place/{place}")).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Review>> {
        let dtos: Vec<ReviewDto> = self.get_json("/reviews/all").await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: ReviewId) -> Result<()> {
        self.delete_path(&format!("/reviews/{id}")).await
    }
}
