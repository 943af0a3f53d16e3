//! Rating and review endpoints

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::warn;

use crate::api::constants::{RATING_MAX, RATING_MIN, REVIEW_TEXT_MAX_CHARS, REVIEW_TEXT_MIN_CHARS};
use crate::api::middleware::CurrentUser;
use crate::errors::AgentHubError;
use crate::storage::{Agent, HubStorage, Review};

use super::agents::clamp_page;
use super::error_code::ErrorCode;
use super::helpers::{error_from_hub, error_response, success_response, success_with_message};
use super::types::{
    HelpfulAck, PageQuery, RatingAck, RatingCreateRequest, RatingStatsResponse,
    ReviewCreateRequest, ReviewResponse, UserResponse,
};

async fn agent_or_404(
    storage: &HubStorage,
    agent_id: i64,
) -> Result<Agent, actix_web::HttpResponse> {
    match storage.find_agent(agent_id).await {
        Ok(Some(agent)) => Ok(agent),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::AgentNotFound,
            "Agent not found",
        )),
        Err(e) => Err(error_from_hub(&e)),
    }
}

fn validate_rating(rating: i16) -> Result<(), actix_web::HttpResponse> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRating,
            "Rating must be between 1 and 5",
        ));
    }
    Ok(())
}

/// POST /agents/{id}/rate - bare star rating without a review
pub async fn rate_agent(
    path: web::Path<i64>,
    body: web::Json<RatingCreateRequest>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    if let Err(response) = agent_or_404(&storage, agent_id).await {
        return Ok(response);
    }
    if let Err(response) = validate_rating(body.rating) {
        return Ok(response);
    }

    if let Err(e) = storage.upsert_rating(agent_id, user.id, body.rating).await {
        return Ok(error_from_hub(&e));
    }

    let stats = match storage.rating_stats(agent_id).await {
        Ok(stats) => stats,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    Ok(success_with_message(
        "Rating submitted successfully",
        RatingAck {
            rating: body.rating,
            average_rating: stats.average_rating,
            total_ratings: stats.rating_count,
        },
    ))
}

/// GET /agents/{id}/rating-stats
pub async fn rating_stats(
    path: web::Path<i64>,
    _user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    if let Err(response) = agent_or_404(&storage, agent_id).await {
        return Ok(response);
    }

    match storage.rating_stats(agent_id).await {
        Ok(stats) => Ok(success_response(RatingStatsResponse::from(stats))),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /agents/{id}/review - create or update the caller's review
pub async fn upsert_review(
    path: web::Path<i64>,
    body: web::Json<ReviewCreateRequest>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    let agent = match agent_or_404(&storage, agent_id).await {
        Ok(agent) => agent,
        Err(response) => return Ok(response),
    };

    if !agent.is_approved() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AgentNotApproved,
            "Cannot review agents that are not approved",
        ));
    }

    if let Err(response) = validate_rating(body.rating) {
        return Ok(response);
    }

    let trimmed_len = body.review_text.trim().chars().count();
    if trimmed_len < REVIEW_TEXT_MIN_CHARS {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidReviewText,
            "Review must be at least 10 characters",
        ));
    }
    if trimmed_len > REVIEW_TEXT_MAX_CHARS {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidReviewText,
            "Review must be at most 1000 characters",
        ));
    }

    match storage
        .upsert_review(agent_id, user.id, body.rating, &body.review_text)
        .await
    {
        Ok(review) => Ok(success_response(ReviewResponse::from_parts(
            &review,
            UserResponse::from_user(&user),
        ))),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// GET /agents/{id}/reviews - paginated, newest first
pub async fn get_reviews(
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
    _user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();
    let (skip, limit) = clamp_page(query.skip, query.limit);

    if let Err(response) = agent_or_404(&storage, agent_id).await {
        return Ok(response);
    }

    let reviews = match storage.list_reviews(agent_id, skip, limit).await {
        Ok(reviews) => reviews,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    let responses = match reviews_with_users(&storage, reviews).await {
        Ok(responses) => responses,
        Err(e) => return Ok(error_from_hub(&e)),
    };

    Ok(success_response(responses))
}

async fn reviews_with_users(
    storage: &HubStorage,
    reviews: Vec<Review>,
) -> Result<Vec<ReviewResponse>, AgentHubError> {
    let mut responses = Vec::with_capacity(reviews.len());
    for review in reviews {
        match storage.find_user(review.user_id).await? {
            Some(reviewer) => {
                responses.push(ReviewResponse::from_parts(
                    &review,
                    UserResponse::from_user(&reviewer),
                ));
            }
            None => warn!("Review {} has no user row ({})", review.id, review.user_id),
        }
    }
    Ok(responses)
}

/// DELETE /agents/{id}/review - remove the caller's own review
pub async fn delete_review(
    path: web::Path<i64>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let agent_id = path.into_inner();

    match storage.delete_review(agent_id, user.id).await {
        Ok(()) => Ok(success_with_message("Review deleted successfully", ())),
        Err(AgentHubError::NotFound(_)) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::ReviewNotFound,
            "Review not found",
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}

/// POST /agents/{id}/reviews/{review_id}/helpful
///
/// Authors cannot vote for their own review; the count is left untouched.
pub async fn mark_helpful(
    path: web::Path<(i64, i64)>,
    user: CurrentUser,
    storage: web::Data<Arc<HubStorage>>,
) -> ActixResult<impl Responder> {
    let (agent_id, review_id) = path.into_inner();

    let review = match storage.find_review_by_id(agent_id, review_id).await {
        Ok(Some(review)) => review,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::ReviewNotFound,
                "Review not found",
            ));
        }
        Err(e) => return Ok(error_from_hub(&e)),
    };

    if review.user_id == user.id {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OwnReviewVote,
            "Cannot mark your own review as helpful",
        ));
    }

    match storage.increment_helpful(agent_id, review_id).await {
        Ok(helpful_count) => Ok(success_with_message(
            "Review marked as helpful",
            HelpfulAck { helpful_count },
        )),
        Err(e) => Ok(error_from_hub(&e)),
    }
}
