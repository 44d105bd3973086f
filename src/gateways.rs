use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::models::giveaway::Giveaway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database operation failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
    #[error("channel {0} is not available")]
    ChannelUnavailable(i64),
}

/// Everything the announcement embed needs before the giveaway has a
/// message id to be keyed by.
#[derive(Clone, Debug)]
pub struct AnnouncementDraft {
    pub prize: i64,
    pub winners: i32,
    pub host_id: i64,
    pub image: Option<String>,
    pub ends_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct ConclusionNotice {
    pub prize: i64,
    pub host_id: i64,
    pub image: Option<String>,
    pub winners: Vec<i64>,
    pub rerolled: bool,
}

/// Durable storage for the single active giveaway.
#[async_trait]
pub trait GiveawayStore: Send + Sync {
    async fn find_active(&self) -> Result<Option<Giveaway>, GatewayError>;
    async fn insert(&self, giveaway: &Giveaway) -> Result<(), GatewayError>;
    async fn append_participant(&self, giveaway_id: i64, user_id: i64)
        -> Result<(), GatewayError>;
    async fn delete(&self, giveaway_id: i64) -> Result<(), GatewayError>;
}

/// Outbound channel messages. `post_announcement` returns the id of the
/// posted message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_announcement(
        &self,
        channel_id: i64,
        draft: &AnnouncementDraft,
    ) -> Result<i64, GatewayError>;
    async fn post_result(
        &self,
        channel_id: i64,
        notice: &ConclusionNotice,
    ) -> Result<(), GatewayError>;
}

/// Credits prize points to a user's balance.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn credit(&self, user_id: i64, amount: i64) -> Result<(), GatewayError>;
}
