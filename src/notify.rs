use std::sync::Arc;

use serenity::{
    all::{ButtonStyle, ChannelId},
    builder::{CreateActionRow, CreateButton, CreateEmbed, CreateMessage},
    http::Http,
};
use tracing::error;

use crate::gateways::{AnnouncementDraft, ConclusionNotice, GatewayError, Notifier};

pub const JOIN_BUTTON_ID: &str = "join_giveaway";

/// Sends giveaway announcements and results over the Discord REST API.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordNotifier { http }
    }

    async fn resolve_channel(&self, channel_id: i64) -> Result<ChannelId, GatewayError> {
        let channel = ChannelId::new(channel_id as u64);
        match self.http.get_channel(channel).await {
            Ok(_) => Ok(channel),
            Err(err) => {
                error!(
                    "Could not resolve channel {}. Failed with error: {:?}",
                    channel_id, err
                );
                Err(GatewayError::ChannelUnavailable(channel_id))
            }
        }
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn post_announcement(
        &self,
        channel_id: i64,
        draft: &AnnouncementDraft,
    ) -> Result<i64, GatewayError> {
        let channel = self.resolve_channel(channel_id).await?;

        let mut embed = CreateEmbed::new()
            .title("🎉 GIVEAWAY 🎉")
            .description(format!(
                "**Prize:** {} Robux\n**Winners:** {}\n**Hosted by:** <@{}>\n**Ends:** <t:{}:R>",
                draft.prize,
                draft.winners,
                draft.host_id,
                draft.ends_at.unix_timestamp()
            ))
            .color(0x9b59b6);
        if let Some(image) = &draft.image {
            embed = embed.image(image);
        }

        let message = channel
            .send_message(
                &self.http,
                CreateMessage::new().embed(embed).components(vec![
                    CreateActionRow::Buttons(vec![CreateButton::new(JOIN_BUTTON_ID)
                        .label("🎉 Join Giveaway")
                        .style(ButtonStyle::Primary)]),
                ]),
            )
            .await?;
        Ok(message.id.get() as i64)
    }

    async fn post_result(
        &self,
        channel_id: i64,
        notice: &ConclusionNotice,
    ) -> Result<(), GatewayError> {
        let channel = self.resolve_channel(channel_id).await?;

        if notice.winners.is_empty() {
            channel
                .send_message(
                    &self.http,
                    CreateMessage::new().content("❌ No one joined the giveaway!"),
                )
                .await?;
            return Ok(());
        }

        let mentions = notice
            .winners
            .iter()
            .map(|winner| format!("<@{winner}>"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut embed = CreateEmbed::new()
            .title(if notice.rerolled {
                "🔄 Giveaway Rerolled!"
            } else {
                "🎉 Giveaway Ended!"
            })
            .description(format!(
                "**Winners:** {mentions}\n**Prize:** {} Robux\n**Hosted by:** <@{}>",
                notice.prize, notice.host_id
            ))
            .color(0xf1c40f);
        if let Some(image) = &notice.image {
            embed = embed.image(image);
        }

        channel
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}
