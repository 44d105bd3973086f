use std::sync::atomic::Ordering;

use serenity::{
    all::CommandInteraction,
    builder::{
        CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
};
use tracing::error;

use crate::models::{
    command::{
        CommandContext, CommandContextReply, FailedCommandContext, InteractionContext,
        InteractionContextReply,
    },
    response::{Response, ResponseError, ResponseResult},
};

#[async_trait::async_trait]
impl CommandContextReply for CommandContext {
    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        if self.has_responsed.load(Ordering::Relaxed) {
            let mut edit = EditInteractionResponse::new();
            if let Some(content) = response.content {
                edit = edit.content(content);
            }
            if let Some(embeds) = response.embeds {
                edit = edit.embeds(embeds);
            }

            if let Err(err) = cmd.edit_response(&self.ctx.http, edit).await {
                error!("Attempted to edit a response to a command, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        } else {
            let mut reply = CreateInteractionResponseMessage::new();
            if let Some(content) = response.content {
                reply = reply.content(content);
            }
            if let Some(embeds) = response.embeds {
                reply = reply.embeds(embeds);
            }
            if response.ephemeral {
                reply = reply.ephemeral(true);
            }

            match cmd
                .create_response(&self.ctx.http, CreateInteractionResponse::Message(reply))
                .await
            {
                Ok(_) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                }
                Err(err) => {
                    error!("Attempted to create a response to a command, failed with error: {err}");
                    return Err(ResponseError::Serenity(err));
                }
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CommandContextReply for FailedCommandContext {
    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult {
        let mut reply = CreateInteractionResponseMessage::new();
        if let Some(content) = response.content {
            reply = reply.content(content);
        }
        if let Some(embeds) = response.embeds {
            reply = reply.embeds(embeds);
        }
        if response.ephemeral {
            reply = reply.ephemeral(true);
        }

        if let Err(err) = cmd
            .create_response(&self.ctx.http, CreateInteractionResponse::Message(reply))
            .await
        {
            error!("Attempted to create a response to a command, failed with error: {err}");
            return Err(ResponseError::Serenity(err));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl InteractionContextReply for InteractionContext {
    async fn reply(&self, response: Response) -> ResponseResult {
        if self.has_responsed.load(Ordering::Relaxed) {
            let mut edit = EditInteractionResponse::new();
            if let Some(content) = response.content {
                edit = edit.content(content);
            }
            if let Some(embeds) = response.embeds {
                edit = edit.embeds(embeds);
            }

            if let Err(err) = self.interaction.edit_response(&self.ctx.http, edit).await {
                error!("Attempted to edit an interaction response, failed with error: {err}");
                return Err(ResponseError::Serenity(err));
            }
        } else {
            let mut reply = CreateInteractionResponseMessage::new();
            if let Some(content) = response.content {
                reply = reply.content(content);
            }
            if let Some(embeds) = response.embeds {
                reply = reply.embeds(embeds);
            }
            if response.ephemeral {
                reply = reply.ephemeral(true);
            }

            match self
                .interaction
                .create_response(&self.ctx.http, CreateInteractionResponse::Message(reply))
                .await
            {
                Ok(_) => {
                    self.has_responsed.store(true, Ordering::Relaxed);
                }
                Err(err) => {
                    error!(
                        "Attempted to create a response to an interaction, failed with error: {err}"
                    );
                    return Err(ResponseError::Serenity(err));
                }
            }
        }

        Ok(())
    }

    async fn error_message(&self, error: ResponseError) -> ResponseResult {
        let embed = match error {
            ResponseError::Execution(title, description) => {
                let mut embed = CreateEmbed::new().title(title).color(0xff0000);
                if let Some(description) = description {
                    embed = embed.description(description);
                }
                embed
            }
            ResponseError::Serenity(err) => {
                return Err(ResponseError::Serenity(err));
            }
        };

        self.reply(Response::new().embed(embed).ephemeral(true)).await
    }
}
