use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    engine::ConcludeMode,
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseResult},
    },
};

use super::engine_error;

pub async fn reroll(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    match handler.engine.conclude(ConcludeMode::Reroll).await {
        Ok(_) => {
            ctx.reply(
                cmd,
                Response::new()
                    .embed(CreateEmbed::new().title("Successfully rerolled giveaway"))
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => Err(engine_error(err)),
    }
}
