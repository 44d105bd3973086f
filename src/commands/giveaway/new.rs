use serenity::{all::CommandInteraction, builder::CreateEmbed};

use crate::{
    common::options::Options,
    engine::StartGiveaway,
    models::{
        command::{CommandContext, CommandContextReply},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::engine_error;

pub async fn new(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(prize) = options.get_integer("prize") else {
        return Err(ResponseError::Execution(
            "Could not get the prize amount",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let Some(winners) = options.get_integer("winners") else {
        return Err(ResponseError::Execution(
            "Could not get the winner count",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let Some(duration) = options.get_string("duration").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get the duration",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };

    let host_id = options
        .get_user("host")
        .into_owned()
        .map_or(cmd.user.id.get() as i64, |host| host.id.get() as i64);
    let channel_id = options
        .get_channel("channel")
        .into_owned()
        .map_or(cmd.channel_id.get() as i64, |channel| {
            channel.id.get() as i64
        });
    let image = options
        .get_attachment("image")
        .into_owned()
        .map(|attachment| attachment.url);

    let params = StartGiveaway {
        channel_id,
        prize,
        winners: winners as i32,
        host_id,
        image,
        duration,
    };
    match handler.engine.start(params).await {
        Ok(giveaway) => {
            ctx.reply(
                cmd,
                Response::new()
                    .embed(
                        CreateEmbed::new()
                            .title("Giveaway started")
                            .description(format!(
                                "The giveaway is live in <#{}>.",
                                giveaway.channel_id
                            ))
                            .color(0x00ff00),
                    )
                    .ephemeral(true),
            )
            .await
        }
        Err(err) => Err(engine_error(err)),
    }
}
