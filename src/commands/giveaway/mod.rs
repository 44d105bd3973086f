use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption},
};
use tracing::error;

use crate::{
    engine::EngineError,
    models::{
        command::{Command, CommandContext},
        handler::Handler,
        response::{ResponseError, ResponseResult},
    },
};

pub mod end;
pub mod new;
pub mod reroll;

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Giveaway commands")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "new",
                    "Start a new giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "prize",
                        "The amount of Robux awarded to each winner",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "winners",
                        "The number of winners for the giveaway",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "duration",
                        "The duration of the giveaway (10s, 5m, 1h, 1d)",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::User,
                        "host",
                        "The user credited as host (default: you)",
                    )
                    .required(false),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        "channel",
                        "The channel to announce the giveaway in (default: here)",
                    )
                    .required(false),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Attachment,
                        "image",
                        "An image shown on the announcement",
                    )
                    .required(false),
                ),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "end",
                "End the active giveaway and draw winners",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "reroll",
                "Draw fresh winners for the active giveaway",
            ))
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        for option in &cmd.data.options {
            match option.name.as_str() {
                "new" => return new::new(handler, ctx, cmd).await,
                "end" => return end::end(handler, ctx, cmd).await,
                "reroll" => return reroll::reroll(handler, ctx, cmd).await,
                _ => continue,
            }
        }

        Err(ResponseError::Execution(
            "Invalid command",
            Some("You must specify a subcommand to use this command!".to_string()),
        ))
    }
}

pub fn engine_error(err: EngineError) -> ResponseError {
    match err {
        EngineError::AlreadyActive => ResponseError::Execution(
            "There is already an active giveaway",
            Some("End the current giveaway before starting a new one.".to_string()),
        ),
        EngineError::NotActive => {
            ResponseError::Execution("There is no active giveaway", None)
        }
        EngineError::AlreadyJoined => {
            ResponseError::Execution("You've already joined this giveaway", None)
        }
        EngineError::InvalidDuration(_) => ResponseError::Execution(
            "Invalid timer format",
            Some("Use a duration such as 10s, 5m, 1h or 1d.".to_string()),
        ),
        EngineError::InvalidParams(message) => ResponseError::Execution(message, None),
        EngineError::Gateway(err) => {
            error!("Giveaway command failed on a gateway call: {}", err);
            ResponseError::Execution(
                "Something went wrong while running this command",
                Some("Please try again later.".to_string()),
            )
        }
    }
}
