use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, ComponentInteraction},
    builder::CreateCommand,
    prelude::Context as IncomingContext,
};

use super::{
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

pub struct CommandContext {
    pub ctx: IncomingContext,
    pub has_responsed: AtomicBool,
}

/// Used when a command cannot be dispatched normally, for example outside of
/// a guild, but the user still deserves a reply.
pub struct FailedCommandContext {
    pub ctx: IncomingContext,
}

pub struct InteractionContext {
    pub ctx: IncomingContext,
    pub interaction: ComponentInteraction,
    pub has_responsed: AtomicBool,
}

impl InteractionContext {
    pub fn new(ctx: IncomingContext, interaction: &ComponentInteraction) -> Self {
        InteractionContext {
            ctx,
            interaction: interaction.clone(),
            has_responsed: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
pub trait CommandContextReply {
    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult;
}

#[async_trait::async_trait]
pub trait InteractionContextReply {
    async fn reply(&self, response: Response) -> ResponseResult;
    async fn error_message(&self, error: ResponseError) -> ResponseResult;
}

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self) -> CreateCommand;
    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult;
}
