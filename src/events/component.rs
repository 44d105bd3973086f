use serenity::{all::ComponentInteraction, prelude::Context as IncomingContext};
use tracing::error;

use crate::{
    engine::EngineError,
    models::{
        command::{InteractionContext, InteractionContextReply},
        handler::Handler,
        response::{Response, ResponseError},
    },
    notify::JOIN_BUTTON_ID,
};

impl Handler {
    pub async fn on_component(&self, ctx: IncomingContext, interaction: ComponentInteraction) {
        if interaction.data.custom_id != JOIN_BUTTON_ID {
            return;
        }

        let user_id = interaction.user.id.get() as i64;
        let interaction_context = InteractionContext::new(ctx, &interaction);

        match self.engine.join(user_id).await {
            Ok(()) => {
                if let Err(err) = interaction_context
                    .reply(
                        Response::new()
                            .content("✅ You've successfully joined the giveaway!".to_string())
                            .ephemeral(true),
                    )
                    .await
                {
                    error!(
                        "Could not acknowledge giveaway entry. Failed with error: {:?}",
                        err
                    );
                }
            }
            Err(err) => {
                let response = match err {
                    EngineError::NotActive => {
                        ResponseError::Execution("This giveaway has ended!", None)
                    }
                    EngineError::AlreadyJoined => {
                        ResponseError::Execution("You've already joined this giveaway!", None)
                    }
                    err => {
                        error!(
                            "Could not register entry of user {}. Failed with error: {}",
                            user_id, err
                        );
                        ResponseError::Execution(
                            "Failed to enter giveaway",
                            Some(
                                "We failed to enter you into the giveaway, please try again later."
                                    .to_string(),
                            ),
                        )
                    }
                };
                if let Err(err) = interaction_context.error_message(response).await {
                    error!(
                        "Could not notify user of failed giveaway entry. Failed with error: {:?}",
                        err
                    );
                }
            }
        }
    }
}
