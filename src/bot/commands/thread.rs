//! Commands used inside help threads: close, topic and the open thread list.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, checks, render},
        core::{lifecycle::Transition, notice::Method},
        errors::Result,
    };
    use poise::CreateReply;
    use tracing::debug;

    /// Closes the help thread this is used in.
    ///
    /// Outside a help thread the command does nothing.
    #[poise::command(prefix_command, guild_only, check = "checks::is_thread")]
    pub async fn close(ctx: Context<'_>) -> Result<()> {
        let Some(actor) = checks::invoking_actor(ctx).await else {
            return Ok(());
        };
        let desk = ctx.data().help_desk(ctx.serenity_context());
        let outcome = desk
            .close_thread(ctx.channel_id(), &actor, Method::Command)
            .await?;
        if outcome != Transition::Applied {
            debug!(channel = %ctx.channel_id(), ?outcome, "Close command had no effect");
        }
        Ok(())
    }

    /// Changes the topic of the current help thread, keeping the author id.
    #[poise::command(
        prefix_command,
        guild_only,
        aliases("helptopic"),
        check = "checks::can_close"
    )]
    pub async fn topic(
        ctx: Context<'_>,
        #[rest]
        #[description = "New topic"]
        new_topic: String,
    ) -> Result<()> {
        let Some(actor) = checks::invoking_actor(ctx).await else {
            return Ok(());
        };
        let desk = ctx.data().help_desk(ctx.serenity_context());
        if desk
            .retitle(ctx.channel_id(), &actor, &new_topic)
            .await?
            .is_none()
        {
            ctx.say("This command can only be used in help threads!")
                .await?;
        }
        Ok(())
    }

    /// Lists every open help thread.
    #[poise::command(prefix_command, guild_only, check = "checks::can_close")]
    pub async fn openthreads(ctx: Context<'_>) -> Result<()> {
        let Some(guild) = ctx.guild_id() else {
            return Ok(());
        };
        let desk = ctx.data().help_desk(ctx.serenity_context());
        let threads = desk.open_threads(guild).await?;
        ctx.send(CreateReply::default().embed(render::open_threads_embed(&threads)))
            .await?;
        Ok(())
    }
}

pub use inner::*;
