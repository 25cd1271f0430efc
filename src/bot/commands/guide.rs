//! `help_menu`: posts the help guide followed by the creation prompt.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, render},
        core::guide::HelpGuide,
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Posts the help guide, one embed per section, then the buttons that
    /// open a help thread. Owners only.
    #[poise::command(prefix_command, owners_only, guild_only, hide_in_help)]
    pub async fn help_menu(ctx: Context<'_>) -> Result<()> {
        let help = &ctx.data().config.help;
        let guide = HelpGuide::load(&help.guide_path).await?;

        let channel = ctx.channel_id();
        let mut posted = 0_usize;
        for section in guide.sections() {
            channel
                .send_message(
                    ctx.serenity_context(),
                    serenity::CreateMessage::new().embed(render::guide_embed(section)),
                )
                .await?;
            posted += 1;
        }
        channel
            .send_message(
                ctx.serenity_context(),
                render::creation_prompt(&help.categories),
            )
            .await?;

        info!(%channel, sections = posted, "Posted help menu");
        Ok(())
    }
}

pub use inner::*;
