//! Init command - create the arena state from a sources.list

use crate::arena::{Arena, ArenaLayout, ArenaSettings};
use crate::cli::args::InitArgs;
use crate::error::ChankoResult;
use crate::ui::{self, UiContext};

/// Execute the init command
pub async fn execute(args: InitArgs, settings: &ArenaSettings) -> ChankoResult<()> {
    let ctx = UiContext::detect();

    let cache_id = Arena::create(settings, &args.sources_list).await?;

    let root = settings.resolve()?;
    let layout = ArenaLayout::new(root.base());

    ui::step_ok_detail(
        &ctx,
        "Arena initialized",
        &root.base().display().to_string(),
    );
    ui::key_value(&ctx, "sources.list", &layout.sources_list().display().to_string());
    ui::key_value(&ctx, "cache id", cache_id.as_str());
    ui::remark(&ctx, "Run `chanko refresh --all` to build the caches");

    Ok(())
}
