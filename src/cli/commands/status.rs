//! Status command - show arena state without activating it

use crate::arena::{Arena, ArenaSettings, ArenaStatus};
use crate::cli::args::{OutputFormat, StatusArgs};
use crate::error::ChankoResult;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(args: StatusArgs, settings: &ArenaSettings) -> ChankoResult<()> {
    let status = Arena::inspect(settings).await?;

    match args.format {
        OutputFormat::Table => print_table(&status),
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Plain => print_plain(&status),
    }

    Ok(())
}

fn print_table(status: &ArenaStatus) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "Arena");

    ui::key_value(&ctx, "base", &status.base.display().to_string());
    if status.nominal != status.base {
        ui::key_value(&ctx, "entered as", &status.nominal.display().to_string());
    }
    ui::key_value(&ctx, "marker", &status.marker.display().to_string());

    if !status.initialized {
        ui::step_warn_hint(&ctx, "Not initialized", "Run: chanko init <sources.list>");
        return;
    }

    ui::key_value(&ctx, "cache id", &display_opt(status.cache_id.as_ref().map(|id| id.as_str())));
    ui::key_value(&ctx, "arch", &display_opt(status.arch.as_deref()));
    ui::key_value_status(
        &ctx,
        "remote cache",
        if status.stale { "stale" } else { "consistent" },
        !status.stale,
    );
}

fn print_json(status: &ArenaStatus) -> ChankoResult<()> {
    let json = serde_json::to_string_pretty(status)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(status: &ArenaStatus) {
    println!("base={}", status.base.display());
    println!("initialized={}", status.initialized);
    if let Some(ref id) = status.cache_id {
        println!("cache_id={}", id);
    }
    if status.initialized {
        println!("stale={}", status.stale);
    }
}

fn display_opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
