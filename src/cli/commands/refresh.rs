//! Refresh command - activate the arena and refresh its caches

use crate::arena::{Arena, ArenaSettings};
use crate::cache::{create_provider, CacheKind};
use crate::cli::args::RefreshArgs;
use crate::config::Config;
use crate::error::ChankoResult;
use crate::ui::{self, TaskSpinner, UiContext};
use chrono::SecondsFormat;

/// Execute the refresh command
pub async fn execute(
    args: RefreshArgs,
    settings: &ArenaSettings,
    config: &Config,
) -> ChankoResult<()> {
    let ctx = UiContext::detect();
    let provider = create_provider(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Checking sources.list...");

    let arena = match Arena::open(settings, provider.as_ref()).await {
        Ok(arena) => arena,
        Err(e) => {
            spinner.stop_error("Arena activation failed");
            return Err(e);
        }
    };

    if arena.remote_cache_auto_refreshed() {
        spinner.stop("sources.list changed; remote cache refreshed");
    } else {
        spinner.stop("sources.list unchanged");
    }

    let mut kinds = Vec::new();
    if !args.local && !arena.remote_cache_auto_refreshed() {
        kinds.push(CacheKind::Remote);
    }
    if args.local || args.all {
        kinds.push(CacheKind::Local);
    }

    for kind in kinds {
        let mut spinner = TaskSpinner::new(&ctx);
        spinner.start(&format!("Refreshing {} cache...", kind));
        match arena.refresh(kind).await {
            Ok(()) => spinner.stop(&format!("{} cache refreshed", kind)),
            Err(e) => {
                spinner.stop_error(&format!("{} cache refresh failed", kind));
                return Err(e);
            }
        }
    }

    ui::key_value(&ctx, "cache id", arena.cache_id().as_str());
    for cache in [arena.remote_cache(), arena.local_cache()] {
        let refreshed = match cache.last_refresh().await? {
            Some(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => "never".to_string(),
        };
        ui::key_value(&ctx, &format!("{} refreshed", cache.kind()), &refreshed);
    }
    Ok(())
}
