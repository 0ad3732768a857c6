//! Terminal output for chanko commands
//!
//! Uses `cliclack` for styled output in an interactive terminal and falls
//! back to plain `[OK]` / `[WARN]` lines in CI or when piped.
//!
//! ```rust,ignore
//! use chanko::ui::{self, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect();
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Checking sources.list...");
//! spinner.stop("sources.list unchanged");
//! ui::key_value(&ctx, "cache id", id.as_str());
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, remark, step_error_detail, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::TaskSpinner;
