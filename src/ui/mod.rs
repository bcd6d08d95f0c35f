//! Terminal output helpers
//!
//! Uses `cliclack` spinners and log lines in an interactive terminal and
//! falls back to plain `[OK]`/`[WARN]` lines in CI or when stdout is piped.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, remark, step_error_detail, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::init_theme;
