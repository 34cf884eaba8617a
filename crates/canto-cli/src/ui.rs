//! Terminal capabilities, resolved once from the global flags.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Narrower `COLUMNS` values are ignored and the table is not fitted.
const MIN_FIT_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    /// Color status cells in tables.
    pub table_color: bool,
    /// Draw spinners and per-section progress bars on stderr.
    pub progress: bool,
    /// Width tables are fitted to.
    pub term_width: Option<usize>,
}

impl UiPrefs {
    fn resolve(flags: &GlobalFlags, stdout_tty: bool, no_color: bool, columns: Option<&str>) -> Self {
        let interactive = stdout_tty && !flags.quiet;
        Self {
            table_color: interactive && !no_color && flags.format == OutputFormat::Table,
            progress: interactive && flags.format != OutputFormat::Json,
            term_width: columns
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .filter(|width| *width >= MIN_FIT_WIDTH),
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

/// Detect terminal capabilities. Later calls keep the first result.
pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let prefs = UiPrefs::resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    let _ = UI_PREFS.set(prefs);
}

/// Preferences from [`init`], or plain output when it never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
