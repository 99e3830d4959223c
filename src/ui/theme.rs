use console::Term;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();
static ERR_THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for terminal output. Reports go to stdout and skipped-file notices
/// to stderr, so each stream gets its own detection.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    /// Diagnostic codes like `UNRESOLVED_IDENTIFIER`
    pub code: Style,
    /// The offending name inside a diagnostic
    pub identifier: Style,
    pub path: Style,
}

impl Theme {
    /// Colored when `term` is a terminal and `NO_COLOR` is unset
    pub fn detect(term: &Term) -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !term.is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            code: Style::new().red(),
            identifier: Style::new().yellow().bold(),
            path: Style::new().blue().underline(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            code: Style::new(),
            identifier: Style::new(),
            path: Style::new(),
        }
    }
}

/// Theme for stdout
pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::detect(&Term::stdout()))
}

/// Theme for stderr
pub fn err_theme() -> &'static Theme {
    ERR_THEME.get_or_init(|| Theme::detect(&Term::stderr()))
}
