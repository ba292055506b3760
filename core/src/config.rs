//! Build-mode configuration.
//!
//! The mode only gates advisory diagnostics (composition warnings, state
//! shape warnings). It never changes what a reducer or a store computes.

/// Environment variable consulted by [`Mode::detect`].
pub const MODE_ENV_VAR: &str = "REDUXIDE_ENV";

/// Whether advisory diagnostics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Advisories enabled.
    Development,
    /// Advisories skipped.
    Production,
}

impl Mode {
    /// Resolve the mode from [`MODE_ENV_VAR`], falling back to the build profile
    /// (`Development` with debug assertions, `Production` otherwise).
    #[must_use]
    pub fn detect() -> Self {
        std::env::var(MODE_ENV_VAR)
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_else(Self::from_build_profile)
    }

    /// Parse a mode name. Accepts `production`/`prod` and
    /// `development`/`dev`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    /// Mode implied by the build profile alone.
    #[must_use]
    pub const fn from_build_profile() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Whether advisories should run.
    #[must_use]
    pub const fn advisories_enabled(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::detect()
    }
}
