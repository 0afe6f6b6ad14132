// Opt-out switch for temp directory management

/// Environment variable that disables temp directory management for a job
pub const NO_OVERWRITE_TEMP_VAR: &str = "VSTS_NOTOVERWRITE_TEMP";

/// Parsed value of [`NO_OVERWRITE_TEMP_VAR`]
///
/// Only `true`/`false` (case-insensitive, surrounding whitespace ignored) are
/// recognised. Absent, empty or unparsable values mean "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptOutFlag(bool);

impl OptOutFlag {
    pub fn parse(raw: Option<&str>) -> Self {
        let value = raw.map(str::trim).unwrap_or_default();
        Self(value.eq_ignore_ascii_case("true"))
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}
