//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.mrscribe.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `MRSCRIBE_*`, plus `GITLAB_TOKEN` as a
//!    token fallback
//! 4. **Command-line arguments** – `--project-id`/`-p`, `--token`/`-t`, …
//!
//! # Configuration File
//!
//! ```toml
//! gitlab_url = "https://gitlab.example.com"
//! project_id = "platform/payments"
//! token = "glpat-example"
//! label = "NashTech"
//! per_page = 50
//! export = "markdown"
//! output = "review.md"
//! ```

use std::env;

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer, Serialize};

use crate::export::ExportFormat;
use crate::gitlab::{
    DEFAULT_PER_PAGE, IntakeError, MergeRequestIid, PersonalAccessToken, ProjectId, ProjectLocator,
    pagination::validate_per_page, parse_merge_request_ids,
};
use crate::review::MergeRequestSelection;

/// GitLab instance used when none is configured.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Label selecting merge requests when no ids are given.
pub const DEFAULT_LABEL: &str = "NashTech";

/// Environment variable read when no token is configured.
pub const TOKEN_FALLBACK_ENV: &str = "GITLAB_TOKEN";

/// Where the comments of a run come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode<'a> {
    /// Fetch comments from GitLab.
    Fetch,
    /// Re-render a saved JSONL collection without network access.
    Offline(&'a Utf8Path),
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use mrscribe::MrScribeConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = MrScribeConfig::load().expect("failed to load configuration");
/// let locator = config.project_locator().expect("project required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "MRSCRIBE",
    discovery(
        dotfile_name = ".mrscribe.toml",
        config_file_name = "mrscribe.toml",
        app_name = "mrscribe"
    )
)]
pub struct MrScribeConfig {
    /// Base URL of the GitLab instance.
    ///
    /// Can be provided via:
    /// - CLI: `--gitlab-url <URL>` or `-g <URL>`
    /// - Environment: `MRSCRIBE_GITLAB_URL`
    /// - Config file: `gitlab_url = "..."`
    #[ortho_config(cli_short = 'g')]
    pub gitlab_url: String,

    /// Project id or `namespace/name` path.
    ///
    /// Can be provided via:
    /// - CLI: `--project-id <ID>` or `-p <ID>`
    /// - Environment: `MRSCRIBE_PROJECT_ID`
    /// - Config file: `project_id = "..."`
    #[ortho_config(cli_short = 'p')]
    #[serde(deserialize_with = "optional_string_or_number")]
    pub project_id: Option<String>,

    /// Personal access token for the GitLab API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `MRSCRIBE_TOKEN` or `GITLAB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Comma-separated merge request numbers; label mode when absent.
    ///
    /// Can be provided via:
    /// - CLI: `--mr-ids <IDS>` or `-m <IDS>`
    /// - Environment: `MRSCRIBE_MR_IDS`
    /// - Config file: `mr_ids = "12,15"`
    #[ortho_config(cli_short = 'm')]
    #[serde(deserialize_with = "optional_string_or_number")]
    pub mr_ids: Option<String>,

    /// Label selecting merge requests in label mode.
    ///
    /// Can be provided via:
    /// - CLI: `--label <LABEL>` or `-l <LABEL>`
    /// - Environment: `MRSCRIBE_LABEL`
    /// - Config file: `label = "..."`
    #[ortho_config(cli_short = 'l')]
    pub label: String,

    /// Page size for list endpoints (1–100).
    ///
    /// Can be provided via:
    /// - CLI: `--per-page <N>`
    /// - Environment: `MRSCRIBE_PER_PAGE`
    /// - Config file: `per_page = 50`
    #[ortho_config()]
    pub per_page: u8,

    /// Export format: `markdown`, `csv` or `jsonl`.
    ///
    /// Can be provided via:
    /// - CLI: `--export <FORMAT>` or `-e <FORMAT>`
    /// - Environment: `MRSCRIBE_EXPORT`
    /// - Config file: `export = "..."`
    #[ortho_config(cli_short = 'e')]
    pub export: Option<String>,

    /// Export destination; stdout when absent.
    ///
    /// Can be provided via:
    /// - CLI: `--output <PATH>` or `-o <PATH>`
    /// - Environment: `MRSCRIBE_OUTPUT`
    /// - Config file: `output = "..."`
    #[ortho_config(cli_short = 'o')]
    pub output: Option<String>,

    /// Saved JSONL collection to render instead of fetching.
    ///
    /// Can be provided via:
    /// - CLI: `--input <PATH>` or `-i <PATH>`
    /// - Environment: `MRSCRIBE_INPUT`
    /// - Config file: `input = "..."`
    #[ortho_config(cli_short = 'i')]
    pub input: Option<String>,
}

/// Reads an optional value that may arrive as a string or a bare integer.
///
/// Environment variables and TOML files type `42` as a number, while
/// project and merge request ids are handled as text.
fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Unsigned(number) => number.to_string(),
        Raw::Signed(number) => number.to_string(),
    }))
}

impl Default for MrScribeConfig {
    fn default() -> Self {
        Self {
            gitlab_url: DEFAULT_GITLAB_URL.to_owned(),
            project_id: None,
            token: None,
            mr_ids: None,
            label: DEFAULT_LABEL.to_owned(),
            per_page: DEFAULT_PER_PAGE,
            export: None,
            output: None,
            input: None,
        }
    }
}

impl MrScribeConfig {
    /// Resolves the token from configuration or `GITLAB_TOKEN`.
    ///
    /// A blank configured token counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, IntakeError> {
        let configured = self.token.clone().filter(|value| !value.trim().is_empty());
        let value = configured
            .or_else(|| env::var(TOKEN_FALLBACK_ENV).ok())
            .ok_or(IntakeError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Returns the project identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingProjectId`] when it is absent or blank.
    pub fn require_project_id(&self) -> Result<ProjectId, IntakeError> {
        self.project_id
            .as_deref()
            .ok_or(IntakeError::MissingProjectId)
            .and_then(ProjectId::new)
    }

    /// Builds the API locator for the configured project.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingProjectId`] or
    /// [`IntakeError::InvalidUrl`].
    pub fn project_locator(&self) -> Result<ProjectLocator, IntakeError> {
        let project = self.require_project_id()?;
        ProjectLocator::new(self.gitlab_url.trim(), project)
    }

    /// Parses the explicit merge request ids; empty when none are given.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidMergeRequestIds`] naming the first
    /// malformed token.
    pub fn merge_request_ids(&self) -> Result<Vec<MergeRequestIid>, IntakeError> {
        self.mr_ids
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), parse_merge_request_ids)
    }

    /// Chooses between explicit ids and the label.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidMergeRequestIds`] for malformed ids, or
    /// [`IntakeError::Configuration`] when label mode is selected with a
    /// blank label.
    pub fn selection(&self) -> Result<MergeRequestSelection, IntakeError> {
        let ids = self.merge_request_ids()?;
        let label = self.label.trim();
        if ids.is_empty() && label.is_empty() {
            return Err(IntakeError::Configuration {
                message: "a label is required when no merge request ids are given".to_owned(),
            });
        }
        Ok(MergeRequestSelection::from_ids_or_label(ids, label))
    }

    /// Parses the requested export format.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] for an unknown format.
    pub fn export_format(&self) -> Result<Option<ExportFormat>, IntakeError> {
        self.export
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(str::parse)
            .transpose()
    }

    /// Export destination, when one is configured.
    #[must_use]
    pub fn output_path(&self) -> Option<&Utf8Path> {
        non_blank_path(self.output.as_deref())
    }

    /// Determines where comments come from.
    #[must_use]
    pub fn run_mode(&self) -> RunMode<'_> {
        non_blank_path(self.input.as_deref()).map_or(RunMode::Fetch, RunMode::Offline)
    }

    /// Checks settings that can be validated without network access.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`],
    /// [`IntakeError::InvalidMergeRequestIds`] or
    /// [`IntakeError::Configuration`].
    pub fn validate(&self) -> Result<(), IntakeError> {
        validate_per_page(self.per_page)?;
        self.export_format()?;
        if self.run_mode() == RunMode::Fetch {
            self.selection()?;
        }
        Ok(())
    }
}

fn non_blank_path(value: Option<&str>) -> Option<&Utf8Path> {
    value
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(Utf8Path::new)
}

#[cfg(test)]
mod tests;
