use crate::core::RepoMetadata;
use crate::utils::error::{ReadmeError, Result};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;

pub const DEFAULT_PLACEHOLDER: &str = "{{libraries}}";
pub const DEFAULT_INSTALL_COMMAND: &str = "npm i";

const BILLING_REQUIRED: &str = ":x:";
const BILLING_NOT_REQUIRED: &str = ":white_check_mark:";

/// Locale-aware collation for display names, using the root locale's rules.
///
/// Case only matters once the names are otherwise equal, lowercase first.
/// Raw code points settle anything the collator treats as equal so the
/// result is a total order.
pub struct NameCollator {
    collator: CollatorBorrowed<'static>,
}

impl NameCollator {
    pub fn new() -> Result<Self> {
        let collator = Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
            .map_err(|e| ReadmeError::ProcessingError {
                message: format!("Failed to load collation data: {}", e),
            })?;
        Ok(Self { collator })
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator
            .compare(a, b)
            .then_with(|| {
                a.chars()
                    .map(char::is_uppercase)
                    .cmp(b.chars().map(char::is_uppercase))
            })
            .then_with(|| a.cmp(b))
    }
}

pub fn sort_libraries(libraries: &mut [RepoMetadata]) -> Result<()> {
    let collator = NameCollator::new()?;
    libraries.sort_by(|a, b| collator.compare(a.display_name(), b.display_name()));
    Ok(())
}

/// Renders one markdown table row for a library, newline terminated.
pub fn render_row(library: &RepoMetadata, install_command: &str) -> String {
    let repo = library.repo().unwrap_or_default();
    let billing = if library.requires_billing() {
        BILLING_REQUIRED
    } else {
        BILLING_NOT_REQUIRED
    };

    format!(
        "| [{name}](https://github.com/{repo}) | [:notebook:]({docs}) | `{install} {package}` | [enable](https://console.cloud.google.com/flows/enableapi?apiid={api_id}) | {billing} |\n",
        name = library.display_name(),
        repo = repo,
        docs = library.client_documentation().unwrap_or_default(),
        install = install_command,
        package = library.distribution_name().unwrap_or_default(),
        api_id = library.api_id().unwrap_or_default(),
        billing = billing,
    )
}

pub fn render_rows(libraries: &[RepoMetadata], install_command: &str) -> String {
    libraries
        .iter()
        .map(|library| render_row(library, install_command))
        .collect()
}

/// Replaces the placeholder in `template` with `rows`. Nothing else in the
/// template is interpreted.
pub fn apply_template(template: &str, placeholder: &str, rows: &str) -> Result<String> {
    if !template.contains(placeholder) {
        return Err(ReadmeError::ProcessingError {
            message: format!("Template does not contain placeholder {}", placeholder),
        });
    }
    Ok(template.replacen(placeholder, rows, 1))
}
