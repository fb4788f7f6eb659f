use crate::report::WriteError;
use rust_embed::RustEmbed;
use std::fs;
use std::path::Path;

/// Token replaced by the JSON report table.
pub const TABLE_PLACEHOLDER: &str = "$table_json";

const DEFAULT_TEMPLATE: &str = "report.html";

#[derive(RustEmbed)]
#[folder = "report-templates/"]
struct ReportTemplates;

/// Loads the custom template at `path`, or the embedded default.
pub fn load_template(path: Option<&Path>) -> Result<String, WriteError> {
    let (text, origin) = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| WriteError::TemplateUnreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
            (text, path.display().to_string())
        }
        None => (embedded(DEFAULT_TEMPLATE)?, format!("<embedded {DEFAULT_TEMPLATE}>")),
    };

    if !text.contains(TABLE_PLACEHOLDER) {
        return Err(WriteError::TemplatePlaceholderMissing {
            origin,
            placeholder: TABLE_PLACEHOLDER,
        });
    }

    Ok(text)
}

/// Substitutes the table into the template.
///
/// `</` is escaped so that a URL can never close the surrounding script tag.
pub fn render(template: &str, table_json: &str) -> String {
    let safe = table_json.replace("</", "<\\/");
    template.replace(TABLE_PLACEHOLDER, &safe)
}

fn embedded(name: &'static str) -> Result<String, WriteError> {
    let file = ReportTemplates::get(name).ok_or(WriteError::TemplateUnavailable { name })?;
    let text = std::str::from_utf8(file.data.as_ref())
        .map_err(|_| WriteError::TemplateUnavailable { name })?;
    Ok(text.to_owned())
}
