use crate::analysis::UrlStats;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/report.html");

lazy_static! {
    // `$$` is an escaped dollar, `$table_json` and `${table_json}` take the table
    static ref PLACEHOLDER: Regex = Regex::new(r"\$(?:(\$)|\{table_json\}|table_json\b)").unwrap();
}

/// Renders the statistics table into an HTML template
pub struct ReportWriter {
    template: String,
}

impl ReportWriter {
    /// Create a writer from template text
    ///
    /// The template must reference the table as `$table_json` or `${table_json}`.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let has_table = PLACEHOLDER
            .captures_iter(&template)
            .any(|c| c.get(1).is_none());
        if !has_table {
            return Err(Error::Template(
                "template has no $table_json placeholder".to_string(),
            ));
        }
        Ok(Self { template })
    }

    /// Load a template from disk, or fall back to the built-in one
    pub fn load(template_path: Option<&Path>) -> Result<Self> {
        match template_path {
            Some(path) => {
                tracing::debug!("Reading report template from: {}", path.display());
                Self::new(fs::read_to_string(path)?)
            }
            None => Self::new(BUILTIN_TEMPLATE),
        }
    }

    /// Render the report to a string
    pub fn to_string(&self, rows: &[UrlStats]) -> Result<String> {
        // keep the table from closing a surrounding <script> element
        let table_json = serde_json::to_string(rows)?.replace("</", "<\\/");

        let html = PLACEHOLDER.replace_all(&self.template, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                "$".to_string()
            } else {
                table_json.clone()
            }
        });

        Ok(html.into_owned())
    }

    /// Render the report and write it to `path`
    ///
    /// The parent directory is created if needed. Content goes to a temporary
    /// sibling first and is renamed into place, so `path` only ever holds a
    /// complete report.
    pub fn to_file(&self, rows: &[UrlStats], path: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        let html = self.to_string(rows)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let partial = path.with_extension("html.part");
        if let Err(e) = fs::write(&partial, html).and_then(|()| fs::rename(&partial, path)) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        tracing::info!(
            "Successfully wrote report with {} rows to {}",
            rows.len(),
            path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rows() -> Vec<UrlStats> {
        vec![UrlStats {
            url: "/api/v2/banner/25019354".to_string(),
            count: 2,
            count_perc: 100.0,
            time_sum: 0.523,
            time_perc: 100.0,
            time_avg: 0.262,
            time_max: 0.39,
            time_med: 0.262,
        }]
    }

    #[test]
    fn test_builtin_template_is_valid() {
        let html = ReportWriter::load(None).unwrap().to_string(&rows()).unwrap();
        assert!(html.contains("\"url\":\"/api/v2/banner/25019354\""));
        assert!(!html.contains("$table_json"));
    }

    #[test]
    fn test_both_placeholder_forms_are_substituted() {
        let writer = ReportWriter::new("a=$table_json; b=${table_json};").unwrap();
        let html = writer.to_string(&[]).unwrap();
        assert_eq!(html, "a=[]; b=[];");
    }

    #[test]
    fn test_other_dollars_are_left_alone() {
        let writer = ReportWriter::new("$(document) $$table_json $table_jsonx $table_json").unwrap();
        let html = writer.to_string(&[]).unwrap();
        assert_eq!(html, "$(document) $table_json $table_jsonx []");
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        assert!(matches!(
            ReportWriter::new("<html></html>"),
            Err(Error::Template(_))
        ));
        assert!(matches!(
            ReportWriter::new("$$table_json"),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let mut rows = rows();
        rows[0].url = "/</script><b>".to_string();
        let html = ReportWriter::new("$table_json").unwrap().to_string(&rows).unwrap();
        assert!(!html.contains("</script>"));
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn test_to_file_creates_report_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("report-2020.06.30.html");

        let writer = ReportWriter::new("<script>var table = $table_json;</script>").unwrap();
        writer.to_file(&rows(), &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<script>var table = [{"));
        assert!(!path.with_extension("html.part").exists());
    }

    #[test]
    fn test_failed_rename_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report-2020.06.30.html");
        // a non-empty directory in the way makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "").unwrap();

        let writer = ReportWriter::new("$table_json").unwrap();
        let result = writer.to_file(&rows(), &path);

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!path.with_extension("html.part").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report-2020.06.30.html");
        // the temporary sibling cannot be written over a directory
        fs::create_dir(path.with_extension("html.part")).unwrap();

        let writer = ReportWriter::new("$table_json").unwrap();
        let result = writer.to_file(&rows(), &path);

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_template() {
        let dir = TempDir::new().unwrap();
        let result = ReportWriter::load(Some(dir.path().join("report.html").as_path()));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
