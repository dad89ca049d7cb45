use crate::{links::Links, models::BookRecord, Error, Result};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Writes the reading list out in a shareable form
pub struct Exporter {
    links: Links,
}

impl Exporter {
    pub fn new(links: Links) -> Self {
        Self { links }
    }

    /// Export to a file, picking the format from its extension
    pub fn export_to_file<P: AsRef<Path>>(&self, books: &[BookRecord], path: P) -> Result<ExportFormat> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ExportError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        let content = self.render(books, format)?;
        std::fs::write(path, content)
            .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(format)
    }

    pub fn render(&self, books: &[BookRecord], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(books),
            ExportFormat::Csv => Ok(Self::to_csv(books)),
            ExportFormat::Markdown => Ok(self.to_markdown(books)),
        }
    }

    /// Same shape as the persisted favorites slot
    pub fn to_json(books: &[BookRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(books)?)
    }

    pub fn to_csv(books: &[BookRecord]) -> String {
        let mut output =
            String::from("Key,Title,Authors,First Published,ISBN,Publishers,Languages\n");

        for book in books {
            output.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                Self::escape_csv(&book.key),
                Self::escape_csv(book.title.as_deref().unwrap_or("")),
                Self::escape_csv(&book.authors().join("; ")),
                book.first_publish_year.map(|y| y.to_string()).unwrap_or_default(),
                book.first_isbn().unwrap_or(""),
                Self::escape_csv(&book.publishers().join("; ")),
                Self::escape_csv(&book.languages().join("; ")),
            ));
        }

        output
    }

    pub fn to_markdown(&self, books: &[BookRecord]) -> String {
        let mut output = String::new();

        output.push_str("# My Reading List\n\n");
        output.push_str(&format!(
            "{} book{} · exported {}\n\n",
            books.len(),
            if books.len() == 1 { "" } else { "s" },
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
        ));
        output.push_str("---\n\n");

        for book in books {
            output.push_str(&format!(
                "## [{}]({})\n\n",
                Self::escape_link_text(book.display_title()),
                self.links.catalog_url(book)
            ));
            output.push_str(&format!(
                "**By** {} · **First published** {}\n\n",
                book.display_authors(usize::MAX),
                book.display_year()
            ));

            let subjects = book.subjects();
            if !subjects.is_empty() {
                output.push_str("**Subjects:** ");
                let shown: Vec<String> = subjects.iter().take(3).map(|s| format!("`{}`", s)).collect();
                output.push_str(&shown.join(", "));
                if subjects.len() > 3 {
                    output.push_str(&format!(" +{} more", subjects.len() - 3));
                }
                output.push('\n');
            }

            if let Some(url) = self.links.worldcat_url(book) {
                output.push_str(&format!("\n[Find in a library]({})\n", url));
            }

            output.push_str("\n---\n\n");
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    /// Escape text placed inside a Markdown link's `[...]`
    fn escape_link_text(s: &str) -> String {
        let mut escaped = String::with_capacity(s.len());
        for c in s.chars() {
            if matches!(c, '\\' | '[' | ']') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(Links::default())
    }
}
