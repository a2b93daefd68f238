use super::Document;
use crate::config::Config;
use crate::error::{Result, TabsolveError};
use crate::storage::{ParsedTable, parse_table, parse_table_content, write_markdown, write_table};
use std::path::{Path, PathBuf};

impl Document {
    /// Load a table file.
    pub fn load_file(path: &Path, config: Config) -> Result<Self> {
        let table = parse_table(path, config.delimiter, config.marker)?;
        log::info!(
            "loaded {} ({}x{}, {} formulas)",
            path.display(),
            table.grid.cols(),
            table.grid.rows(),
            table.expression_count
        );
        let mut doc = Self::from_table(table, config);
        doc.file_path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Build a document from table text.
    pub fn from_content(content: &str, config: Config) -> Result<Self> {
        let table = parse_table_content(content, config.delimiter, config.marker)?;
        Ok(Self::from_table(table, config))
    }

    fn from_table(table: ParsedTable, config: Config) -> Self {
        Document {
            grid: table.grid,
            file_path: None,
            modified: false,
            config,
            expression_count: table.expression_count,
        }
    }

    /// Save to the current file path.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(TabsolveError::NoFilePath);
        };

        write_table(path, &self.grid, self.config.delimiter)?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.file_path = Some(path.to_path_buf());
        self.save_file()
    }

    /// Write the table to `path` without changing the current file path.
    /// A `.md` extension selects Markdown, anything else the table format.
    pub fn export(&self, path: &Path) -> Result<()> {
        let is_markdown = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

        if is_markdown {
            write_markdown(path, self)
        } else {
            write_table(path, &self.grid, self.config.delimiter)
        }
    }
}
