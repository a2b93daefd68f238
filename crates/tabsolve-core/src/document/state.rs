use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;
use tabsolve_engine::engine::Grid;

/// A loaded table together with where it came from and how to treat it.
#[derive(Clone, Debug)]
pub struct Document {
    /// The table being solved
    pub grid: Grid,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since it was loaded or saved
    pub modified: bool,
    pub config: Config,
    /// Number of formula cells, counted while the grid was populated
    pub expression_count: usize,
}

impl Document {
    /// Create a document holding an empty `rows` x `cols` grid.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new(rows: usize, cols: usize, config: Config) -> Result<Self> {
        Ok(Document {
            grid: Grid::new(rows, cols)?,
            file_path: None,
            modified: false,
            config,
            expression_count: 0,
        })
    }

    /// Load `path` if it exists. A path that does not exist yet becomes the
    /// save target of an empty `rows` x `cols` document.
    pub fn with_file(
        path: Option<PathBuf>,
        rows: usize,
        cols: usize,
        config: Config,
    ) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load_file(&p, config),
            Some(p) => {
                let mut doc = Self::new(rows, cols, config)?;
                doc.file_path = Some(p);
                Ok(doc)
            }
            None => Self::new(rows, cols, config),
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
}
