use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::DVError;
use crate::record::Row;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
    JSON,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// A table export loaded into memory, every cell rendered as a string.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Arc<[String]>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn load(path: PathBuf) -> Result<Self, DVError> {
        let file_info = Self::get_file_info(path)?;
        debug!(
            "Loading {:?} ({} bytes, {:?})",
            file_info.path, file_info.file_size, file_info.file_type
        );
        let frame = match file_info.file_type {
            FileType::CSV => Self::load_csv(&file_info.path)?,
            FileType::PARQUET => Self::load_parquet(&file_info.path)?,
            FileType::ARROW => Self::load_arrow(&file_info.path)?,
            FileType::JSON => Self::load_json(&file_info.path)?,
        };

        let start_time = Instant::now();
        let df = frame.collect()?;

        // One column per thread, each cell converted to a string. Nulls stay `None`.
        let c_: Result<Vec<(String, Vec<Option<String>>)>, PolarsError> = df
            .get_column_names()
            .par_iter()
            .map(|name| Self::load_column(&df, name))
            .collect();
        let columns = c_?;

        let headers: Arc<[String]> = columns
            .iter()
            .map(|(name, _)| name.clone())
            .collect::<Vec<String>>()
            .into();
        let rows: Vec<Row> = (0..df.height())
            .into_par_iter()
            .map(|ridx| {
                let values = columns.iter().map(|(_, data)| data[ridx].clone()).collect();
                Row::with_nulls(Arc::clone(&headers), values)
            })
            .collect();

        info!(
            "Loaded {} rows x {} columns in {}ms",
            rows.len(),
            headers.len(),
            start_time.elapsed().as_millis()
        );

        let name = file_info
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    fn load_column(
        df: &DataFrame,
        col_name: &str,
    ) -> Result<(String, Vec<Option<String>>), PolarsError> {
        let col = df.column(col_name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let data = series
            .into_iter()
            .map(|value| value.map(|s| s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")))
            .collect();
        Ok((col_name.to_string(), data))
    }

    fn get_file_info(path: PathBuf) -> Result<FileInfo, DVError> {
        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DVError::FileNotFound,
            ErrorKind::PermissionDenied => DVError::PermissionDenied,
            _ => DVError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(DVError::LoadingFailed("Not a file!".into()));
        }

        let file_type = Self::detect_file_type(&path)?;

        Ok(FileInfo {
            path,
            file_size: metadata.len(),
            file_type,
        })
    }

    fn detect_file_type(path: &Path) -> Result<FileType, DVError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(FileType::CSV),
            Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
            Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
            Some("JSON") => Ok(FileType::JSON),
            _ => Err(DVError::UnknownFileType),
        }
    }

    fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.into()))
            .with_has_header(true)
            .finish()
    }

    fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
    }

    fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_ipc(
            PlPath::Local(path.into()),
            polars::io::ipc::IpcScanOptions,
            UnifiedScanArgs::default(),
        )
    }

    // JSON array of objects, as returned by the REST backend.
    fn load_json(path: &Path) -> Result<LazyFrame, DVError> {
        let file = File::open(path)?;
        let df = JsonReader::new(file).finish()?;
        Ok(df.lazy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_view::filter_indices;
    use crate::record::{NULL_GLYPH, Record};

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn loads_csv_fixture() {
        let ds = Dataset::load(fixture("employees.csv")).unwrap();
        assert_eq!(ds.name, "employees.csv");
        assert_eq!(
            ds.headers.to_vec(),
            vec!["nik", "name", "department", "position", "status"]
        );
        assert_eq!(ds.rows.len(), 12);
        assert_eq!(ds.rows[0].field("name").as_deref(), Some("Andi Saputra"));
        assert_eq!(ds.rows[11].field("department").as_deref(), Some("Finance"));
    }

    #[test]
    fn loads_json_fixture() {
        let ds = Dataset::load(fixture("overtime.json")).unwrap();
        assert_eq!(ds.rows.len(), 3);
        assert_eq!(ds.rows[1].field("employee").as_deref(), Some("Wati Lestari"));
        assert_eq!(ds.rows[1].field("status").as_deref(), Some("approved"));
    }

    #[test]
    fn null_cells_never_match_a_search() {
        let ds = Dataset::load(fixture("nulls.json")).unwrap();
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0].field("dept"), None);
        assert_eq!(ds.rows[0].display(1), NULL_GLYPH);

        let keys = vec!["dept".to_string()];
        assert!(filter_indices(&ds.rows, NULL_GLYPH, &keys).is_empty());
        assert_eq!(filter_indices(&ds.rows, "fin", &keys), vec![1]);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Dataset::load(fixture("nope.csv")),
            Err(DVError::FileNotFound)
        ));
    }

    #[test]
    fn unknown_extension() {
        assert!(matches!(
            Dataset::detect_file_type(Path::new("rekap.xlsx")),
            Err(DVError::UnknownFileType)
        ));
        assert_eq!(
            Dataset::detect_file_type(Path::new("a.PQ")).unwrap(),
            FileType::PARQUET
        );
    }

    #[test]
    fn directory_is_not_a_file() {
        assert!(matches!(
            Dataset::load(fixture("")),
            Err(DVError::LoadingFailed(_))
        ));
    }
}
