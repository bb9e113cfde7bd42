//! MITgcm MDS binary files.
//!
//! Each variable is a pair of files in one directory:
//!
//! ```text
//! XC.meta   text header
//! XC.data   raw big-endian values, fastest axis (x) first
//! ```
//!
//! A typical header looks like:
//!
//! ```text
//!  nDims = [   2 ];
//!  dimList = [
//!    192,    1,  192,
//!    144,    1,  144
//!  ];
//!  dataprec = [ 'float32' ];
//!  nrecords = [     1 ];
//! ```
//!
//! `dimList` holds one `(global, start, end)` triple per axis, x first.
//! Records (usually time levels) form an extra, slowest axis.

use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tracing::debug;

use crate::error::{ReaderError, ReaderResult};
use crate::source::RawGridSource;
use crate::variable::SourceKind;

/// Floating-point precision of an MDS data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Float32,
    Float64,
}

impl Precision {
    pub fn parse(s: &str) -> ReaderResult<Self> {
        match s.trim().trim_matches('\'').to_lowercase().as_str() {
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            other => Err(ReaderError::InvalidMeta(format!(
                "unsupported dataprec '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Bytes per value.
    pub fn size(&self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

/// Parsed contents of a `.meta` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MdsMeta {
    /// Axis lengths, fastest (x) first
    pub dims: Vec<usize>,
    pub precision: Precision,
    pub nrecords: usize,
}

impl MdsMeta {
    /// Parse a `.meta` header.
    pub fn parse(text: &str) -> ReaderResult<Self> {
        let n_dims: usize = parse_single(text, "nDims")?;

        let dim_list = meta_values(text, "dimList")
            .ok_or_else(|| ReaderError::InvalidMeta("missing dimList".to_string()))?;
        let dim_list: Vec<usize> = dim_list
            .iter()
            .map(|v| {
                v.parse()
                    .map_err(|_| ReaderError::InvalidMeta(format!("invalid dimList entry '{}'", v)))
            })
            .collect::<ReaderResult<_>>()?;
        if dim_list.len() != 3 * n_dims {
            return Err(ReaderError::InvalidMeta(format!(
                "dimList has {} entries, expected {} for nDims = {}",
                dim_list.len(),
                3 * n_dims,
                n_dims
            )));
        }

        let mut dims = Vec::with_capacity(n_dims);
        for triple in dim_list.chunks_exact(3) {
            let (global, start, end) = (triple[0], triple[1], triple[2]);
            if start != 1 || end != global {
                return Err(ReaderError::Tiled(format!(
                    "axis covers {}..{} of {}",
                    start, end, global
                )));
            }
            dims.push(global);
        }

        let precision = match meta_values(text, "dataprec") {
            Some(values) if !values.is_empty() => Precision::parse(&values[0])?,
            _ => return Err(ReaderError::InvalidMeta("missing dataprec".to_string())),
        };

        // Older headers omit nrecords
        let nrecords = if meta_values(text, "nrecords").is_some() {
            parse_single(text, "nrecords")?
        } else {
            1
        };

        Ok(Self {
            dims,
            precision,
            nrecords,
        })
    }

    /// Array shape in C order: `[nrecords?, ..., ny, nx]`.
    ///
    /// The record axis only appears when there is more than one record.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape: Vec<usize> = self.dims.iter().rev().copied().collect();
        if self.nrecords > 1 {
            shape.insert(0, self.nrecords);
        }
        shape
    }

    /// Number of values in the data file.
    pub fn len(&self) -> usize {
        self.dims.iter().product::<usize>() * self.nrecords
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as a `.meta` header.
    pub fn to_meta_string(&self) -> String {
        let dim_lines: Vec<String> = self
            .dims
            .iter()
            .map(|&n| format!(" {:>5}, {:>5}, {:>5}", n, 1, n))
            .collect();
        format!(
            " nDims = [ {:>3} ];\n dimList = [\n{}\n ];\n dataprec = [ '{}' ];\n nrecords = [ {:>5} ];\n",
            self.dims.len(),
            dim_lines.join(",\n"),
            self.precision.as_str(),
            self.nrecords
        )
    }
}

/// Find `key = [ ... ]` and split its contents on commas.
fn meta_values(text: &str, key: &str) -> Option<Vec<String>> {
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(key) {
        let start = search_from + pos;
        search_from = start + key.len();

        // Whole-word match only
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let rest = text[search_from..].trim_start();
        if !before_ok || !rest.starts_with('=') {
            continue;
        }

        let rest = rest[1..].trim_start();
        let body = rest.strip_prefix('[')?;
        let end = body.find(']')?;
        let values = body[..end]
            .split(',')
            .map(|v| v.trim().trim_matches('\'').trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        return Some(values);
    }
    None
}

fn parse_single(text: &str, key: &str) -> ReaderResult<usize> {
    let values =
        meta_values(text, key).ok_or_else(|| ReaderError::InvalidMeta(format!("missing {}", key)))?;
    values
        .first()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ReaderError::InvalidMeta(format!("invalid {} value {:?}", key, values)))
}

/// Strip a trailing `.data` or `.meta` so either form of a name works.
fn file_stem(name: &str) -> &str {
    name.strip_suffix(".data")
        .or_else(|| name.strip_suffix(".meta"))
        .unwrap_or(name)
}

/// A directory of MDS files.
#[derive(Debug, Clone)]
pub struct MdsDirectory {
    dir: PathBuf,
}

impl MdsDirectory {
    /// Open a directory of MDS files.
    pub fn open<P: AsRef<Path>>(dir: P) -> ReaderResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ReaderError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.meta", file_stem(name)))
    }

    fn data_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.data", file_stem(name)))
    }

    /// Read and parse the header of a variable.
    pub fn read_meta(&self, name: &str) -> ReaderResult<MdsMeta> {
        let path = self.meta_path(name);
        if !path.exists() {
            return Err(ReaderError::MissingVariable(file_stem(name).to_string()));
        }
        let text = std::fs::read_to_string(&path)?;
        MdsMeta::parse(&text)
    }
}

impl RawGridSource for MdsDirectory {
    fn kind(&self) -> SourceKind {
        SourceKind::Mds
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn has_array(&self, name: &str) -> bool {
        self.meta_path(name).exists() && self.data_path(name).exists()
    }

    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>> {
        let meta = self.read_meta(name)?;
        let data_path = self.data_path(name);
        if !data_path.exists() {
            return Err(ReaderError::MissingVariable(file_stem(name).to_string()));
        }

        let raw = Bytes::from(std::fs::read(&data_path)?);
        let expected = meta.len() * meta.precision.size();
        if raw.len() != expected {
            return Err(ReaderError::InvalidFormat(format!(
                "{} holds {} bytes, header implies {}",
                data_path.display(),
                raw.len(),
                expected
            )));
        }

        let values = decode_big_endian(raw, meta.precision);
        debug!(
            name = file_stem(name),
            shape = ?meta.shape(),
            precision = meta.precision.as_str(),
            "Read MDS array"
        );

        ArrayD::from_shape_vec(IxDyn(&meta.shape()), values)
            .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
    }
}

fn decode_big_endian(mut raw: Bytes, precision: Precision) -> Vec<f64> {
    let n = raw.len() / precision.size();
    let mut values = Vec::with_capacity(n);
    match precision {
        Precision::Float32 => {
            while raw.remaining() >= 4 {
                values.push(raw.get_f32() as f64);
            }
        }
        Precision::Float64 => {
            while raw.remaining() >= 8 {
                values.push(raw.get_f64());
            }
        }
    }
    values
}

/// Write an array as an MDS pair with a single record.
///
/// All axes of `array` are spatial; the last one is x.
pub fn write_mds<P: AsRef<Path>>(
    dir: P,
    name: &str,
    array: ArrayViewD<'_, f64>,
    precision: Precision,
) -> ReaderResult<()> {
    let dims = array.shape().iter().rev().copied().collect();
    write_with_meta(dir.as_ref(), name, array, precision, dims, 1)
}

/// Write an array whose first axis is a record (time) axis.
pub fn write_mds_records<P: AsRef<Path>>(
    dir: P,
    name: &str,
    array: ArrayViewD<'_, f64>,
    precision: Precision,
) -> ReaderResult<()> {
    let Some((&nrecords, spatial)) = array.shape().split_first() else {
        return Err(ReaderError::InvalidFormat(
            "record arrays need at least one axis".to_string(),
        ));
    };
    let dims = spatial.iter().rev().copied().collect();
    write_with_meta(dir.as_ref(), name, array, precision, dims, nrecords)
}

fn write_with_meta(
    dir: &Path,
    name: &str,
    array: ArrayViewD<'_, f64>,
    precision: Precision,
    dims: Vec<usize>,
    nrecords: usize,
) -> ReaderResult<()> {
    let stem = file_stem(name);
    let meta = MdsMeta {
        dims,
        precision,
        nrecords,
    };

    let mut buf = BytesMut::with_capacity(array.len() * precision.size());
    // Logical (C) order regardless of memory layout
    for &v in array.iter() {
        match precision {
            Precision::Float32 => buf.put_f32(v as f32),
            Precision::Float64 => buf.put_f64(v),
        }
    }

    std::fs::write(dir.join(format!("{}.meta", stem)), meta.to_meta_string())?;
    std::fs::write(dir.join(format!("{}.data", stem)), &buf[..])?;
    debug!(name = stem, shape = ?array.shape(), "Wrote MDS array");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XC_META: &str = " nDims = [   2 ];
 dimList = [
   192,    1,  192,
   144,    1,  144
 ];
 dataprec = [ 'float32' ];
 nrecords = [     1 ];
 timeStepNumber = [          0 ];
";

    #[test]
    fn test_parse_meta() {
        let meta = MdsMeta::parse(XC_META).unwrap();
        assert_eq!(meta.dims, vec![192, 144]);
        assert_eq!(meta.precision, Precision::Float32);
        assert_eq!(meta.nrecords, 1);
        assert_eq!(meta.shape(), vec![144, 192]);
    }

    #[test]
    fn test_parse_meta_records() {
        let text = " nDims = [ 3 ];\n dimList = [ 10, 1, 10, 8, 1, 8, 5, 1, 5 ];\n dataprec = [ 'float64' ];\n nrecords = [ 12 ];\n";
        let meta = MdsMeta::parse(text).unwrap();
        assert_eq!(meta.shape(), vec![12, 5, 8, 10]);
        assert_eq!(meta.precision, Precision::Float64);
        assert_eq!(meta.len(), 12 * 5 * 8 * 10);
    }

    #[test]
    fn test_parse_meta_rejects_tiles() {
        let text = " nDims = [ 2 ];\n dimList = [ 192, 1, 96, 144, 1, 144 ];\n dataprec = [ 'float32' ];\n nrecords = [ 1 ];\n";
        assert!(matches!(MdsMeta::parse(text), Err(ReaderError::Tiled(_))));
    }

    #[test]
    fn test_parse_meta_bad_precision() {
        let text = " nDims = [ 1 ];\n dimList = [ 4, 1, 4 ];\n dataprec = [ 'int16' ];\n";
        assert!(matches!(
            MdsMeta::parse(text),
            Err(ReaderError::InvalidMeta(_))
        ));
    }

    #[test]
    fn test_meta_string_roundtrip() {
        let meta = MdsMeta {
            dims: vec![4, 3, 2],
            precision: Precision::Float64,
            nrecords: 1,
        };
        assert_eq!(MdsMeta::parse(&meta.to_meta_string()).unwrap(), meta);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("THETA.data"), "THETA");
        assert_eq!(file_stem("THETA.meta"), "THETA");
        assert_eq!(file_stem("THETA"), "THETA");
    }
}
