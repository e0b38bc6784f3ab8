use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::algorithm::{DigestValue, HashAlgorithm};

use super::entry::{DigestSet, KnownEntry};
use super::errors::KnownSetError;
use super::store::KnownStore;

/// First line of every hashdeep-format file.
pub const HASHDEEP_MAGIC: &str = "%%%% HASHDEEP-1.0";
/// Prefix shared by hashdeep header lines.
pub const HEADER_PREFIX: &str = "%%%%";
/// Prefix for hashdeep comment lines.
pub const COMMENT_PREFIX: &str = "##";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Size,
    Digest(HashAlgorithm),
    FileName,
}

/// Load a known-set file into `store`, returning the number of entries added.
///
/// Hashdeep files are recognized by their magic line. Anything else is read as
/// a plain `<hex>  <name>` sum list whose algorithm is `hint` when the digest
/// length fits it, otherwise inferred from that length.
pub fn load_known_set(
    store: &mut KnownStore,
    path: &Path,
    hint: Option<HashAlgorithm>,
) -> Result<usize, KnownSetError> {
    let file = fs::File::open(path).map_err(|source| KnownSetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_from_reader(store, BufReader::new(file), path, hint)?;
    info!(path = %path.display(), loaded, "Loaded known file set");
    Ok(loaded)
}

/// Same as [`load_known_set`] but over any buffered reader. `path` is used
/// for error messages only.
pub fn load_from_reader(
    store: &mut KnownStore,
    reader: impl BufRead,
    path: &Path,
    hint: Option<HashAlgorithm>,
) -> Result<usize, KnownSetError> {
    let mut lines = reader.lines().enumerate();
    let mut columns: Option<Vec<Column>> = None;
    let mut format_known = false;
    let mut loaded = 0usize;

    while let Some((idx, line)) = lines.next() {
        let line_no = idx + 1;
        let line = line.map_err(|source| KnownSetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim_end_matches(['\r', '\n']);
        if !format_known {
            if line.trim().is_empty() {
                continue;
            }
            format_known = true;
            if line.trim() == HASHDEEP_MAGIC {
                let Some((_, header)) = lines.next() else {
                    return Err(header_error(path, "missing column line"));
                };
                let header = header.map_err(|source| KnownSetError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                columns = Some(parse_columns(path, &header)?);
                continue;
            }
        }
        if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let entry = match &columns {
            Some(columns) => parse_hashdeep_record(path, line_no, columns, line)?,
            None => parse_plain_record(path, line_no, hint, line)?,
        };
        debug!(name = entry.name(), "Known entry");
        store.insert(entry);
        loaded += 1;
    }
    Ok(loaded)
}

fn parse_columns(path: &Path, header: &str) -> Result<Vec<Column>, KnownSetError> {
    let Some(rest) = header.trim().strip_prefix(HEADER_PREFIX) else {
        return Err(header_error(path, "column line must start with %%%%"));
    };
    let mut columns = Vec::new();
    for name in rest.split(',').map(str::trim) {
        let column = match name {
            "size" => Column::Size,
            "filename" => Column::FileName,
            other => Column::Digest(
                other
                    .parse::<HashAlgorithm>()
                    .map_err(|err| header_error(path, &err.to_string()))?,
            ),
        };
        if columns.contains(&column) {
            return Err(header_error(path, &format!("duplicate column '{name}'")));
        }
        columns.push(column);
    }
    if columns.last() != Some(&Column::FileName) {
        return Err(header_error(path, "last column must be 'filename'"));
    }
    if !columns.iter().any(|column| matches!(column, Column::Digest(_))) {
        return Err(header_error(path, "no digest columns"));
    }
    Ok(columns)
}

fn parse_hashdeep_record(
    path: &Path,
    line_no: usize,
    columns: &[Column],
    line: &str,
) -> Result<KnownEntry, KnownSetError> {
    let fields: Vec<&str> = line.splitn(columns.len(), ',').collect();
    if fields.len() != columns.len() {
        return Err(record_error(
            path,
            line_no,
            format!("expected {} fields, found {}", columns.len(), fields.len()),
        ));
    }
    let mut size = None;
    let mut name = "";
    let mut digests = DigestSet::new();
    for (column, field) in columns.iter().zip(fields) {
        match column {
            Column::Size if field.trim().is_empty() => {}
            Column::Size => {
                let parsed = field.trim().parse::<u64>().map_err(|_| {
                    record_error(path, line_no, format!("invalid size '{}'", field.trim()))
                })?;
                size = Some(parsed);
            }
            Column::Digest(algorithm) => {
                if field.trim().is_empty() {
                    continue;
                }
                let digest = DigestValue::parse_hex(field).ok_or_else(|| {
                    record_error(path, line_no, format!("invalid {algorithm} digest"))
                })?;
                digests.insert(*algorithm, digest);
            }
            Column::FileName => name = field,
        }
    }
    if name.is_empty() {
        return Err(record_error(path, line_no, "empty filename".to_string()));
    }
    Ok(KnownEntry::new(name, size, digests))
}

fn parse_plain_record(
    path: &Path,
    line_no: usize,
    hint: Option<HashAlgorithm>,
    line: &str,
) -> Result<KnownEntry, KnownSetError> {
    let Some((hex, rest)) = line.trim_start().split_once(char::is_whitespace) else {
        return Err(record_error(path, line_no, "missing filename".to_string()));
    };
    let name = rest
        .strip_prefix(' ')
        .or_else(|| rest.strip_prefix('*'))
        .unwrap_or(rest);
    if name.is_empty() {
        return Err(record_error(path, line_no, "missing filename".to_string()));
    }
    let digest = DigestValue::parse_hex(hex)
        .ok_or_else(|| record_error(path, line_no, format!("invalid digest '{hex}'")))?;
    let algorithm = hint
        .filter(|algorithm| algorithm.hex_len() == hex.len())
        .or_else(|| HashAlgorithm::infer_from_hex_len(hex.len()))
        .ok_or_else(|| {
            record_error(
                path,
                line_no,
                format!("cannot infer algorithm for {}-character digest", hex.len()),
            )
        })?;
    let mut digests = DigestSet::new();
    digests.insert(algorithm, digest);
    Ok(KnownEntry::new(name, None, digests))
}

fn header_error(path: &Path, reason: &str) -> KnownSetError {
    KnownSetError::Header {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn record_error(path: &Path, line: usize, reason: String) -> KnownSetError {
    KnownSetError::Record {
        path: path.to_path_buf(),
        line,
        reason,
    }
}
