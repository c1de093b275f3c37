use std::{io::ErrorKind, path::Path};

use anyhow::{anyhow, Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Parsed content of a CSV table.
#[derive(Debug, PartialEq)]
pub struct Table<T> {
    pub rows: Vec<T>,
    /// Lines that couldn't be parsed. Writing `rows` back would lose them.
    pub skipped: usize,
}

/// Reads every row of a CSV table. Returns `None` when the file doesn't exist, so callers can
/// decide what an absent table means. Rows that can't be parsed are skipped and counted.
pub async fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<Table<T>>> {
    async fn extract(path: &Path) -> std::result::Result<Vec<u8>, std::io::Error> {
        debug!("Reading {path:?}");
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut buffer = vec![];
        let result = file.read_to_end(&mut buffer).await;
        file.unlock_async().await?;
        result?;
        Ok(buffer)
    }

    let buffer = match extract(path).await {
        Ok(v) => v,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {path:?}"))?,
    };

    Ok(Some(parse_rows(path, &buffer)))
}

fn parse_rows<T: DeserializeOwned>(path: &Path, buffer: &[u8]) -> Table<T> {
    let mut reader = csv::ReaderBuilder::new().from_reader(buffer);
    let mut table = Table {
        rows: vec![],
        skipped: 0,
    };
    for (index, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(v) => table.rows.push(v),
            Err(e) => {
                // ignore illegal rows, the rest of the table is still readable
                warn!("Skipping row {} in {path:?}: {e}", index + 1);
                table.skipped += 1;
            }
        }
    }
    table
}

/// Replaces the whole content of a CSV table. The header is always written, so an empty table
/// still defines its columns.
pub async fn overwrite_rows<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let buffer = encode_rows(columns, rows)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {parent:?}"))?;
    }

    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {path:?}"))?;

    // Truncation happens only after the lock is held, so readers never see a half-empty file.
    file.lock_exclusive()?;
    let result = write_with_file(&mut file, &buffer).await;
    file.unlock_async().await?;
    debug!("Wrote {} rows to {path:?}", rows.len());
    result.with_context(|| format!("Failed to write {path:?}"))
}

async fn write_with_file(file: &mut File, buffer: &[u8]) -> std::result::Result<(), std::io::Error> {
    file.set_len(0).await?;
    file.rewind().await?;
    file.write_all(buffer).await?;
    file.flush().await?;
    file.sync_data().await?;
    Ok(())
}

fn encode_rows<T: Serialize>(columns: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush csv buffer {}", e.error()))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    use super::{overwrite_rows, read_rows, Table};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Owner")]
        owner: Option<String>,
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let rows = read_rows::<Row>(&dir.path().join("missing.csv")).await?;
        assert!(rows.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_then_read() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("table.csv");
        let rows = vec![
            Row {
                name: "first".into(),
                owner: Some("Asha".into()),
            },
            Row {
                name: "second, with comma".into(),
                owner: None,
            },
        ];
        overwrite_rows(&path, &["Name", "Owner"], &rows).await?;
        assert_eq!(read_rows::<Row>(&path).await?.map(|v| v.rows), Some(rows));

        // A shorter rewrite must not leave the tail of the previous content behind.
        let shorter = vec![Row {
            name: "x".into(),
            owner: None,
        }];
        overwrite_rows(&path, &["Name", "Owner"], &shorter).await?;
        assert_eq!(read_rows::<Row>(&path).await?.map(|v| v.rows), Some(shorter));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_table_keeps_header() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("table.csv");
        overwrite_rows::<Row>(&path, &["Name", "Owner"], &[]).await?;
        assert_eq!(std::fs::read_to_string(&path)?, "Name,Owner\n");
        assert_eq!(
            read_rows::<Row>(&path).await?,
            Some(Table {
                rows: vec![],
                skipped: 0
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_rows_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "Name,Owner\nok,Asha\nbroken\nalso ok,\n")?;
        let table = read_rows::<Row>(&path).await?.unwrap();
        assert_eq!(table.skipped, 1);
        assert_eq!(
            table.rows,
            vec![
                Row {
                    name: "ok".into(),
                    owner: Some("Asha".into())
                },
                Row {
                    name: "also ok".into(),
                    owner: None
                },
            ]
        );
        Ok(())
    }
}
