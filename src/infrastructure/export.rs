// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::announcement::AnnouncementRecord;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 将记录集写成 UTF-8 的美化 JSON 数组
pub async fn write_json(path: &Path, records: &[AnnouncementRecord]) -> Result<(), ExportError> {
    let body = serde_json::to_string_pretty(records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, body).await?;
    info!(path = %path.display(), count = records.len(), "JSON export written");
    Ok(())
}

/// 将记录集写成带 BOM 的 UTF-8 分隔表
///
/// 表头取批次内所有记录键的并集并排序，缺失字段渲染为空单元格；
/// BOM 是为了电子表格软件正确识别编码。
pub async fn write_csv(path: &Path, records: &[AnnouncementRecord]) -> Result<(), ExportError> {
    let mut rows: Vec<Map<String, Value>> = Vec::with_capacity(records.len());
    for record in records {
        if let Value::Object(map) = serde_json::to_value(record)? {
            rows.push(map);
        }
    }

    let mut columns: BTreeSet<String> = BTreeSet::new();
    for row in &rows {
        columns.extend(row.keys().cloned());
    }

    let mut out = String::from("\u{feff}");
    out.push_str(
        &columns
            .iter()
            .map(|name| csv_field(name))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push_str("\r\n");

    for row in &rows {
        let line = columns
            .iter()
            .map(|name| csv_field(&cell_text(row.get(name))))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push_str("\r\n");
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, out).await?;
    info!(path = %path.display(), count = records.len(), "CSV export written");
    Ok(())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
