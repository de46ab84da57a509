//! InfluxDB 查询响应（CSV）解析
//!
//! 响应由若干张表组成：每张表一行表头，随后是数据行，表之间以空行分隔。
//! 以 `#` 开头的注解行被忽略。表头为 `error,reference` 的表表示
//! 查询在流中途失败，整体返回错误。

use crate::error::StorageError;
use std::sync::Arc;

/// 一行查询结果，按列名取值。
#[derive(Debug, Clone)]
pub struct FluxRecord {
    columns: Arc<Vec<String>>,
    values: Vec<String>,
}

impl FluxRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.values.get(index).map(String::as_str)
    }
}

/// 解析完整响应体。
pub fn parse_records(body: &str) -> Result<Vec<FluxRecord>, StorageError> {
    let mut records = Vec::new();
    let mut header: Option<Arc<Vec<String>>> = None;
    let mut error_column: Option<usize> = None;

    for row in split_rows(body)? {
        if row.is_empty() {
            header = None;
            error_column = None;
            continue;
        }
        if row.first().is_some_and(|cell| cell.starts_with('#')) {
            header = None;
            error_column = None;
            continue;
        }
        let Some(columns) = header.as_ref() else {
            error_column = if row.iter().any(|name| name == "reference") {
                row.iter().position(|name| name == "error")
            } else {
                None
            };
            header = Some(Arc::new(row));
            continue;
        };
        if let Some(index) = error_column {
            let message = row.get(index).map(String::as_str).unwrap_or("unknown error");
            return Err(StorageError::new(format!("influx query error: {message}")));
        }
        if row.len() != columns.len() {
            return Err(StorageError::new(format!(
                "malformed csv row: expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        records.push(FluxRecord {
            columns: Arc::clone(columns),
            values: row,
        });
    }
    Ok(records)
}

/// 按 RFC 4180 规则切分行与单元格；空行返回空 Vec。
fn split_rows(body: &str) -> Result<Vec<Vec<String>>, StorageError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut line_has_content = false;
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
            continue;
        }
        match ch {
            '"' if cell.is_empty() => {
                in_quotes = true;
                line_has_content = true;
            }
            ',' => {
                row.push(std::mem::take(&mut cell));
                line_has_content = true;
            }
            '\r' => {}
            '\n' => {
                if line_has_content {
                    row.push(std::mem::take(&mut cell));
                }
                rows.push(std::mem::take(&mut row));
                line_has_content = false;
            }
            _ => {
                cell.push(ch);
                line_has_content = true;
            }
        }
    }
    if in_quotes {
        return Err(StorageError::new("malformed csv: unterminated quote"));
    }
    if line_has_content {
        row.push(cell);
        rows.push(row);
    }
    Ok(rows)
}
