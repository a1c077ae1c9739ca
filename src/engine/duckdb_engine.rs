//! In-process DuckDB engine.

use chrono::{DateTime, NaiveTime};
use duckdb::types::{TimeUnit, ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection, ToSql};
use tracing::{debug, info};

use super::{CellValue, Engine, EngineResult, Row, SqlParam};

/// DuckDB execution engine.
///
/// Owns one connection; dropping the engine closes it.
pub struct DuckDbEngine {
    conn: Connection,
}

impl DuckDbEngine {
    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }
}

impl Engine for DuckDbEngine {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn execute_batch(&self, sql: &str) -> EngineResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&self, sql: &str, params: &[SqlParam]) -> EngineResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let value: Value = row.get(i)?;
                cells.push(cell_from_value(value));
            }
            out.push(cells);
        }
        Ok(out)
    }

    fn enable_remote_sources(&self) -> EngineResult<()> {
        info!("loading httpfs for remote sources");
        self.conn.execute_batch("INSTALL httpfs; LOAD httpfs;")?;
        Ok(())
    }

    fn close(self) -> EngineResult<()> {
        debug!("closing duckdb connection");
        self.conn.close().map_err(|(_, err)| err)?;
        Ok(())
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::Int(v) => v.to_sql(),
            SqlParam::Text(s) => s.to_sql(),
        }
    }
}

/// Convert a DuckDB value to its engine-independent cell.
fn cell_from_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Bool(b),
        Value::TinyInt(i) => CellValue::Int(i128::from(i)),
        Value::SmallInt(i) => CellValue::Int(i128::from(i)),
        Value::Int(i) => CellValue::Int(i128::from(i)),
        Value::BigInt(i) => CellValue::Int(i128::from(i)),
        Value::HugeInt(i) => CellValue::Int(i),
        Value::UTinyInt(i) => CellValue::Int(i128::from(i)),
        Value::USmallInt(i) => CellValue::Int(i128::from(i)),
        Value::UInt(i) => CellValue::Int(i128::from(i)),
        Value::UBigInt(i) => CellValue::Int(i128::from(i)),
        Value::Float(x) => CellValue::Float(f64::from(x)),
        Value::Double(x) => CellValue::Float(x),
        Value::Decimal(d) => CellValue::Other(d.to_string()),
        Value::Text(s) => CellValue::Text(s),
        Value::List(items) => {
            CellValue::List(items.into_iter().map(cell_from_value).collect())
        }
        other => CellValue::Other(temporal_text(&other).unwrap_or_else(|| format!("{:?}", other))),
    }
}

/// Calendar text for DATE, TIMESTAMP and TIME values.
fn temporal_text(value: &Value) -> Option<String> {
    match value {
        Value::Date32(days) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
            .map(|dt| dt.date_naive().to_string()),
        Value::Timestamp(unit, ts) => {
            DateTime::from_timestamp_micros(to_micros(unit, *ts)).map(|dt| dt.naive_utc().to_string())
        }
        Value::Time64(unit, t) => {
            let micros = to_micros(unit, *t);
            let secs = u32::try_from(micros / 1_000_000).ok()?;
            let nanos = u32::try_from(micros % 1_000_000 * 1_000).ok()?;
            NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).map(|time| time.to_string())
        }
        _ => None,
    }
}

fn to_micros(unit: &TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}
