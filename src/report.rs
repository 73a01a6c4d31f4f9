use crate::errors::{AnalysisError, AnalysisResult};
use crate::indicators::FibonacciLevels;
use crate::market_chart::PricePoint;
use crate::recommendation::Recommendation;
use crate::storage_utils::AsyncStorageManager;
use chrono::DateTime;
use csv::Writer;
use std::path::PathBuf;

pub const HEADER: [&str; 5] = ["Date", "Price", "RSI", "Fibonacci Levels", "Recommendation"];

/// One CSV line. RSI, levels and recommendation are run-level values and are
/// the same on every row of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: String,
    pub price: f64,
    pub rsi: f64,
    pub fib_levels: FibonacciLevels,
    pub recommendation: Recommendation,
}

pub fn report_filename(token: &str) -> String {
    format!("dogecoin_analysis_{}.csv", token)
}

/// `YYYY-MM-DD` of the UTC calendar day, not the machine's local day, so a
/// report for the same payload is identical wherever it is produced.
pub fn format_date(ts_ms: i64) -> AnalysisResult<String> {
    DateTime::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| AnalysisError::Parse(format!("timestamp out of range: {}", ts_ms)))
}

pub fn build_rows(
    points: &[PricePoint],
    rsi: f64,
    fib_levels: &FibonacciLevels,
    recommendation: Recommendation,
) -> AnalysisResult<Vec<ReportRow>> {
    points
        .iter()
        .map(|p| {
            Ok(ReportRow {
                date: format_date(p.timestamp_ms)?,
                price: p.price,
                rsi,
                fib_levels: *fib_levels,
                recommendation,
            })
        })
        .collect()
}

pub fn to_csv(rows: &[ReportRow]) -> AnalysisResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(HEADER)?;

    for row in rows {
        let levels = serde_json::to_string(&row.fib_levels)
            .map_err(|e| AnalysisError::Write(e.to_string()))?;
        writer.write_record([
            row.date.clone(),
            row.price.to_string(),
            row.rsi.to_string(),
            levels,
            row.recommendation.to_string(),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| AnalysisError::Write(e.to_string()))
}

pub async fn save_report(
    storage: &AsyncStorageManager,
    filename: &str,
    rows: &[ReportRow],
) -> AnalysisResult<PathBuf> {
    let csv = to_csv(rows)?;
    let path = storage.write_atomic(filename, &csv).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::fibonacci_levels;
    use crate::storage_utils::tests::scratch_dir;

    const DAY_MS: i64 = 86_400_000;

    fn points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp_ms: 1_704_067_200_000 + i as i64 * DAY_MS, // 2024-01-01
                price,
            })
            .collect()
    }

    #[test]
    fn filename_uses_token() {
        assert_eq!(
            report_filename("0123456789abcdef0123456789abcdef"),
            "dogecoin_analysis_0123456789abcdef0123456789abcdef.csv"
        );
    }

    #[test]
    fn dates_follow_the_utc_day() {
        assert_eq!(format_date(0).unwrap(), "1970-01-01");
        assert_eq!(format_date(1_704_067_200_000).unwrap(), "2024-01-01");
        assert_eq!(format_date(1_704_153_599_999).unwrap(), "2024-01-01");
        assert!(format_date(i64::MAX).is_err());
    }

    #[test]
    fn one_row_per_point_with_shared_run_values() {
        let pts = points(&[0.08, 0.09, 0.07, 0.1]);
        let prices: Vec<f64> = pts.iter().map(|p| p.price).collect();
        let fib = fibonacci_levels(&prices).unwrap();
        let rows = build_rows(&pts, 42.0, &fib, Recommendation::Hold).unwrap();

        assert_eq!(rows.len(), pts.len());
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[3].date, "2024-01-04");
        assert_eq!(rows[2].price, 0.07);
        assert!(rows.iter().all(|r| r.rsi == 42.0
            && r.fib_levels == fib
            && r.recommendation == Recommendation::Hold));
    }

    #[test]
    fn csv_quotes_the_levels_object() {
        let pts = points(&[0.0, 100.0]);
        let fib = fibonacci_levels(&[0.0, 100.0]).unwrap();
        let rows = build_rows(&pts, 100.0, &fib, Recommendation::Sell).unwrap();
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Price,RSI,Fibonacci Levels,Recommendation");
        assert!(lines[1].starts_with("2024-01-01,0,100,\"{\"\"0%\"\":0.0,\"\"23.6%\"\":"));
        assert!(lines[1].ends_with("\"\"100%\"\":100.0}\",Sell"));
        assert!(lines[2].starts_with("2024-01-02,100,100,"));
    }

    #[test]
    fn csv_reads_back_into_five_columns() {
        let pts = points(&[0.08, 0.09, 0.07]);
        let fib = fibonacci_levels(&[0.08, 0.09, 0.07]).unwrap();
        let rows = build_rows(&pts, 37.5, &fib, Recommendation::Hold).unwrap();
        let bytes = to_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        for (record, row) in records.iter().zip(&rows) {
            assert_eq!(record.len(), 5);
            assert_eq!(&record[0], row.date);
            assert_eq!(record[1].parse::<f64>().unwrap(), row.price);
            assert_eq!(&record[2], "37.5");
            assert_eq!(&record[4], "Hold");

            let levels: serde_json::Value = serde_json::from_str(&record[3]).unwrap();
            let keys: Vec<&str> = levels.as_object().unwrap().keys().map(String::as_str).collect();
            assert_eq!(keys.len(), 6);
            assert!((levels["38.2%"].as_f64().unwrap() - fib.level_382).abs() < 1e-12);
        }
    }

    #[tokio::test]
    async fn saves_into_storage_dir() {
        let dir = scratch_dir();
        let storage = AsyncStorageManager::at(&dir);
        let pts = points(&[1.0, 2.0, 3.0]);
        let fib = fibonacci_levels(&[1.0, 2.0, 3.0]).unwrap();
        let rows = build_rows(&pts, 100.0, &fib, Recommendation::Hold).unwrap();

        let path = save_report(&storage, &report_filename("abc"), &rows).await.unwrap();
        assert_eq!(path, dir.join("dogecoin_analysis_abc.csv"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);

        let _ = std::fs::remove_dir_all(dir);
    }
}
