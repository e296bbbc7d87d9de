// Primitives for reading CSV files.

use crate::story::*;

use regional_story::Observation;

/// Reads a dataset with a header row. Empty lines are skipped.
pub fn read_csv_dataset(path: &str) -> StoryResult<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_dataset: header: {:?}", header);

    let mut res: Vec<Observation> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let values: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if is_blank_row(&values) {
            debug!("read_csv_dataset: skipping empty line {}", lineno);
            continue;
        }
        res.push(assemble_observation(header.iter().map(|s| s.as_str()), values));
    }
    info!(
        "Read {} rows from {:?}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_dataset() {
        let rows = read_csv_dataset(&test_data("sample.csv")).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].region(), Some("м. Київ"));
        assert_eq!(rows[0].get("Total_Students"), Some("46213"));
        // The last row is shorter than the header.
        assert_eq!(rows[5].get("Median_Age"), None);
    }

    #[test]
    fn missing_file() {
        let res = read_csv_dataset(&test_data("nothing_here.csv"));
        assert!(matches!(res, Err(StoryError::CsvOpen { .. })));
    }
}
