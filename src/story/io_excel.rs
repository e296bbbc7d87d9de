// Reading the dataset from an Excel workbook.

use crate::story::*;

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use regional_story::Observation;

pub fn read_excel_dataset(path: &str, worksheet: Option<&str>) -> StoryResult<Vec<Observation>> {
    let wrange = get_range(path, worksheet)?;
    let res = range_to_observations(&wrange)?;
    info!(
        "Read {} rows from {:?}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

fn get_range(path: &str, worksheet: Option<&str>) -> StoryResult<Range<DataType>> {
    debug!(
        "read_excel_dataset: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }

    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => EmptyExcelSnafu { path }.fail(),
        [(worksheet_name, wrange)] => {
            debug!("read_excel_dataset: using worksheet {:?}", worksheet_name);
            Ok(wrange.clone())
        }
        [(worksheet_name, wrange), ..] => {
            let names: Vec<&String> = all_worksheets.iter().map(|(n, _)| n).collect();
            warn!(
                "Several worksheets found in {:?}: {:?}, using {:?}. Use --excel-worksheet-name to pick another one.",
                simplify_file_name(path),
                names,
                worksheet_name
            );
            Ok(wrange.clone())
        }
    }
}

/// The first row is the header. Rows without any value are skipped.
pub fn range_to_observations(wrange: &Range<DataType>) -> StoryResult<Vec<Observation>> {
    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(h) => h.iter().map(cell_to_text).collect(),
        None => whatever!("The worksheet does not have a header row"),
    };
    debug!("range_to_observations: header: {:?}", header);
    let mut res: Vec<Observation> = Vec::new();
    for row in rows {
        let values: Vec<String> = row.iter().map(cell_to_text).collect();
        if is_blank_row(&values) {
            continue;
        }
        res.push(assemble_observation(header.iter().map(|s| s.as_str()), values));
    }
    Ok(res)
}

/// The text of a cell, as it would read in a CSV export.
pub fn cell_to_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        x => {
            debug!("cell_to_text: ignoring cell {:?}", x);
            String::new()
        }
    }
}
