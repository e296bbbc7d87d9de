/*!

This is the long-form manual for `regional_story` and `admstory`.

## Input formats

The dataset has one row per region. The following formats are supported:
* `csv` Comma Separated Values with a header row (default)
* `xlsx` Excel workbook, first row as header

### `csv`

```text
Region,Total_Students,Average_Score,Near_Perfect_Count,Median_Age,Female_Percentage
Сумська обл.,3120,148.2,61,17,48.5
м. Київ,46213,154.9,1204,18,55.1
```

The `Region` column holds the Ukrainian name of the region, as published in the
statistics (`Сумська обл.`, `м. Київ`). Rows whose region is not one of the 25
known regions are kept for the statistics panel but do not appear on the map.

All the other columns are optional. A missing or malformed value reads as `0`.
Count columns (`Total_Students`, `Under_18_Count`, ...) are read as integers,
anything after the leading digits is ignored. `Male_Percentage` defaults to
`100 - Female_Percentage` when absent or empty.

### `xlsx`

The same table in an Excel workbook. Numbers are read as they are stored in the
cell. Use `--excel-worksheet-name` to pick a worksheet, the first one is used
otherwise.

## Metrics

The map can display any of:

`Total_Students`, `Average_Score`, `Near_Perfect_Percentage`, `Std_Deviation`,
`Nomination_Count`, `Min_Score`, `Median_Age`, `Min_Age`, `Under_18_Percentage`,
`Under_18_Count`, `Over_30_Percentage`, `Over_30_Count`, `Gender_Balance_Score`,
`Female_Percentage`, `Male_Percentage`, `Gender_Score_Gap`,
`Female_High_Perf_Percentage`, `Male_High_Perf_Percentage`,
`Near_Perfect_Count`, `Female_High_Perf_Count`, `Male_High_Perf_Count`.

Any other name displays `Total_Students`.

`Total_Students` in the first chapter and `Under_18_Count` everywhere are
colored on a logarithmic scale (`log10(x + 1)`). Tooltips and legends always
show the original value.

## Story file

The story is built in. It can be replaced with a JSON file (`--story`):

```json
[
  {
    "id": "intro",
    "title": "Вступ",
    "content": "Markdown text",
    "mapConfig": { "metric": "Total_Students", "colorScheme": "interpolateBlues", "title": "Кількість зарахованих" },
    "sections": [
      { "id": "scores", "title": "Бали", "content": "...", "mapConfig": { "metric": "Average_Score" } }
    ]
  }
]
```

Every chapter and subsection needs a unique, non-empty `id`. The `mapConfig`
fields are all optional and are merged one by one over the default
(`Total_Students`, `interpolateViridis`, `Ukrainian Regional Data`). A
subsection without `mapConfig` shows the map of its chapter.

Color schemes are named after their d3 interpolators: `interpolateBlues`,
`interpolateGreens`, `interpolateOranges`, `interpolatePurples`,
`interpolateReds`, `interpolateViridis`.

## Navigation

`down` (or `j`) moves to the next subsection, or to the next chapter after the
last subsection. `up` (or `k`) goes back the same way. Changing chapter fades
the content out, swaps it, then fades it in again. Commands received during a
fade are ignored. `c <n>` jumps to a chapter and `s <n>` to a subsection of the
current chapter, without fading.

The arrows around the chapter dots are filled when a move is possible in their
direction. The introduction shows the overall figures of the dataset. The
subsections of the academic, age and gender chapters of the built-in story show
the matching chart (score histogram, age bars, gender split). Chapters of a
story file get no chart.

## Configuration

`admstory` accepts a configuration file in JSON. All the fields are optional and
the command line flags take precedence.

```json
{
  "outputSettings": { "title": "Зарахування 2024", "outputPath": "summary.json" },
  "dataSource": { "provider": "csv", "filePath": "regional_nominations_dataset.csv" },
  "storyFile": "story.json",
  "transitions": { "fadeOutMs": 400, "settleMs": 100 }
}
```

Relative paths are resolved against the directory of the configuration file.

`dataSource`:
 - `provider` (string): `csv` or `xlsx`
 - `filePath` (string): the dataset
 - `worksheetName` (string, optional): for Excel-based inputs, the name of
 the worksheet in Excel.

`transitions`: durations of the two halves of a chapter change, in
milliseconds. Only the interactive mode waits.

 */
