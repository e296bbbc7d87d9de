use std::path::Path;

use regional_story::Observation;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Resolves a path of the configuration file against its directory.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(r) if Path::new(path).is_relative() => r.join(path).display().to_string(),
        _ => path.to_string(),
    }
}

/// Pairs a header with the values of a row. Missing trailing values are left out.
pub fn assemble_observation<'a, I, J>(header: I, values: J) -> Observation
where
    I: IntoIterator<Item = &'a str>,
    J: IntoIterator<Item = String>,
{
    Observation::new(
        header
            .into_iter()
            .map(|h| h.trim().to_string())
            .zip(values)
            .filter(|(h, _)| !h.is_empty())
            .collect(),
    )
}

pub fn is_blank_row(values: &[String]) -> bool {
    values.iter().all(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(simplify_file_name("/a/b/data.csv"), "data.csv");
        assert_eq!(resolve_path(Some(Path::new("/cfg")), "data.csv"), "/cfg/data.csv");
        assert_eq!(resolve_path(Some(Path::new("/cfg")), "/abs.csv"), "/abs.csv");
        assert_eq!(resolve_path(None, "data.csv"), "data.csv");
    }

    #[test]
    fn short_rows() {
        let obs = assemble_observation(
            vec!["Region", " Total_Students ", "Average_Score"],
            vec!["м. Київ".to_string(), "46213".to_string()],
        );
        assert_eq!(obs.region(), Some("м. Київ"));
        assert_eq!(obs.get("Total_Students"), Some("46213"));
        assert_eq!(obs.get("Average_Score"), None);
        assert!(is_blank_row(&[" ".to_string(), String::new()]));
    }
}
