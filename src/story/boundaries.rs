// The features of the boundary file.
//
// Only the properties of the features matter: the map is drawn as text, so the
// geometries are never read.

use crate::story::*;

use regional_story::{find_by_latin, REGIONS};
use serde::Serialize;
use serde_json::{json, Map as JSMap, Value as JSValue};

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct BoundaryFeature {
    /// The `NAME_1` property: the key of the region on the map.
    pub name: String,
    pub id: Option<JSValue>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub varname: Option<String>,
    pub properties: JSMap<String, JSValue>,
}

impl BoundaryFeature {
    fn from_properties(properties: JSMap<String, JSValue>) -> Option<BoundaryFeature> {
        let name = properties.get("NAME_1")?.as_str()?.to_string();
        let text = |key: &str| {
            properties
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        Some(BoundaryFeature {
            kind: text("ENGTYPE_1"),
            varname: text("VARNAME_1"),
            id: properties.get("ID_1").cloned(),
            name,
            properties,
        })
    }
}

pub fn read_boundaries(path: &str) -> StoryResult<Vec<BoundaryFeature>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    let res = features_from_json(&js)?;
    info!(
        "Read {} features from {:?}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

/// Reads a GeoJSON feature collection or the geometry collections of a
/// TopoJSON topology.
pub fn features_from_json(js: &JSValue) -> StoryResult<Vec<BoundaryFeature>> {
    let geometries: Vec<&JSValue> = match js["type"].as_str() {
        Some("FeatureCollection") => match js["features"].as_array() {
            Some(l) => l.iter().collect(),
            None => whatever!("A feature collection needs a list of features"),
        },
        Some("Topology") => match js["objects"].as_object() {
            Some(objects) => objects
                .values()
                .filter_map(|o| o["geometries"].as_array())
                .flatten()
                .collect(),
            None => whatever!("A topology needs objects"),
        },
        x => whatever!("Unsupported boundary file type: {:?}", x),
    };
    let mut res: Vec<BoundaryFeature> = Vec::new();
    for g in geometries {
        match g["properties"]
            .as_object()
            .cloned()
            .and_then(BoundaryFeature::from_properties)
        {
            Some(f) => res.push(f),
            None => debug!("features_from_json: skipping feature without NAME_1"),
        }
    }
    Ok(res)
}

/// The features of all the known regions, when no boundary file is given.
pub fn builtin_features() -> Vec<BoundaryFeature> {
    REGIONS
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let kind = match r.latin {
                "Kiev City" | "Sevastopol'" => "Independent City",
                "Crimea" => "Autonomous Republic",
                _ => "Region",
            };
            let properties = json!({
                "ID_1": idx + 1,
                "NAME_1": r.latin,
                "ENGTYPE_1": kind,
            });
            BoundaryFeature {
                name: r.latin.to_string(),
                id: Some(json!(idx + 1)),
                kind: Some(kind.to_string()),
                varname: None,
                properties: properties.as_object().cloned().unwrap_or_default(),
            }
        })
        .collect()
}

pub fn load_features(path: Option<&str>) -> StoryResult<Vec<BoundaryFeature>> {
    match path {
        Some(p) => read_boundaries(p),
        None => {
            debug!("load_features: no boundary file, using the region table");
            Ok(builtin_features())
        }
    }
}

/// The regions of the boundary file sorted by name, with their dataset names.
pub fn region_listing(features: &[BoundaryFeature]) -> Vec<String> {
    let mut sorted: Vec<&BoundaryFeature> = features.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .iter()
        .map(|f| {
            let dataset = find_by_latin(&f.name)
                .and_then(|r| r.dataset_name)
                .unwrap_or(UNMAPPED_LABEL);
            format!(
                "{} | id: {} | type: {} | varname: {} | dataset: {}",
                f.name,
                f.id.as_ref().map(|v| v.to_string()).unwrap_or_default(),
                f.kind.as_deref().unwrap_or(""),
                f.varname.as_deref().unwrap_or(""),
                dataset
            )
        })
        .collect()
}

const UNMAPPED_LABEL: &str = "-";
