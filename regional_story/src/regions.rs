//! The cross-reference between the region identifiers of the boundary file
//! (transliterated, as in the `NAME_1` property) and the Cyrillic names used
//! by the statistical dataset.

use log::debug;

/// Returned by [cyrillic_to_latin] when a dataset name has no boundary.
pub const UNMAPPED: &str = "unmapped";

// Labels longer than this are truncated on the map.
const MAX_LABEL_CHARS: usize = 12;
const TRUNCATED_LABEL_CHARS: usize = 10;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Region {
    /// Identifier in the boundary file.
    pub latin: &'static str,
    /// Name of the region in the dataset. The two boundary-only regions
    /// have none.
    pub dataset_name: Option<&'static str>,
    /// Full Ukrainian name, used in tooltips.
    pub display_name: &'static str,
    /// Short Ukrainian name, used as on-map label.
    pub short_name: &'static str,
}

const fn region(
    latin: &'static str,
    dataset_name: Option<&'static str>,
    display_name: &'static str,
    short_name: &'static str,
) -> Region {
    Region {
        latin,
        dataset_name,
        display_name,
        short_name,
    }
}

pub static REGIONS: [Region; 27] = [
    region("Luhans'k", Some("Луганська обл."), "Луганська область", "Луганська"),
    region("Poltava", Some("Полтавська обл."), "Полтавська область", "Полтавська"),
    region("Kiev City", Some("м. Київ"), "м. Київ", "Київ"),
    region("Rivne", Some("Рівненська обл."), "Рівненська область", "Рівненська"),
    region("L'viv", Some("Львівська обл."), "Львівська область", "Львівська"),
    region("Donets'k", Some("Донецька обл."), "Донецька область", "Донецька"),
    region("Vinnytsya", Some("Вінницька обл."), "Вінницька область", "Вінницька"),
    region("Odessa", Some("Одеська обл."), "Одеська область", "Одеська"),
    region("Sumy", Some("Сумська обл."), "Сумська область", "Сумська"),
    region("Kharkiv", Some("Харківська обл."), "Харківська область", "Харківська"),
    region(
        "Dnipropetrovs'k",
        Some("Дніпропетровська обл."),
        "Дніпропетровська область",
        "Дніпро",
    ),
    region("Volyn", Some("Волинська обл."), "Волинська область", "Волинська"),
    region("Kherson", Some("Херсонська обл."), "Херсонська область", "Херсонська"),
    region(
        "Kirovohrad",
        Some("Кіровоградська обл."),
        "Кіровоградська область",
        "Кіровоград",
    ),
    region(
        "Mykolayiv",
        Some("Миколаївська обл."),
        "Миколаївська область",
        "Миколаївська",
    ),
    region(
        "Chernivtsi",
        Some("Чернівецька обл."),
        "Чернівецька область",
        "Чернівецька",
    ),
    region(
        "Zaporizhzhya",
        Some("Запорізька обл."),
        "Запорізька область",
        "Запорізька",
    ),
    region("Cherkasy", Some("Черкаська обл."), "Черкаська область", "Черкаська"),
    region(
        "Transcarpathia",
        Some("Закарпатська обл."),
        "Закарпатська область",
        "Закарпатська",
    ),
    region(
        "Ternopil'",
        Some("Тернопільська обл."),
        "Тернопільська область",
        "Тернопільська",
    ),
    region("Zhytomyr", Some("Житомирська обл."), "Житомирська область", "Житомирська"),
    region(
        "Khmel'nyts'kyy",
        Some("Хмельницька обл."),
        "Хмельницька область",
        "Хмельницька",
    ),
    region(
        "Chernihiv",
        Some("Чернігівська обл."),
        "Чернігівська область",
        "Чернігівська",
    ),
    region(
        "Ivano-Frankivs'k",
        Some("Івано-Франківська обл."),
        "Івано-Франківська область",
        "Івано-Франк.",
    ),
    region("Kiev", Some("Київська обл."), "Київська область", "Київська"),
    // Present in the boundary file, absent from the dataset.
    region("Crimea", None, "Автономна Республіка Крим", "Крим"),
    region("Sevastopol'", None, "м. Севастополь", "Севастополь"),
];

/// The regions that can carry data.
pub fn dataset_regions() -> impl Iterator<Item = &'static Region> {
    REGIONS.iter().filter(|r| r.dataset_name.is_some())
}

pub fn find_by_latin(latin: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.latin == latin)
}

/// Finds a region by its dataset name or by its full display name.
pub fn find_by_cyrillic(name: &str) -> Option<&'static Region> {
    let name = name.trim();
    REGIONS
        .iter()
        .find(|r| r.dataset_name == Some(name) || r.display_name == name)
}

/// The Ukrainian display name of a boundary identifier, or the identifier
/// itself when it is not known.
pub fn latin_to_cyrillic(latin: &str) -> &str {
    match find_by_latin(latin) {
        Some(r) => r.display_name,
        None => latin,
    }
}

/// The boundary identifier of a Cyrillic region name, or [UNMAPPED].
pub fn cyrillic_to_latin(name: &str) -> &'static str {
    match find_by_cyrillic(name) {
        Some(r) => r.latin,
        None => {
            debug!("cyrillic_to_latin: no boundary for {:?}", name);
            UNMAPPED
        }
    }
}

/// The label drawn on top of a region.
pub fn map_label(latin: &str) -> String {
    let label = find_by_latin(latin).map(|r| r.short_name).unwrap_or(latin);
    if label.chars().count() > MAX_LABEL_CHARS {
        let prefix: String = label.chars().take(TRUNCATED_LABEL_CHARS).collect();
        format!("{}...", prefix)
    } else {
        label.to_string()
    }
}
