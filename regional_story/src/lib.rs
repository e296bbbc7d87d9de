/*!
The core of a guided tour through the bachelor admissions of 2024 in the regions
of Ukraine.

A story is an ordered list of chapters, each with optional subsections. Every
node of the story tells which metric of the regional dataset the map shows.
This crate holds everything that does not depend on how the story is drawn:

- the table between the region names of the boundary file and of the dataset
- the resolution of a metric against a dataset row, with its log transform
- the story itself and the map configuration of each of its nodes
- the navigation between the nodes
- the aggregates of the statistics panel and the color scales

```
use regional_story::*;

let story = Story::builtin()?;
let rows = vec![
    Observation::from_pairs(&[("Region", "Сумська обл."), ("Total_Students", "999")]),
];

let mut nav = Navigator::new(&story);
nav.initialize();
nav.finish_transition();

let config = story.map_config(&nav.cursor());
let values = prepare_map_data(&rows, &config.metric, nav.cursor().chapter);
assert_eq!(values.display_value("Sumy"), Some(999.0));
assert!(values.log_scaled);
# Ok::<(), StoryErrors>(())
```

See the [manual] for the input formats.
*/

mod builtin;
mod config;
mod metrics;
mod narrative;
mod navigation;
mod regions;
mod scale;
mod stats;

pub mod builder;
pub mod manual;

pub use crate::builtin::builtin_story;
pub use crate::config::*;
pub use crate::metrics::*;
pub use crate::narrative::*;
pub use crate::navigation::*;
pub use crate::regions::*;
pub use crate::scale::*;
pub use crate::stats::*;
