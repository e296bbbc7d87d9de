pub use crate::config::*;
use crate::narrative::{Chapter, Story, Subsection};

/// A builder for assembling a story in code.
///
/// Map configurations apply to the node added last, chapter or subsection.
///
/// ```
/// pub use regional_story::builder::StoryBuilder;
/// pub use regional_story::MapConfig;
/// # use regional_story::StoryErrors;
///
/// let story = StoryBuilder::new()
///     .chapter("intro", "Вступ", "Загальна картина")
///     .map(MapConfig::new("Total_Students", "interpolateBlues", "Кількість зарахованих"))
///     .chapter("scores", "Бали", "")
///     .section("average", "Середній бал", "")?
///     .map(MapConfig::new("Average_Score", "interpolateBlues", "Середній бал"))
///     .build()?;
///
/// assert_eq!(story.chapter_count(), 2);
/// # Ok::<(), StoryErrors>(())
/// ```
#[derive(Default)]
pub struct StoryBuilder {
    pub(crate) _chapters: Vec<Chapter>,
}

impl StoryBuilder {
    pub fn new() -> StoryBuilder {
        StoryBuilder {
            _chapters: Vec::new(),
        }
    }

    pub fn chapter(mut self, id: &str, title: &str, content: &str) -> StoryBuilder {
        self._chapters.push(Chapter {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            map_config: None,
            sections: Vec::new(),
        });
        self
    }

    /// Adds a subsection to the last chapter.
    pub fn section(
        mut self,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<StoryBuilder, StoryErrors> {
        let chapter = self
            ._chapters
            .last_mut()
            .ok_or_else(|| StoryErrors::SubsectionWithoutChapter(id.to_string()))?;
        chapter.sections.push(Subsection {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            map_config: None,
        });
        Ok(self)
    }

    /// Sets the map configuration of the node added last.
    ///
    /// Without any node, the configuration is dropped.
    pub fn map(mut self, config: MapConfig) -> StoryBuilder {
        if let Some(chapter) = self._chapters.last_mut() {
            match chapter.sections.last_mut() {
                Some(section) => section.map_config = Some(config),
                None => chapter.map_config = Some(config),
            }
        }
        self
    }

    pub fn build(self) -> Result<Story, StoryErrors> {
        Story::from_chapters(self._chapters)
    }
}
