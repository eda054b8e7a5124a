//! Static course content embedded in the binary.
//!
//! The module list, quiz questions, task checklists, video scenes and the
//! translation table are read-only for the lifetime of the process.

use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::language::{Language, Localized};
use crate::quiz::QuizQuestion;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalog/data");

/// Module whose checklist is used when a module has none of its own
pub const FALLBACK_TASK_MODULE: &str = "ihram";
/// Module whose scenes are used when a module has none of its own
pub const FALLBACK_SCENE_MODULE: &str = "intro";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    Missing(&'static str),

    #[error("catalog file {file} is not valid UTF-8")]
    Encoding { file: &'static str },

    #[error("catalog file {file} is malformed: {source}")]
    Malformed {
        file: &'static str,
        source: serde_json::Error,
    },
}

/// Display metadata for one course module
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleInfo {
    pub id: String,
    pub icon: String,
    pub duration_mins: u32,
}

impl ModuleInfo {
    pub fn title_key(&self) -> String {
        format!("module_{}", self.id)
    }

    pub fn description_key(&self) -> String {
        format!("desc_{}", self.id)
    }
}

/// One beat of a module's simulated video, starting at `at` percent
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SceneInfo {
    pub at: u32,
    pub icon: String,
    pub title: Localized<String>,
    pub description: Localized<String>,
}

#[derive(Debug)]
pub struct Catalog {
    modules: Vec<ModuleInfo>,
    quizzes: HashMap<String, Vec<QuizQuestion>>,
    tasks: HashMap<String, Vec<Localized<String>>>,
    scenes: HashMap<String, Vec<SceneInfo>>,
    translations: HashMap<String, Localized<String>>,
}

fn read_json<T: DeserializeOwned>(file: &'static str) -> Result<T, CatalogError> {
    let contents = DATA_DIR
        .get_file(file)
        .ok_or(CatalogError::Missing(file))?
        .contents_utf8()
        .ok_or(CatalogError::Encoding { file })?;
    serde_json::from_str(contents).map_err(|source| CatalogError::Malformed { file, source })
}

impl Catalog {
    pub fn load() -> Result<Self, CatalogError> {
        Ok(Self {
            modules: read_json("modules.json")?,
            quizzes: read_json("quizzes.json")?,
            tasks: read_json("tasks.json")?,
            scenes: read_json("scenes.json")?,
            translations: read_json("translations.json")?,
        })
    }

    /// Modules in course order
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn module(&self, id: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.id.as_str())
    }

    /// Questions for a module's quiz; empty when the module has none
    pub fn questions(&self, module_id: &str) -> &[QuizQuestion] {
        self.quizzes
            .get(module_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn task_steps(&self, module_id: &str) -> &[Localized<String>] {
        self.tasks
            .get(module_id)
            .or_else(|| self.tasks.get(FALLBACK_TASK_MODULE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn scenes(&self, module_id: &str) -> &[SceneInfo] {
        self.scenes
            .get(module_id)
            .or_else(|| self.scenes.get(FALLBACK_SCENE_MODULE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn translation(&self, key: &str) -> Option<&Localized<String>> {
        self.translations.get(key)
    }

    pub fn module_title(&self, id: &str, lang: Language) -> String {
        let key = format!("module_{id}");
        self.translation(&key)
            .map(|t| t.get(lang).clone())
            .unwrap_or(key)
    }
}

/// The process-wide catalog, parsed on first use
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| Catalog::load().expect("embedded catalog data is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        Catalog::load().unwrap();
    }

    #[test]
    fn seven_modules_in_course_order() {
        let ids: Vec<&str> = catalog().module_ids().collect();
        assert_eq!(
            ids,
            vec!["intro", "ihram", "tawaf", "sai", "arafat", "muzdalifah", "completion"]
        );
    }

    #[test]
    fn every_module_has_title_description_and_quiz() {
        let cat = catalog();
        for module in cat.modules() {
            assert!(cat.translation(&module.title_key()).is_some(), "{}", module.id);
            assert!(
                cat.translation(&module.description_key()).is_some(),
                "{}",
                module.id
            );
            assert!(!cat.questions(&module.id).is_empty(), "{}", module.id);
        }
    }

    #[test]
    fn quiz_questions_are_well_formed() {
        let cat = catalog();
        for module in cat.modules() {
            for q in cat.questions(&module.id) {
                for lang in Language::ALL {
                    let options = q.options.get(lang);
                    assert!(!options.is_empty(), "{} has no options", q.id);
                    assert!(q.correct_answer < options.len(), "{} answer out of range", q.id);
                }
            }
        }
    }

    #[test]
    fn task_steps_fall_back_to_ihram() {
        let cat = catalog();
        assert_eq!(cat.task_steps("sai"), cat.task_steps(FALLBACK_TASK_MODULE));
        assert_ne!(cat.task_steps("tawaf"), cat.task_steps(FALLBACK_TASK_MODULE));
        assert!(!cat.task_steps("unknown").is_empty());
    }

    #[test]
    fn scenes_are_sorted_and_start_at_zero() {
        let cat = catalog();
        for module in cat.modules() {
            let scenes = cat.scenes(&module.id);
            assert_eq!(scenes.first().map(|s| s.at), Some(0));
            assert!(scenes.windows(2).all(|w| w[0].at < w[1].at));
        }
    }

    #[test]
    fn module_title_falls_back_to_key() {
        assert_eq!(catalog().module_title("sai", Language::En), "Sa'i (Safa-Marwa)");
        assert_eq!(catalog().module_title("nope", Language::En), "module_nope");
    }
}
