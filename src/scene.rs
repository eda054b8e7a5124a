use crate::catalog::{self, SceneInfo};
use crate::language::Language;

/// What the simulated video shows at a given point of playback
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame<'a> {
    pub scene: &'a SceneInfo,
    pub index: usize,
    pub count: usize,
    /// Progress through the active scene, 0-100
    pub scene_progress: u8,
}

impl SceneFrame<'_> {
    pub fn title(&self, lang: Language) -> &str {
        self.scene.title.get(lang)
    }

    pub fn description(&self, lang: Language) -> &str {
        self.scene.description.get(lang)
    }
}

/// Pure lookup of the scene for `module_id` at `progress` percent
pub fn frame(module_id: &str, progress: i32) -> Option<SceneFrame<'static>> {
    frame_in(catalog::catalog().scenes(module_id), progress)
}

pub fn frame_in(scenes: &[SceneInfo], progress: i32) -> Option<SceneFrame<'_>> {
    let progress = progress.clamp(0, 100) as u32;
    let index = scenes
        .iter()
        .rposition(|s| s.at <= progress)
        .unwrap_or(0);
    let scene = scenes.get(index)?;

    let scene_progress = match scenes.get(index + 1) {
        Some(next) if next.at > scene.at => {
            let span = next.at - scene.at;
            (progress.saturating_sub(scene.at) * 100 / span).min(100) as u8
        }
        _ => 100,
    };

    Some(SceneFrame {
        scene,
        index,
        count: scenes.len(),
        scene_progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_last_scene_started() {
        // tawaf scenes start at 0, 30, 70
        assert_eq!(frame("tawaf", 0).unwrap().index, 0);
        assert_eq!(frame("tawaf", 29).unwrap().index, 0);
        assert_eq!(frame("tawaf", 30).unwrap().index, 1);
        assert_eq!(frame("tawaf", 100).unwrap().index, 2);
    }

    #[test]
    fn scene_progress_within_span() {
        let f = frame("tawaf", 50).unwrap();
        assert_eq!(f.index, 1);
        assert_eq!(f.scene_progress, 50);
        assert_eq!(frame("tawaf", 85).unwrap().scene_progress, 100);
    }

    #[test]
    fn unknown_module_uses_intro_scenes() {
        let f = frame("arafat", 10).unwrap();
        assert_eq!(f.count, 4);
        assert_eq!(f.title(Language::En), "The Holy Kaaba");
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(frame("ihram", -20).unwrap().index, 0);
        assert_eq!(frame("ihram", 250).unwrap().index, 2);
    }

    #[test]
    fn empty_scene_list_has_no_frame() {
        assert!(frame_in(&[], 40).is_none());
    }
}
