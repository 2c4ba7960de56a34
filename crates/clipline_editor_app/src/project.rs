// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project files: a saved timeline, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::state::TimelineState;
use crate::store::TimelineStore;

/// Current project format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Project file extension
pub const PROJECT_EXTENSION: &str = "clipline";

/// Project file errors
#[derive(Debug, Error)]
pub enum ProjectError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File written by a newer version
    #[error("Project version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version understood
        supported: u32,
    },
}

/// A saved editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version
    pub version: u32,
    /// Timeline, including the imported media
    pub timeline: TimelineState,
}

impl ProjectFile {
    /// Wrap a timeline
    pub fn new(timeline: TimelineState) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            timeline,
        }
    }

    /// Load a project file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path)?;
        let project: ProjectFile = ron::from_str(&content)?;

        // Version check
        if project.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: project.version,
                supported: PROJECT_FORMAT_VERSION,
            });
        }

        info!("Opened project {} ({} clips)", path.display(), project.timeline.len());
        Ok(project)
    }

    /// Save the project file
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        info!("Saved project {}", path.display());
        Ok(())
    }

    /// Open the timeline for editing
    pub fn into_store(self, history_depth: usize) -> TimelineStore {
        TimelineStore::with_history_depth(self.timeline, history_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::source;
    use clipline_editor_media::SilentRegion;
    use clipline_editor_timeline::{AnimatableProperty, ClipAnimation, Easing, Keyframe};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("demo.{PROJECT_EXTENSION}"));

        let mut timeline = TimelineState::from_import(source(8.0), Some("ken-burns".to_string()));
        timeline.loop_enabled = true;
        timeline.silent_regions = vec![SilentRegion { start: 1.0, end: 2.5 }];
        if let Some(clip) = timeline.clips.values_mut().next() {
            let mut animation = ClipAnimation::new("Custom");
            animation.add_keyframe(
                AnimatableProperty::Rotate,
                Keyframe::new(0.5, 12.0).with_easing(Easing::EaseOut),
            );
            clip.animation = Some(animation);
        }

        let project = ProjectFile::new(timeline);
        project.save(&path).unwrap();
        assert_eq!(ProjectFile::load(&path).unwrap(), project);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.clipline");

        let mut project = ProjectFile::new(TimelineState::new());
        project.version = PROJECT_FORMAT_VERSION + 1;
        project.save(&path).unwrap();

        assert!(matches!(
            ProjectFile::load(&path),
            Err(ProjectError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_into_store_keeps_timeline() {
        let project = ProjectFile::new(TimelineState::from_import(source(3.0), None));
        let expected = project.timeline.clone();
        let store = project.into_store(5);
        assert_eq!(store.state(), &expected);
        assert_eq!(store.history_stats().max_depth, 5);
    }
}
