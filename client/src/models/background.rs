//! Background Effect Models
//!
//! Describes which background effect the camera should run and
//! which image files are available for virtual backgrounds.

use std::fs;
use std::path::{Path, PathBuf};

use track_processors::{BACKGROUND_BLUR, VIRTUAL_BACKGROUND};

/// The kind of background effect applied to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundType {
    None,
    Blur,
    Image,
}

/// A background choice as shown in the settings menu.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSelection {
    pub background: BackgroundType,
    /// Set only when `background` is `Image`.
    pub image_path: Option<PathBuf>,
}

impl BackgroundSelection {
    pub fn none() -> Self {
        Self {
            background: BackgroundType::None,
            image_path: None,
        }
    }

    pub fn blur() -> Self {
        Self {
            background: BackgroundType::Blur,
            image_path: None,
        }
    }

    pub fn image(path: PathBuf) -> Self {
        Self {
            background: BackgroundType::Image,
            image_path: Some(path),
        }
    }

    /// Reconstructs the selection from the processor running on the track.
    ///
    /// The processor itself does not remember which file it was loaded
    /// from, so the caller passes the last applied image path.
    pub fn from_processor(name: Option<&str>, image_path: Option<PathBuf>) -> Self {
        match name {
            Some(n) if n == BACKGROUND_BLUR => Self::blur(),
            Some(n) if n == VIRTUAL_BACKGROUND => Self {
                background: BackgroundType::Image,
                image_path,
            },
            _ => Self::none(),
        }
    }

    /// Short label for the settings menu and logs.
    pub fn label(&self) -> String {
        match self.background {
            BackgroundType::None => "None".to_string(),
            BackgroundType::Blur => "Blur".to_string(),
            BackgroundType::Image => match &self.image_path {
                Some(path) => image_display_name(path),
                None => "Image".to_string(),
            },
        }
    }
}

/// An image file found in the background directory.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub name: String,
    pub path: PathBuf,
}

/// Lists the image files in `dir`, sorted by name.
///
/// A missing or unreadable directory yields an empty list; the
/// settings menu simply shows no image choices.
pub fn discover_backgrounds(dir: &Path) -> Vec<BackgroundImage> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut images: Vec<BackgroundImage> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if is_image_file(&path) {
                Some(BackgroundImage {
                    name: image_display_name(&path),
                    path,
                })
            } else {
                None
            }
        })
        .collect();

    images.sort_by(|a, b| a.name.cmp(&b.name));
    images
}

fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg")
}

fn image_display_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_selection_constructors() {
        assert_eq!(BackgroundSelection::none().background, BackgroundType::None);
        assert_eq!(BackgroundSelection::blur().background, BackgroundType::Blur);

        let sel = BackgroundSelection::image(PathBuf::from("beach.png"));
        assert_eq!(sel.background, BackgroundType::Image);
        assert_eq!(sel.image_path, Some(PathBuf::from("beach.png")));
    }

    #[test]
    fn test_from_processor_maps_known_names() {
        let blur = BackgroundSelection::from_processor(Some(BACKGROUND_BLUR), None);
        assert_eq!(blur, BackgroundSelection::blur());

        let path = PathBuf::from("office.jpg");
        let image =
            BackgroundSelection::from_processor(Some(VIRTUAL_BACKGROUND), Some(path.clone()));
        assert_eq!(image, BackgroundSelection::image(path));

        assert_eq!(
            BackgroundSelection::from_processor(None, None),
            BackgroundSelection::none()
        );
        assert_eq!(
            BackgroundSelection::from_processor(Some("noise-gate"), None),
            BackgroundSelection::none()
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(BackgroundSelection::none().label(), "None");
        assert_eq!(BackgroundSelection::blur().label(), "Blur");
        assert_eq!(
            BackgroundSelection::image(PathBuf::from("backgrounds/sunset.png")).label(),
            "sunset"
        );
    }

    #[test]
    fn test_discover_backgrounds_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("zebra.png")).unwrap();
        File::create(dir.path().join("alps.jpg")).unwrap();
        File::create(dir.path().join("Beach.JPEG")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("noext")).unwrap();

        let images = discover_backgrounds(dir.path());
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Beach", "alps", "zebra"]);
    }

    #[test]
    fn test_discover_backgrounds_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_backgrounds(&missing).is_empty());
    }
}
