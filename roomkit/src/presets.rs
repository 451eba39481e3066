//! Standard video capture/encode presets.
//!
//! Named after their pixel height, the way conferencing SDKs label
//! simulcast layers.

/// Target encoding parameters for one simulcast layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoEncoding {
    pub max_bitrate: u32,
    pub max_framerate: f32,
}

/// A capture resolution paired with its encoding budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoPreset {
    pub width: u32,
    pub height: u32,
    pub encoding: VideoEncoding,
}

impl VideoPreset {
    /// Label of the preset, e.g. `540p`.
    pub fn label(&self) -> String {
        format!("{}p", self.height)
    }
}

/// 384x216 low-bandwidth layer.
pub const H216: VideoPreset = VideoPreset {
    width: 384,
    height: 216,
    encoding: VideoEncoding {
        max_bitrate: 160_000,
        max_framerate: 15.0,
    },
};

/// 960x540 mid layer, the default top simulcast layer.
pub const H540: VideoPreset = VideoPreset {
    width: 960,
    height: 540,
    encoding: VideoEncoding {
        max_bitrate: 800_000,
        max_framerate: 25.0,
    },
};

/// 1280x720 high layer.
pub const H720: VideoPreset = VideoPreset {
    width: 1280,
    height: 720,
    encoding: VideoEncoding {
        max_bitrate: 1_700_000,
        max_framerate: 30.0,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_dimensions() {
        assert_eq!((H216.width, H216.height), (384, 216));
        assert_eq!((H540.width, H540.height), (960, 540));
        assert_eq!((H720.width, H720.height), (1280, 720));
    }

    #[test]
    fn test_bitrates_grow_with_resolution() {
        assert!(H216.encoding.max_bitrate < H540.encoding.max_bitrate);
        assert!(H540.encoding.max_bitrate < H720.encoding.max_bitrate);
    }

    #[test]
    fn test_label() {
        assert_eq!(H540.label(), "540p");
    }
}
