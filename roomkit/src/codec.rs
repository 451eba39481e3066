use std::fmt;
use std::str::FromStr;

/// Preferred codec for published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoCodec {
    #[default]
    Vp8,
    H264,
    Vp9,
    Av1,
}

impl VideoCodec {
    /// Lowercase wire name of the codec.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::Vp8 => "vp8",
            VideoCodec::H264 => "h264",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Av1 => "av1",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoCodec {
    type Err = ();

    /// Case-insensitive parse. Unknown or empty input falls back to vp8,
    /// the safe default every engine supports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vp8" => Ok(VideoCodec::Vp8),
            "h264" => Ok(VideoCodec::H264),
            "vp9" => Ok(VideoCodec::Vp9),
            "av1" => Ok(VideoCodec::Av1),
            _ => Ok(VideoCodec::Vp8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codecs() {
        assert_eq!("vp8".parse::<VideoCodec>().unwrap(), VideoCodec::Vp8);
        assert_eq!("H264".parse::<VideoCodec>().unwrap(), VideoCodec::H264);
        assert_eq!(" vp9 ".parse::<VideoCodec>().unwrap(), VideoCodec::Vp9);
        assert_eq!("AV1".parse::<VideoCodec>().unwrap(), VideoCodec::Av1);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_vp8() {
        assert_eq!("h265".parse::<VideoCodec>().unwrap(), VideoCodec::Vp8);
        assert_eq!("".parse::<VideoCodec>().unwrap(), VideoCodec::Vp8);
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(VideoCodec::H264.to_string(), "h264");
        assert_eq!(VideoCodec::default().to_string(), "vp8");
    }
}
