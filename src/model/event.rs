//! Records of the `[Events]` section.
//!
//! Backgrounds, videos and breaks are typed. Storyboard commands and any other event lines are kept verbatim
//! in [`Event::Other`], including their leading indentation.

use crate::codec::Codec;

use super::{FieldResultExt, Record, RecordError, require_fields};

/// An event line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// `0,time,"filename",xOffset,yOffset`
    Background {
        /// Start time in milliseconds, usually `0`.
        time: i64,
        /// Image path relative to the beatmap folder, without quotes.
        filename: String,
        /// Horizontal offset from the centre of the screen.
        x_offset: i64,
        /// Vertical offset from the centre of the screen.
        y_offset: i64,
    },
    /// `Video,time,"filename",xOffset,yOffset`
    Video {
        /// Start time in milliseconds.
        time: i64,
        /// Video path relative to the beatmap folder, without quotes.
        filename: String,
        /// Horizontal offset from the centre of the screen.
        x_offset: i64,
        /// Vertical offset from the centre of the screen.
        y_offset: i64,
    },
    /// `2,start,end`
    Break {
        /// Start time in milliseconds.
        start: i64,
        /// End time in milliseconds.
        end: i64,
    },
    /// Any other line.
    Other(String),
}

impl Record for Event {
    fn parse_record(codec: &Codec, line: &str) -> Result<Self, RecordError> {
        let tokens: Vec<_> = line.split(',').collect();
        let tag = tokens[0].trim();
        let is_video = match tag {
            "0" | "Background" => false,
            "1" | "Video" => true,
            "2" | "Break" => {
                require_fields(&tokens, 3)?;
                return Ok(Self::Break {
                    start: codec.decode_int(tokens[1]).field("start")?,
                    end: codec.decode_int(tokens[2]).field("end")?,
                });
            }
            _ => return Ok(Self::Other(line.to_string())),
        };
        require_fields(&tokens, 3)?;
        let offset = |idx: usize, name: &str| {
            tokens
                .get(idx)
                .map_or(Ok(0), |token| codec.decode_int(token).field(name))
        };
        let time = codec.decode_int(tokens[1]).field("time")?;
        let filename = tokens[2].trim().trim_matches('"').to_string();
        let x_offset = offset(3, "x_offset")?;
        let y_offset = offset(4, "y_offset")?;
        Ok(if is_video {
            Self::Video {
                time,
                filename,
                x_offset,
                y_offset,
            }
        } else {
            Self::Background {
                time,
                filename,
                x_offset,
                y_offset,
            }
        })
    }

    fn write_record(&self, codec: &Codec) -> String {
        match self {
            Self::Background {
                time,
                filename,
                x_offset,
                y_offset,
            } => format!(
                "0,{},\"{filename}\",{},{}",
                codec.encode_int(*time),
                codec.encode_int(*x_offset),
                codec.encode_int(*y_offset)
            ),
            Self::Video {
                time,
                filename,
                x_offset,
                y_offset,
            } => format!(
                "Video,{},\"{filename}\",{},{}",
                codec.encode_int(*time),
                codec.encode_int(*x_offset),
                codec.encode_int(*y_offset)
            ),
            Self::Break { start, end } => {
                format!("2,{},{}", codec.encode_int(*start), codec.encode_int(*end))
            }
            Self::Other(line) => line.clone(),
        }
    }
}
