//! Replays recorded detector output from a JSON Lines file.
//!
//! Each non-blank line is one [`FrameObservation`]:
//!
//! ```text
//! {"width":960,"height":540,"key":49,"hands":[[[0.51,0.82],[0.55,0.78],...]]}
//! ```
//!
//! `index` defaults to the line's position among frames when omitted.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::landmarks::domain::landmark_source::{FrameObservation, LandmarkSource, SourceMetadata};

#[derive(Error, Debug)]
pub enum LandmarkSourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("source not opened")]
    NotOpened,
    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed frame at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

type FrameResult = Result<FrameObservation, Box<dyn std::error::Error>>;

#[derive(Default)]
pub struct JsonlLandmarkSource {
    lines: Option<Lines<BufReader<File>>>,
}

impl JsonlLandmarkSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LandmarkSource for JsonlLandmarkSource {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let file = File::open(path).map_err(|e| LandmarkSourceError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.lines = Some(BufReader::new(file).lines());
        log::debug!("Opened landmark recording {}", path.display());
        Ok(SourceMetadata {
            source_name: path.display().to_string(),
            total_frames: None,
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = FrameResult> + '_> {
        let Some(lines) = self.lines.as_mut() else {
            return Box::new(std::iter::once(Err(Box::new(LandmarkSourceError::NotOpened)
                as Box<dyn std::error::Error>)));
        };

        let mut frame_index = 0;
        let mut read_failed = false;
        // An I/O error ends the stream; a malformed line only costs that frame.
        Box::new(
            lines
                .enumerate()
                .map_while(move |(i, line)| -> Option<Option<FrameResult>> {
                    if read_failed {
                        return None;
                    }
                    let line_no = i + 1;
                    let line = match line {
                        Ok(l) => l,
                        Err(e) => {
                            read_failed = true;
                            let err = LandmarkSourceError::Read {
                                line: line_no,
                                source: e,
                            };
                            return Some(Some(Err(Box::new(err) as Box<dyn std::error::Error>)));
                        }
                    };
                    if line.trim().is_empty() {
                        return Some(None);
                    }
                    let parsed = parse_frame(&line, line_no, frame_index);
                    frame_index += 1;
                    Some(Some(
                        parsed.map_err(|e| Box::new(e) as Box<dyn std::error::Error>),
                    ))
                })
                .flatten(),
        )
    }

    fn close(&mut self) {
        self.lines = None;
    }
}

fn parse_frame(
    line: &str,
    line_no: usize,
    frame_index: usize,
) -> Result<FrameObservation, LandmarkSourceError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| LandmarkSourceError::Parse {
            line: line_no,
            source: e,
        })?;
    let has_index = value.get("index").is_some();
    let mut frame: FrameObservation =
        serde_json::from_value(value).map_err(|e| LandmarkSourceError::Parse {
            line: line_no,
            source: e,
        })?;
    if !has_index {
        frame.index = frame_index;
    }
    Ok(frame)
}
