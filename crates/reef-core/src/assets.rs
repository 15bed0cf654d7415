use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bootstrap::{Diagnostic, LoadReport};

/// Key of the frame list used when a requested key is unknown.
pub const DEFAULT_IMAGE_KEY: &str = "default";

/// A single animation frame: where its pixels live and which color, if any,
/// should be drawn transparent. Pixels are never decoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Path to the frame's image file, as written in the image list.
    pub path: PathBuf,
    /// RGB color keyed out when the frame is drawn.
    pub transparent: Option<[u8; 3]>,
}

impl Frame {
    /// A frame without a transparency key.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            transparent: None,
        }
    }
}

/// An ordered, shared sequence of frames. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageList(Arc<[Frame]>);

impl ImageList {
    /// Build a list from frames. An empty input yields a single placeholder frame.
    pub fn new(frames: Vec<Frame>) -> Self {
        if frames.is_empty() {
            return Self::placeholder();
        }
        Self(frames.into())
    }

    /// A one-frame list with no backing file.
    pub fn placeholder() -> Self {
        Self(vec![Frame::new(DEFAULT_IMAGE_KEY)].into())
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a list holds at least one frame.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The frame at `index`, wrapping around.
    pub fn frame(&self, index: usize) -> &Frame {
        &self.0[index % self.0.len()]
    }

    /// All frames in order.
    pub fn frames(&self) -> &[Frame] {
        &self.0
    }
}

impl Default for ImageList {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Frame lists keyed by asset name.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<String, Vec<Frame>>,
    default_images: ImageList,
}

impl ImageStore {
    /// An empty store whose lookups all fall back to `default_images`.
    pub fn new(default_images: ImageList) -> Self {
        Self {
            images: HashMap::new(),
            default_images,
        }
    }

    /// The frames registered under `key`, or the default list.
    pub fn image_list(&self, key: &str) -> ImageList {
        match self.images.get(key) {
            Some(frames) if !frames.is_empty() => ImageList::new(frames.clone()),
            _ => self.default_images.clone(),
        }
    }

    /// Whether any frame has been registered for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    /// Append a frame to the list for `key`.
    pub fn push(&mut self, key: impl Into<String>, frame: Frame) {
        self.images.entry(key.into()).or_default().push(frame);
    }

    /// Read an image list: one `key path [r g b]` entry per line.
    ///
    /// Lines with fewer than two fields are ignored. A line whose color
    /// triple does not parse is reported and skipped; loading continues.
    pub fn load_from_str(&mut self, text: &str) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [key, path, rest @ ..] = fields.as_slice() else {
                continue;
            };

            let transparent = match rest {
                [r, g, b, ..] => match parse_rgb(r, g, b) {
                    Some(rgb) => Some(rgb),
                    None => {
                        tracing::warn!(line = index, "image format error");
                        report
                            .diagnostics
                            .push(Diagnostic::new(index, "image format error"));
                        continue;
                    }
                },
                _ => None,
            };

            self.push(
                *key,
                Frame {
                    path: PathBuf::from(*path),
                    transparent,
                },
            );
            report.loaded += 1;
        }
        report
    }
}

fn parse_rgb(r: &str, g: &str, b: &str) -> Option<[u8; 3]> {
    Some([r.parse().ok()?, g.parse().ok()?, b.parse().ok()?])
}
