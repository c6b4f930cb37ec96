//! Deferred side effects recorded by pure logic.
//!
//! Logic never touches the platform directly. It appends [`Action`]s to the
//! effect log and the frame stepper applies them after rendering.

use std::path::PathBuf;
use std::sync::Arc;

use super::uid::Uid;

/// System cursor shapes a backend is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CursorType {
    Arrow,
    IBeam,
    Wait,
    Crosshair,
    WaitArrow,
    SizeNWSE,
    SizeNESW,
    SizeWE,
    SizeNS,
    SizeAll,
    No,
    Hand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorCmd {
    Push(CursorType),
    Pop(CursorType),
}

/// Where an image load reads its encoded bytes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Path(path) => write!(f, "Path({})", path.display()),
            ImageSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(path: &std::path::Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Log(String),
    SetCursor(CursorCmd),
    SetTextEditing(bool),
    LoadImage { uid: Uid, source: ImageSource },
}

impl Action {
    /// Uid of a load request, if this is one.
    pub fn load_uid(&self) -> Option<Uid> {
        match self {
            Action::LoadImage { uid, .. } => Some(*uid),
            _ => None,
        }
    }
}
