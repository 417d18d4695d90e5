use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Image,
    Video,
    Document,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Video => "video",
            AttachmentKind::Document => "file",
        }
    }
}

/// A file the user picked in the composer. Only the reference is kept; the
/// contents are never read or uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
    pub kind: AttachmentKind,
}

impl Attachment {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let kind = if mime.type_() == mime_guess::mime::IMAGE {
            AttachmentKind::Image
        } else if mime.type_() == mime_guess::mime::VIDEO {
            AttachmentKind::Video
        } else {
            AttachmentKind::Document
        };

        Self {
            path: path.to_path_buf(),
            filename,
            mime_type: mime.essence_str().to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        let img = Attachment::from_path("/tmp/cat.png");
        assert_eq!(img.kind, AttachmentKind::Image);
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.filename, "cat.png");

        let video = Attachment::from_path("clips/trip.mp4");
        assert_eq!(video.kind, AttachmentKind::Video);

        let doc = Attachment::from_path("notes.pdf");
        assert_eq!(doc.kind, AttachmentKind::Document);
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[test]
    fn test_unknown_extension_is_a_document() {
        let att = Attachment::from_path("blob.zzqx");
        assert_eq!(att.kind, AttachmentKind::Document);
        assert_eq!(att.mime_type, "application/octet-stream");
    }
}
