//! Extension-based file classification for URLs that point at a file.

use hilo_core::entities::FileTypeDescriptor;
use hilo_core::enums::FileKind;

use crate::host::{ParsedUrl, host_matches_suffix};

/// Hosts whose URLs are always described by the link classifier, even when
/// the path ends in a file extension.
const DEFERRED_HOSTS: &[&str] = &[
    "discordapp.com",
    "discordapp.net",
    "discord.com",
    "github.com",
    "githubusercontent.com",
    "google.com",
    "googleusercontent.com",
    "imgur.com",
];

/// `(extension, kind, display name)`, extension lowercase without the dot.
const EXTENSIONS: &[(&str, FileKind, &str)] = &[
    ("jpg", FileKind::Image, "Imagen JPEG"),
    ("jpeg", FileKind::Image, "Imagen JPEG"),
    ("png", FileKind::Image, "Imagen PNG"),
    ("gif", FileKind::Image, "Imagen GIF"),
    ("webp", FileKind::Image, "Imagen WebP"),
    ("bmp", FileKind::Image, "Imagen BMP"),
    ("svg", FileKind::Image, "Imagen SVG"),
    ("tif", FileKind::Image, "Imagen TIFF"),
    ("tiff", FileKind::Image, "Imagen TIFF"),
    ("heic", FileKind::Image, "Imagen HEIC"),
    ("ico", FileKind::Image, "Icono"),
    ("mp4", FileKind::Video, "Video MP4"),
    ("mkv", FileKind::Video, "Video MKV"),
    ("avi", FileKind::Video, "Video AVI"),
    ("mov", FileKind::Video, "Video MOV"),
    ("wmv", FileKind::Video, "Video WMV"),
    ("webm", FileKind::Video, "Video WebM"),
    ("flv", FileKind::Video, "Video FLV"),
    ("m4v", FileKind::Video, "Video M4V"),
    ("3gp", FileKind::Video, "Video 3GP"),
    ("mp3", FileKind::Audio, "Audio MP3"),
    ("wav", FileKind::Audio, "Audio WAV"),
    ("ogg", FileKind::Audio, "Audio OGG"),
    ("oga", FileKind::Audio, "Audio OGG"),
    ("opus", FileKind::Audio, "Audio Opus"),
    ("flac", FileKind::Audio, "Audio FLAC"),
    ("aac", FileKind::Audio, "Audio AAC"),
    ("m4a", FileKind::Audio, "Audio M4A"),
    ("wma", FileKind::Audio, "Audio WMA"),
    ("pdf", FileKind::Document, "Documento PDF"),
    ("doc", FileKind::Document, "Documento Word"),
    ("docx", FileKind::Document, "Documento Word"),
    ("odt", FileKind::Document, "Documento OpenDocument"),
    ("rtf", FileKind::Document, "Documento RTF"),
    ("txt", FileKind::Document, "Archivo de texto"),
    ("md", FileKind::Document, "Documento Markdown"),
    ("xls", FileKind::Document, "Hoja de cálculo Excel"),
    ("xlsx", FileKind::Document, "Hoja de cálculo Excel"),
    ("ods", FileKind::Document, "Hoja de cálculo OpenDocument"),
    ("csv", FileKind::Document, "Datos CSV"),
    ("ppt", FileKind::Document, "Presentación PowerPoint"),
    ("pptx", FileKind::Document, "Presentación PowerPoint"),
    ("odp", FileKind::Document, "Presentación OpenDocument"),
    ("epub", FileKind::Document, "Libro EPUB"),
    ("zip", FileKind::Compressed, "Archivo ZIP"),
    ("rar", FileKind::Compressed, "Archivo RAR"),
    ("7z", FileKind::Compressed, "Archivo 7-Zip"),
    ("tar", FileKind::Compressed, "Archivo TAR"),
    ("gz", FileKind::Compressed, "Archivo GZIP"),
    ("tgz", FileKind::Compressed, "Archivo GZIP"),
    ("bz2", FileKind::Compressed, "Archivo BZIP2"),
    ("xz", FileKind::Compressed, "Archivo XZ"),
    ("exe", FileKind::Executable, "Ejecutable de Windows"),
    ("msi", FileKind::Executable, "Instalador de Windows"),
    ("apk", FileKind::Executable, "Aplicación Android"),
    ("dmg", FileKind::Executable, "Imagen de disco macOS"),
    ("deb", FileKind::Executable, "Paquete Debian"),
    ("rpm", FileKind::Executable, "Paquete RPM"),
    ("appimage", FileKind::Executable, "AppImage"),
    ("bin", FileKind::Executable, "Binario"),
    ("py", FileKind::Code, "Código Python"),
    ("js", FileKind::Code, "Código JavaScript"),
    ("ts", FileKind::Code, "Código TypeScript"),
    ("rs", FileKind::Code, "Código Rust"),
    ("go", FileKind::Code, "Código Go"),
    ("java", FileKind::Code, "Código Java"),
    ("c", FileKind::Code, "Código C"),
    ("h", FileKind::Code, "Cabecera C"),
    ("cpp", FileKind::Code, "Código C++"),
    ("cs", FileKind::Code, "Código C#"),
    ("rb", FileKind::Code, "Código Ruby"),
    ("php", FileKind::Code, "Código PHP"),
    ("sh", FileKind::Code, "Script de shell"),
    ("sql", FileKind::Code, "Script SQL"),
    ("json", FileKind::Code, "Datos JSON"),
    ("xml", FileKind::Code, "Datos XML"),
    ("yaml", FileKind::Code, "Datos YAML"),
    ("yml", FileKind::Code, "Datos YAML"),
    ("toml", FileKind::Code, "Datos TOML"),
];

/// Classify a URL by the extension of its last path segment.
///
/// Deferred hosts and URLs without a recognized extension yield
/// [`FileKind::Unknown`], which tells the normalizer to use the link classifier.
#[must_use]
pub fn detect(raw: &str) -> FileTypeDescriptor {
    ParsedUrl::parse(raw).map_or_else(
        || FileTypeDescriptor::unknown(""),
        |url| detect_parsed(&url),
    )
}

#[must_use]
pub fn detect_parsed(url: &ParsedUrl) -> FileTypeDescriptor {
    let filename = url.file_name();
    if DEFERRED_HOSTS
        .iter()
        .any(|d| host_matches_suffix(&url.host, d))
    {
        return FileTypeDescriptor::unknown(&filename);
    }

    let Some((stem, ext)) = filename.rsplit_once('.') else {
        return FileTypeDescriptor::unknown(&filename);
    };
    if stem.is_empty() {
        return FileTypeDescriptor::unknown(&filename);
    }
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map_or_else(
            || FileTypeDescriptor::unknown(&filename),
            |(_, kind, name)| FileTypeDescriptor {
                kind: *kind,
                display_name: (*name).to_string(),
                filename: filename.clone(),
            },
        )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn recognizes_documents_case_insensitively() {
        let d = detect("https://example.com/files/Informe.PDF");
        assert_eq!(d.kind, FileKind::Document);
        assert_eq!(d.display_name, "Documento PDF");
        assert_eq!(d.render(), "📄 Documento PDF: Informe.PDF");
    }

    #[test]
    fn query_string_does_not_affect_the_extension() {
        let d = detect("https://cdn.example.org/a/b/clip.mp4?token=abc");
        assert_eq!(d.kind, FileKind::Video);
        assert_eq!(d.filename, "clip.mp4");
    }

    #[test]
    fn deferred_hosts_are_unknown() {
        for url in [
            "https://cdn.discordapp.com/attachments/1/2/photo.png",
            "https://github.com/owner/repo/blob/main/src/lib.rs",
            "https://raw.githubusercontent.com/owner/repo/main/data.json",
            "https://drive.google.com/file/d/abc/report.pdf",
            "https://i.imgur.com/abc123.jpg",
        ] {
            assert!(detect(url).is_unknown(), "{url}");
        }
    }

    #[test]
    fn missing_or_unrecognized_extensions_are_unknown() {
        assert!(detect("https://example.com/").is_unknown());
        assert!(detect("https://example.com/page").is_unknown());
        assert!(detect("https://example.com/archive.xyz123").is_unknown());
        assert!(detect("https://example.com/.htaccess").is_unknown());
        assert!(detect("not a url").is_unknown());
    }
}
