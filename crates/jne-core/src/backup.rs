use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::FileOptions;

// Zip backup of a document file (non-destructive).
// The archive lands next to the source as `<stem>_<timestamp>.zip`.
pub fn zip_backup(src: &Path) -> io::Result<PathBuf> {
    if !src.is_file() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "backup source is not a file"));
    }
    let parent = src.parent().unwrap_or(Path::new("."));
    let stem = src.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", stem, ts));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let entry = src.file_name().and_then(|s| s.to_str()).unwrap_or("document.json");
    zip.start_file(entry, options)?;
    zip.write_all(&fs::read(src)?)?;
    zip.finish()?;
    log::info!("backup written to {}", dest.display());
    Ok(dest)
}
