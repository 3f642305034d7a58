//src/io.rs

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Opens `path` for buffered reading, decompressing when it ends in `.gz`.
/// `None` or `-` reads stdin.
pub fn open_input(path: Option<&Path>, capacity: usize) -> io::Result<Box<dyn BufRead>> {
    let path = match path {
        Some(p) if p != Path::new("-") => p,
        _ => return Ok(Box::new(BufReader::with_capacity(capacity, io::stdin()))),
    };

    let f = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_gzip_path(path) {
        Box::new(BufReader::with_capacity(capacity, MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::with_capacity(capacity, f))
    };
    Ok(reader)
}

/// Buffered writer over `path`, or stdout for `None` / `-`.
/// Output is never compressed.
pub fn open_output(path: Option<&Path>, capacity: usize) -> io::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if p != Path::new("-") => {
            Box::new(BufWriter::with_capacity(capacity, File::create(p)?))
        }
        _ => Box::new(BufWriter::with_capacity(capacity, io::stdout().lock())),
    };
    Ok(writer)
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}
