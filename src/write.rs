use std::fs::OpenOptions;
use std::path::Path;

use crate::profile::ProfileRecord;
use crate::Result;

/// Header row, in the exact column order of [`ProfileRecord`].
const HEADER: [&str; 6] = ["ID", "URL", "Name", "Email", "LastAccess", "Courses"];

/// Appends every record to the CSV at `path`, creating it with a header row
/// first when it doesn't exist yet. Re-running over an overlapping range
/// appends duplicate rows, there is no deduplication. The handle is opened
/// and closed per row, fine at batch scale.
pub fn write_records(path: &Path, records: &[ProfileRecord]) -> Result<()> {
    ensure_header(path)?;
    for record in records {
        append_record(path, record)?;
    }
    Ok(())
}

/// Creates the file with the header row when missing; an existing file is
/// left untouched.
fn ensure_header(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let file = OpenOptions::new().create_new(true).write(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(HEADER)?;
    writer.flush()?;
    Ok(())
}

fn append_record(path: &Path, record: &ProfileRecord) -> Result<()> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}
