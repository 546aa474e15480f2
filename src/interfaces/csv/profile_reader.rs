use crate::application::ProfileDirectory;
use crate::domain::profile::NewProfile;
use crate::error::{MarketError, Result};
use std::io::Read;
use tracing::warn;

/// Reads profile seed rows from a CSV source.
///
/// Expected headers: `name,company,role_title,industry,bio,price_cents,calendly_link,is_approved`.
/// Empty cells read as absent; `is_approved` may be omitted entirely.
pub struct ProfileReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProfileReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes rows; a bad row yields an error and reading
    /// continues with the next one.
    pub fn profiles(self) -> impl Iterator<Item = Result<NewProfile>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MarketError::from))
    }
}

/// Creates a profile for every valid row, returning how many were loaded.
///
/// Rows that fail to parse or validate are logged with their line number
/// and skipped. Storage failures abort the load.
pub async fn seed_profiles<R: Read>(directory: &ProfileDirectory, source: R) -> Result<usize> {
    let mut loaded = 0;
    for (index, row) in ProfileReader::new(source).profiles().enumerate() {
        let line = index + 2;
        let new = match row {
            Ok(new) => new,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable profile row");
                continue;
            }
        };
        match directory.create(new).await {
            Ok(_) => loaded += 1,
            Err(e) if e.is_upstream() => return Err(e),
            Err(e) => warn!(line, error = %e, "Skipping invalid profile row"),
        }
    }
    Ok(loaded)
}
