// file: src/corpus/job.rs
// description: job description input

use crate::error::{RankerError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a UTF-8 job description from disk.
pub fn read_job_description(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|source| RankerError::FileOperation {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Read job description from {} ({} chars)",
        path.display(),
        text.chars().count()
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_job_description() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("job_description.txt");
        fs::write(&path, "Senior backend engineer").unwrap();

        assert_eq!(read_job_description(&path).unwrap(), "Senior backend engineer");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_job_description(Path::new("/nonexistent/jd.txt")).unwrap_err();
        assert!(matches!(err, RankerError::FileOperation { .. }));
        assert!(err.to_string().contains("/nonexistent/jd.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jd.txt");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        assert!(read_job_description(&path).is_err());
    }
}
