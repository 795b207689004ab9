//! Export command - build a reference pack from a saved match

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use refmatch::core::paths::ProjectPaths;
use refmatch::export::{build_pack, ExportRequest};
use refmatch::library::GuideStore;
use refmatch::matching::MatchResponse;

use super::{block_on, image_source};

/// Accepts either `refmatch match --json` output or an export request body.
fn read_request(path: &Path, primary: Option<i64>) -> Result<ExportRequest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut request = match serde_json::from_str::<MatchResponse>(&data) {
        Ok(response) => ExportRequest::from_response(&response, None),
        Err(_) => serde_json::from_str::<ExportRequest>(&data)
            .with_context(|| format!("{} is neither a match response nor an export request", path.display()))?,
    };
    if primary.is_some() {
        request.primary_id = primary;
    }
    Ok(request)
}

pub fn run(input: &Path, output: &Path, primary: Option<i64>, json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let request = read_request(input, primary)?;
    let images = image_source(&paths)?;
    let guide = request
        .primary_id
        .and_then(|id| GuideStore::new(paths.guides_dir(paths.channel())).read_body(id));

    let pack = block_on(build_pack(&images, &request, guide.as_deref()))?;
    fs::write(output, &pack.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": output,
                "image_count": pack.image_count,
                "bytes": pack.bytes.len(),
                "primary_guide": guide.is_some(),
            })
        );
    } else {
        println!(
            "{} Wrote {} ({} images{})",
            "✓".green().bold(),
            output.display().to_string().cyan(),
            pack.image_count,
            if guide.is_some() { ", with primary guide" } else { "" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_export_request_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        fs::write(
            &path,
            r#"{"matches": [{"block": {"id": 1}, "relevanceNote": "x"}], "queryOneLiner": "q"}"#,
        )
        .unwrap();

        let request = read_request(&path, Some(1)).unwrap();
        assert_eq!(request.matches.len(), 1);
        assert_eq!(request.primary_id, Some(1));
    }

    #[test]
    fn test_read_rejects_other_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(read_request(&path, None).is_err());
    }
}
