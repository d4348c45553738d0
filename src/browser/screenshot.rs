use crate::errors::Result;
use base64::Engine;
use std::path::Path;

/// Write captured PNG bytes to disk, overwriting any previous artifact.
pub async fn save_to_file(bytes: &[u8], path: &Path) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Inline a captured PNG as a `data:` URL, for collaborators that accept
/// images without a fetchable location.
pub fn to_data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
