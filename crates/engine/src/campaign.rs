//! Campaign loading: an ordered list of levels from JSON, or the built-in set.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::types::{Campaign, LevelDescriptor, LevelError};

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("failed to read campaign file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed campaign: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("campaign has no levels")]
    Empty,
}

/// Parse and validate a campaign document.
///
/// ```
/// use tui_tiles_engine::parse_campaign;
///
/// let campaign = parse_campaign(
///     r#"{"title": "Demo", "levels": [{"level": 1, "image": "cat", "elements": 9}]}"#,
/// )
/// .unwrap();
/// assert_eq!(campaign.levels[0].grid_size(), 3);
/// ```
pub fn parse_campaign(json: &str) -> Result<Campaign, CampaignError> {
    let campaign: Campaign = serde_json::from_str(json)?;
    validate(&campaign)?;
    Ok(campaign)
}

/// Read a campaign from a JSON file.
pub fn load_campaign(path: &Path) -> Result<Campaign, CampaignError> {
    let json = fs::read_to_string(path).map_err(|source| CampaignError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let campaign = parse_campaign(&json)?;
    info!(
        path = %path.display(),
        title = %campaign.title,
        levels = campaign.levels.len(),
        "campaign loaded"
    );
    Ok(campaign)
}

fn validate(campaign: &Campaign) -> Result<(), CampaignError> {
    if campaign.levels.is_empty() {
        return Err(CampaignError::Empty);
    }
    for level in &campaign.levels {
        level.validate()?;
    }
    Ok(())
}

/// Index of the level with number `level`, falling back to the first.
pub fn level_index(campaign: &Campaign, level: u32) -> usize {
    campaign
        .levels
        .iter()
        .position(|l| l.level == level)
        .unwrap_or(0)
}

/// The level after `index`, or `None` once the last level is behind it.
pub fn next_level(campaign: &Campaign, index: usize) -> Option<(usize, &LevelDescriptor)> {
    let next = index + 1;
    campaign.levels.get(next).map(|level| (next, level))
}
