use std::{
    collections::HashMap,
    fmt,
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use gridmark_model::{PlayerIdentity, TeamKey};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{AssetError, Result},
    teams,
};

const REQUIRED_COLUMNS: [&str; 3] = ["gsis_id", "espn_id", "name"];

/// Which identifier column a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// League-internal GSIS id (`00-0033873`).
    League,
    /// ESPN id; the one headshot URLs are built from.
    Vendor,
    /// nfl.com id.
    Nfl,
}

impl IdKind {
    pub fn column(self) -> &'static str {
        match self {
            IdKind::League => "gsis_id",
            IdKind::Vendor => "espn_id",
            IdKind::Nfl => "nfl_id",
        }
    }
}

/// A raw record of the player id cross-reference CSV. Unknown columns are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleRow {
    #[serde(default)]
    pub gsis_id: Option<String>,
    #[serde(default)]
    pub espn_id: Option<String>,
    #[serde(default)]
    pub nfl_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Missing values show up as empty cells or `NA`; numeric ids sometimes
/// carry a float suffix (`3139477.0`).
fn clean_cell(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return None;
    }
    Some(trimmed.to_string())
}

fn strip_float_suffix(id: &str) -> &str {
    match id.strip_suffix(".0") {
        Some(stripped)
            if !stripped.is_empty()
                && stripped.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stripped
        }
        _ => id,
    }
}

fn clean_numeric_id(value: Option<String>) -> Option<String> {
    clean_cell(value).map(|id| strip_float_suffix(&id).to_string())
}

/// Canonical form of a vendor id as used in headshot URLs and cache file
/// names: trimmed, float suffix dropped, ASCII alphanumerics only.
pub fn clean_vendor_id(raw: &str) -> Result<String> {
    let id = strip_float_suffix(raw.trim());
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AssetError::InvalidVendorId {
            raw: raw.to_string(),
        });
    }
    Ok(id.to_string())
}

#[derive(Debug, Clone)]
pub(crate) struct OracleEntry {
    pub(crate) identity: PlayerIdentity,
    pub(crate) nfl_id: Option<String>,
    pub(crate) name_folded: Option<String>,
}

impl OracleEntry {
    fn from_row(row: OracleRow) -> Option<Self> {
        let team = clean_cell(row.team).and_then(|raw| teams::normalize(&raw).ok());
        let name = clean_cell(row.name);
        let name_folded = name.as_deref().map(fold_name);
        let identity = PlayerIdentity::new(
            clean_cell(row.gsis_id),
            clean_numeric_id(row.espn_id),
            name,
        )
        .ok()?
        .with_team(team)
        .with_position(clean_cell(row.position));

        Some(Self {
            identity,
            nfl_id: clean_numeric_id(row.nfl_id),
            name_folded,
        })
    }

    pub(crate) fn team(&self) -> Option<TeamKey> {
        self.identity.team()
    }
}

pub(crate) fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only player id cross-reference table, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    entries: Vec<OracleEntry>,
    by_league: HashMap<String, usize>,
    by_vendor: HashMap<String, usize>,
    by_nfl: HashMap<String, usize>,
}

impl Oracle {
    /// Build from already-deserialized rows. Rows with no identifying field
    /// are dropped; duplicate ids keep their first row.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = OracleRow>,
    {
        let mut oracle = Oracle::default();
        for row in rows {
            let Some(entry) = OracleEntry::from_row(row) else {
                continue;
            };
            let idx = oracle.entries.len();
            if let Some(id) = entry.identity.league_id() {
                oracle.by_league.entry(id.to_ascii_lowercase()).or_insert(idx);
            }
            if let Some(id) = entry.identity.vendor_id() {
                oracle.by_vendor.entry(id.to_ascii_lowercase()).or_insert(idx);
            }
            if let Some(id) = entry.nfl_id.as_deref() {
                oracle.by_nfl.entry(id.to_ascii_lowercase()).or_insert(idx);
            }
            oracle.entries.push(entry);
        }
        oracle
    }

    /// Parse CSV with a header row. The `gsis_id`, `espn_id` and `name`
    /// columns are required; `team`, `position` and `nfl_id` are optional.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|err| AssetError::Oracle(format!("unreadable header row: {err}")))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(AssetError::Oracle(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.deserialize::<OracleRow>().enumerate() {
            match record {
                Ok(row) => rows.push(row),
                Err(err) => {
                    debug!(line = line + 2, "skipping malformed oracle row: {err}");
                }
            }
        }

        Ok(Self::from_rows(rows))
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv_reader(bytes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, kind: IdKind, id: &str) -> Option<&PlayerIdentity> {
        let index = match kind {
            IdKind::League => &self.by_league,
            IdKind::Vendor => &self.by_vendor,
            IdKind::Nfl => &self.by_nfl,
        };
        let id = match kind {
            IdKind::League => id.trim(),
            IdKind::Vendor | IdKind::Nfl => strip_float_suffix(id.trim()),
        }
        .to_ascii_lowercase();
        index
            .get(&id)
            .and_then(|idx| self.entries.get(*idx))
            .map(|entry| &entry.identity)
    }

    pub(crate) fn entries(&self) -> &[OracleEntry] {
        &self.entries
    }
}

/// Where the oracle table comes from.
#[async_trait]
pub trait OracleSource: Send + Sync {
    async fn load(&self) -> Result<Oracle>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

impl fmt::Debug for dyn OracleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<dyn OracleSource {}>", self.describe())
    }
}

/// Oracle read from a local CSV file.
#[derive(Debug, Clone)]
pub struct CsvFileOracle {
    path: PathBuf,
}

impl CsvFileOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OracleSource for CsvFileOracle {
    async fn load(&self) -> Result<Oracle> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            AssetError::Oracle(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))
        })?;
        let oracle = tokio::task::spawn_blocking(move || {
            Oracle::from_csv_bytes(&bytes)
        })
        .await
        .map_err(|err| AssetError::Internal(format!("oracle parse task failed: {err}")))??;

        info!(
            path = %self.path.display(),
            players = oracle.len(),
            "loaded player id oracle"
        );
        Ok(oracle)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Oracle downloaded over HTTP on first use.
#[derive(Debug, Clone)]
pub struct RemoteCsvOracle {
    client: reqwest::Client,
    url: Url,
    user_agent: String,
    timeout: Duration,
}

impl RemoteCsvOracle {
    pub fn new(
        client: reqwest::Client,
        url: Url,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            url,
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl OracleSource for RemoteCsvOracle {
    async fn load(&self) -> Result<Oracle> {
        debug!(url = %self.url, "downloading player id oracle");
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                AssetError::Oracle(format!("request to {} failed: {err}", self.url))
            })?;

        if !response.status().is_success() {
            return Err(AssetError::Oracle(format!(
                "{} returned HTTP {}",
                self.url,
                response.status().as_u16()
            )));
        }

        let bytes = response.bytes().await.map_err(|err| {
            AssetError::Oracle(format!("failed reading body of {}: {err}", self.url))
        })?;
        let oracle = tokio::task::spawn_blocking(move || {
            Oracle::from_csv_bytes(&bytes)
        })
        .await
        .map_err(|err| AssetError::Internal(format!("oracle parse task failed: {err}")))??;

        if oracle.is_empty() {
            warn!(url = %self.url, "player id oracle downloaded but contained no players");
        } else {
            info!(url = %self.url, players = oracle.len(), "loaded player id oracle");
        }
        Ok(oracle)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Oracle supplied up front, e.g. a table the caller already holds.
#[derive(Debug, Clone)]
pub struct StaticOracle {
    oracle: Oracle,
}

impl StaticOracle {
    pub fn new(oracle: Oracle) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl OracleSource for StaticOracle {
    async fn load(&self) -> Result<Oracle> {
        Ok(self.oracle.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} players)", self.oracle.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
gsis_id,espn_id,nfl_id,name,team,position,age
00-0033873,3139477.0,,Patrick Mahomes,KC,QB,29
00-0036355,4241479,,Justin Herbert,LAC,QB,26
NA,NA,,,,,
00-0034857,3918298,,Josh Allen,BUF,QB,28
";

    #[test]
    fn parses_rows_and_cleans_cells() {
        let oracle = Oracle::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(oracle.len(), 3);

        let mahomes = oracle.lookup(IdKind::League, "00-0033873").unwrap();
        assert_eq!(mahomes.vendor_id(), Some("3139477"));
        assert_eq!(mahomes.team(), Some(TeamKey::Kc));
        assert_eq!(mahomes.position(), Some("QB"));
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let oracle = Oracle::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        let allen = oracle.lookup(IdKind::Vendor, " 3918298 ").unwrap();
        assert_eq!(allen.display_name(), Some("Josh Allen"));
        assert!(oracle.lookup(IdKind::Nfl, "3918298").is_none());
    }

    #[test]
    fn missing_required_columns_is_an_error() {
        let err = Oracle::from_csv_bytes(b"gsis_id,name\n00-1,A B\n").unwrap_err();
        assert!(matches!(err, AssetError::Oracle(msg) if msg.contains("espn_id")));
    }

    #[test]
    fn float_suffix_only_stripped_from_numbers() {
        assert_eq!(
            clean_numeric_id(Some("12.0".into())).as_deref(),
            Some("12")
        );
        assert_eq!(
            clean_numeric_id(Some("ab.0".into())).as_deref(),
            Some("ab.0")
        );
        assert_eq!(clean_numeric_id(Some(" na ".into())), None);
    }

    #[test]
    fn caller_vendor_ids_are_cleaned_like_oracle_cells() {
        assert_eq!(clean_vendor_id(" 3139477.0 ").unwrap(), "3139477");
        assert_eq!(clean_vendor_id("abc123").unwrap(), "abc123");
        for bad in ["", "  ", "../etc", "31-39", "a_b", "1.5"] {
            let err = clean_vendor_id(bad).unwrap_err();
            assert!(matches!(err, AssetError::InvalidVendorId { .. }), "{bad}");
        }

        let oracle = Oracle::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        let mahomes = oracle.lookup(IdKind::Vendor, "3139477.0").unwrap();
        assert_eq!(mahomes.display_name(), Some("Patrick Mahomes"));
    }

    #[test]
    fn vendor_feed_team_codes_are_normalized() {
        let csv = "\
gsis_id,espn_id,name,team
00-1,1,San Francisco Player,SFO
00-2,2,Las Vegas Player,LVR
00-3,3,Kansas City Player,KCC
00-4,4,Green Bay Player,GBP
00-5,5,New England Player,NEP
00-6,6,New Orleans Player,NOS
00-7,7,Tampa Bay Player,TBB
";
        let oracle = Oracle::from_csv_bytes(csv.as_bytes()).unwrap();
        let expected = [
            TeamKey::Sf,
            TeamKey::Lv,
            TeamKey::Kc,
            TeamKey::Gb,
            TeamKey::Ne,
            TeamKey::No,
            TeamKey::Tb,
        ];
        for (idx, team) in expected.into_iter().enumerate() {
            let id = (idx + 1).to_string();
            let player = oracle.lookup(IdKind::Vendor, &id).unwrap();
            assert_eq!(player.team(), Some(team), "row {id}");
        }
    }
}
