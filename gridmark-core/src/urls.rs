//! Remote locations of team and player imagery.
//!
//! Pure string building over static tables plus runtime overrides; nothing
//! here touches the network.

use std::collections::BTreeMap;

use gridmark_config::UrlOverrides;
use gridmark_model::{AssetKind, HeadshotSize, PlayerIdentity, TeamKey};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{AssetError, Result},
    identity::clean_vendor_id,
    teams,
};

const ESPN_HEADSHOT_FULL: &str = "https://a.espncdn.com/i/headshots/nfl/players/full/";
const ESPN_HEADSHOT_SMALL: &str = "https://a.espncdn.com/i/headshots/nfl/players/small/";

const LOGO_URLS: [(TeamKey, &str); 35] = [
    (TeamKey::Ari, "https://upload.wikimedia.org/wikipedia/en/thumb/7/72/Arizona_Cardinals_logo.svg/179px-Arizona_Cardinals_logo.svg.png"),
    (TeamKey::Atl, "https://upload.wikimedia.org/wikipedia/en/thumb/c/c5/Atlanta_Falcons_logo.svg/192px-Atlanta_Falcons_logo.svg.png"),
    (TeamKey::Bal, "https://upload.wikimedia.org/wikipedia/en/thumb/1/16/Baltimore_Ravens_logo.svg/193px-Baltimore_Ravens_logo.svg.png"),
    (TeamKey::Buf, "https://upload.wikimedia.org/wikipedia/en/thumb/7/77/Buffalo_Bills_logo.svg/300px-Buffalo_Bills_logo.svg.png"),
    (TeamKey::Car, "https://upload.wikimedia.org/wikipedia/en/thumb/1/1c/Carolina_Panthers_logo.svg/300px-Carolina_Panthers_logo.svg.png"),
    (TeamKey::Chi, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/5c/Chicago_Bears_logo.svg/200px-Chicago_Bears_logo.svg.png"),
    (TeamKey::Cin, "https://upload.wikimedia.org/wikipedia/commons/thumb/8/81/Cincinnati_Bengals_logo.svg/300px-Cincinnati_Bengals_logo.svg.png"),
    (TeamKey::Cle, "https://upload.wikimedia.org/wikipedia/en/thumb/d/d9/Cleveland_Browns_logo.svg/300px-Cleveland_Browns_logo.svg.png"),
    (TeamKey::Dal, "https://upload.wikimedia.org/wikipedia/commons/thumb/1/15/Dallas_Cowboys.svg/192px-Dallas_Cowboys.svg.png"),
    (TeamKey::Den, "https://upload.wikimedia.org/wikipedia/en/thumb/4/44/Denver_Broncos_logo.svg/300px-Denver_Broncos_logo.svg.png"),
    (TeamKey::Det, "https://upload.wikimedia.org/wikipedia/en/thumb/7/71/Detroit_Lions_logo.svg/300px-Detroit_Lions_logo.svg.png"),
    (TeamKey::Gb, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/50/Green_Bay_Packers_logo.svg/300px-Green_Bay_Packers_logo.svg.png"),
    (TeamKey::Hou, "https://upload.wikimedia.org/wikipedia/en/thumb/2/28/Houston_Texans_logo.svg/300px-Houston_Texans_logo.svg.png"),
    (TeamKey::Ind, "https://upload.wikimedia.org/wikipedia/commons/thumb/0/00/Indianapolis_Colts_logo.svg/300px-Indianapolis_Colts_logo.svg.png"),
    (TeamKey::Jac, "https://upload.wikimedia.org/wikipedia/en/thumb/7/74/Jacksonville_Jaguars_logo.svg/200px-Jacksonville_Jaguars_logo.svg.png"),
    (TeamKey::Kc, "https://upload.wikimedia.org/wikipedia/en/thumb/e/e1/Kansas_City_Chiefs_logo.svg/300px-Kansas_City_Chiefs_logo.svg.png"),
    (TeamKey::Lac, "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a6/Los_Angeles_Chargers_logo.svg/200px-Los_Angeles_Chargers_logo.svg.png"),
    (TeamKey::Lar, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8a/Los_Angeles_Rams_logo.svg/300px-Los_Angeles_Rams_logo.svg.png"),
    (TeamKey::Lv, "https://upload.wikimedia.org/wikipedia/en/thumb/4/48/Las_Vegas_Raiders_logo.svg/200px-Las_Vegas_Raiders_logo.svg.png"),
    (TeamKey::Mia, "https://upload.wikimedia.org/wikipedia/en/thumb/3/37/Miami_Dolphins_logo.svg/300px-Miami_Dolphins_logo.svg.png"),
    (TeamKey::Min, "https://upload.wikimedia.org/wikipedia/en/thumb/4/48/Minnesota_Vikings_logo.svg/300px-Minnesota_Vikings_logo.svg.png"),
    (TeamKey::Ne, "https://upload.wikimedia.org/wikipedia/en/thumb/b/b9/New_England_Patriots_logo.svg/300px-New_England_Patriots_logo.svg.png"),
    (TeamKey::No, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/50/New_Orleans_Saints_logo.svg/200px-New_Orleans_Saints_logo.svg.png"),
    (TeamKey::Nyg, "https://upload.wikimedia.org/wikipedia/commons/thumb/6/60/New_York_Giants_logo.svg/200px-New_York_Giants_logo.svg.png"),
    (TeamKey::Nyj, "https://upload.wikimedia.org/wikipedia/en/thumb/6/6b/New_York_Jets_logo.svg/300px-New_York_Jets_logo.svg.png"),
    (TeamKey::Phi, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8e/Philadelphia_Eagles_logo.svg/300px-Philadelphia_Eagles_logo.svg.png"),
    (TeamKey::Pit, "https://upload.wikimedia.org/wikipedia/commons/thumb/d/de/Pittsburgh_Steelers_logo.svg/300px-Pittsburgh_Steelers_logo.svg.png"),
    (TeamKey::Sea, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8e/Seattle_Seahawks_logo.svg/300px-Seattle_Seahawks_logo.svg.png"),
    (TeamKey::Sf, "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/San_Francisco_49ers_logo.svg/300px-San_Francisco_49ers_logo.svg.png"),
    (TeamKey::Tb, "https://upload.wikimedia.org/wikipedia/en/thumb/a/a2/Tampa_Bay_Buccaneers_logo.svg/300px-Tampa_Bay_Buccaneers_logo.svg.png"),
    (TeamKey::Ten, "https://upload.wikimedia.org/wikipedia/en/thumb/c/c1/Tennessee_Titans_logo.svg/300px-Tennessee_Titans_logo.svg.png"),
    (TeamKey::Was, "https://upload.wikimedia.org/wikipedia/commons/thumb/0/0c/Washington_Commanders_logo.svg/200px-Washington_Commanders_logo.svg.png"),
    (TeamKey::Afc, "https://upload.wikimedia.org/wikipedia/en/thumb/7/7b/American_Football_Conference_logo.svg/200px-American_Football_Conference_logo.svg.png"),
    (TeamKey::Nfc, "https://upload.wikimedia.org/wikipedia/en/thumb/5/5e/National_Football_Conference_logo.svg/200px-National_Football_Conference_logo.svg.png"),
    (TeamKey::Nfl, "https://upload.wikimedia.org/wikipedia/en/thumb/a/a2/National_Football_League_logo.svg/200px-National_Football_League_logo.svg.png"),
];

// League codes have no wordmark; they fall back to their logo.
const WORDMARK_URLS: [(TeamKey, &str); 32] = [
    (TeamKey::Ari, "https://upload.wikimedia.org/wikipedia/en/thumb/7/72/Arizona_Cardinals_logo.svg/300px-Arizona_Cardinals_logo.svg.png"),
    (TeamKey::Atl, "https://upload.wikimedia.org/wikipedia/en/thumb/c/c5/Atlanta_Falcons_logo.svg/300px-Atlanta_Falcons_logo.svg.png"),
    (TeamKey::Bal, "https://upload.wikimedia.org/wikipedia/en/thumb/1/16/Baltimore_Ravens_logo.svg/300px-Baltimore_Ravens_logo.svg.png"),
    (TeamKey::Buf, "https://upload.wikimedia.org/wikipedia/en/thumb/7/77/Buffalo_Bills_logo.svg/300px-Buffalo_Bills_logo.svg.png"),
    (TeamKey::Car, "https://upload.wikimedia.org/wikipedia/en/thumb/1/1c/Carolina_Panthers_logo.svg/300px-Carolina_Panthers_logo.svg.png"),
    (TeamKey::Chi, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/5c/Chicago_Bears_logo.svg/300px-Chicago_Bears_logo.svg.png"),
    (TeamKey::Cin, "https://upload.wikimedia.org/wikipedia/commons/thumb/8/81/Cincinnati_Bengals_logo.svg/300px-Cincinnati_Bengals_logo.svg.png"),
    (TeamKey::Cle, "https://upload.wikimedia.org/wikipedia/en/thumb/d/d9/Cleveland_Browns_logo.svg/300px-Cleveland_Browns_logo.svg.png"),
    (TeamKey::Dal, "https://upload.wikimedia.org/wikipedia/commons/thumb/1/15/Dallas_Cowboys.svg/300px-Dallas_Cowboys.svg.png"),
    (TeamKey::Den, "https://upload.wikimedia.org/wikipedia/en/thumb/4/44/Denver_Broncos_logo.svg/300px-Denver_Broncos_logo.svg.png"),
    (TeamKey::Det, "https://upload.wikimedia.org/wikipedia/en/thumb/7/71/Detroit_Lions_logo.svg/300px-Detroit_Lions_logo.svg.png"),
    (TeamKey::Gb, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/50/Green_Bay_Packers_logo.svg/300px-Green_Bay_Packers_logo.svg.png"),
    (TeamKey::Hou, "https://upload.wikimedia.org/wikipedia/en/thumb/2/28/Houston_Texans_logo.svg/300px-Houston_Texans_logo.svg.png"),
    (TeamKey::Ind, "https://upload.wikimedia.org/wikipedia/commons/thumb/0/00/Indianapolis_Colts_logo.svg/300px-Indianapolis_Colts_logo.svg.png"),
    (TeamKey::Jac, "https://upload.wikimedia.org/wikipedia/en/thumb/7/74/Jacksonville_Jaguars_logo.svg/300px-Jacksonville_Jaguars_logo.svg.png"),
    (TeamKey::Kc, "https://upload.wikimedia.org/wikipedia/en/thumb/e/e1/Kansas_City_Chiefs_logo.svg/300px-Kansas_City_Chiefs_logo.svg.png"),
    (TeamKey::Lac, "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a6/Los_Angeles_Chargers_logo.svg/300px-Los_Angeles_Chargers_logo.svg.png"),
    (TeamKey::Lar, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8a/Los_Angeles_Rams_logo.svg/300px-Los_Angeles_Rams_logo.svg.png"),
    (TeamKey::Lv, "https://upload.wikimedia.org/wikipedia/en/thumb/4/48/Las_Vegas_Raiders_logo.svg/300px-Las_Vegas_Raiders_logo.svg.png"),
    (TeamKey::Mia, "https://upload.wikimedia.org/wikipedia/en/thumb/3/37/Miami_Dolphins_logo.svg/300px-Miami_Dolphins_logo.svg.png"),
    (TeamKey::Min, "https://upload.wikimedia.org/wikipedia/en/thumb/4/48/Minnesota_Vikings_logo.svg/300px-Minnesota_Vikings_logo.svg.png"),
    (TeamKey::Ne, "https://upload.wikimedia.org/wikipedia/en/thumb/b/b9/New_England_Patriots_logo.svg/300px-New_England_Patriots_logo.svg.png"),
    (TeamKey::No, "https://upload.wikimedia.org/wikipedia/commons/thumb/5/50/New_Orleans_Saints_logo.svg/300px-New_Orleans_Saints_logo.svg.png"),
    (TeamKey::Nyg, "https://upload.wikimedia.org/wikipedia/commons/thumb/6/60/New_York_Giants_logo.svg/300px-New_York_Giants_logo.svg.png"),
    (TeamKey::Nyj, "https://upload.wikimedia.org/wikipedia/en/thumb/6/6b/New_York_Jets_logo.svg/300px-New_York_Jets_logo.svg.png"),
    (TeamKey::Phi, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8e/Philadelphia_Eagles_logo.svg/300px-Philadelphia_Eagles_logo.svg.png"),
    (TeamKey::Pit, "https://upload.wikimedia.org/wikipedia/commons/thumb/d/de/Pittsburgh_Steelers_logo.svg/300px-Pittsburgh_Steelers_logo.svg.png"),
    (TeamKey::Sea, "https://upload.wikimedia.org/wikipedia/en/thumb/8/8e/Seattle_Seahawks_logo.svg/300px-Seattle_Seahawks_logo.svg.png"),
    (TeamKey::Sf, "https://upload.wikimedia.org/wikipedia/commons/thumb/3/3a/San_Francisco_49ers_logo.svg/300px-San_Francisco_49ers_logo.svg.png"),
    (TeamKey::Tb, "https://upload.wikimedia.org/wikipedia/en/thumb/a/a2/Tampa_Bay_Buccaneers_logo.svg/300px-Tampa_Bay_Buccaneers_logo.svg.png"),
    (TeamKey::Ten, "https://upload.wikimedia.org/wikipedia/en/thumb/c/c1/Tennessee_Titans_logo.svg/300px-Tennessee_Titans_logo.svg.png"),
    (TeamKey::Was, "https://upload.wikimedia.org/wikipedia/commons/thumb/0/0c/Washington_Commanders_logo.svg/300px-Washington_Commanders_logo.svg.png"),
];

/// Parse and check a URL for use as an asset source: absolute, `http` or
/// `https`, with a host.
pub fn validate_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| AssetError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// ESPN CDN headshot for a vendor id.
pub fn headshot_url(vendor_id: &str, size: HeadshotSize) -> Result<Url> {
    let id = clean_vendor_id(vendor_id)?;
    let base = match size {
        HeadshotSize::Full => ESPN_HEADSHOT_FULL,
        HeadshotSize::Small => ESPN_HEADSHOT_SMALL,
    };
    validate_url(&format!("{base}{id}.png"))
}

/// Subject after canonicalization: a known team or a resolved player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSubject {
    Team(TeamKey),
    Player(PlayerIdentity),
}

/// One URL to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    pub url: Url,
    /// Headshot size this URL serves when it is not the requested one.
    pub size_fallback: Option<HeadshotSize>,
}

impl CandidateUrl {
    fn new(url: Url) -> Self {
        Self {
            url,
            size_fallback: None,
        }
    }
}

/// Ordered URLs to try for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub urls: Vec<CandidateUrl>,
    /// Set when the URLs belong to a different kind than requested, e.g. a
    /// logo served in place of a missing wordmark.
    pub substituted: Option<AssetKind>,
}

impl Candidates {
    fn direct(url: Url) -> Self {
        Self {
            urls: vec![CandidateUrl::new(url)],
            substituted: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Snapshot of every configured team URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTable {
    pub logos: BTreeMap<TeamKey, Url>,
    pub wordmarks: BTreeMap<TeamKey, Url>,
}

/// Team URL tables plus the headshot template.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    logos: BTreeMap<TeamKey, Url>,
    wordmarks: BTreeMap<TeamKey, Url>,
    default_headshot_size: HeadshotSize,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssetUrls {
    /// The built-in Wikimedia tables.
    pub fn builtin() -> Self {
        let parse = |table: &[(TeamKey, &str)]| {
            table
                .iter()
                .filter_map(|(team, raw)| match Url::parse(raw) {
                    Ok(url) => Some((*team, url)),
                    Err(err) => {
                        warn!(team = %team, "skipping malformed built-in URL: {err}");
                        None
                    }
                })
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            logos: parse(&LOGO_URLS),
            wordmarks: parse(&WORDMARK_URLS),
            default_headshot_size: HeadshotSize::default(),
        }
    }

    /// No team URLs at all; callers fill them with the setters.
    pub fn empty() -> Self {
        Self {
            logos: BTreeMap::new(),
            wordmarks: BTreeMap::new(),
            default_headshot_size: HeadshotSize::default(),
        }
    }

    pub fn with_default_headshot_size(mut self, size: HeadshotSize) -> Self {
        self.default_headshot_size = size;
        self
    }

    pub fn default_headshot_size(&self) -> HeadshotSize {
        self.default_headshot_size
    }

    pub fn logo_url(&self, team: TeamKey) -> Option<&Url> {
        self.logos.get(&team)
    }

    pub fn wordmark_url(&self, team: TeamKey) -> Option<&Url> {
        self.wordmarks.get(&team)
    }

    /// Override the logo for a team given by any accepted spelling.
    pub fn set_logo_url(&mut self, team: &str, url: &str) -> Result<TeamKey> {
        let team = teams::normalize(team)?;
        let url = validate_url(url)?;
        debug!(team = %team, url = %url, "logo URL overridden");
        self.logos.insert(team, url);
        Ok(team)
    }

    pub fn set_wordmark_url(&mut self, team: &str, url: &str) -> Result<TeamKey> {
        let team = teams::normalize(team)?;
        let url = validate_url(url)?;
        debug!(team = %team, url = %url, "wordmark URL overridden");
        self.wordmarks.insert(team, url);
        Ok(team)
    }

    pub fn remove_wordmark_url(&mut self, team: TeamKey) -> Option<Url> {
        self.wordmarks.remove(&team)
    }

    /// Apply configured overrides. Team keys go through the normalizer, so
    /// an unknown team fails the whole batch before anything is changed.
    pub fn apply_overrides(&mut self, overrides: &UrlOverrides) -> Result<()> {
        let canonical = |table: &BTreeMap<String, Url>| {
            table
                .iter()
                .map(|(team, url)| Ok((teams::normalize(team)?, url.clone())))
                .collect::<Result<Vec<_>>>()
        };
        let logos = canonical(&overrides.logos)?;
        let wordmarks = canonical(&overrides.wordmarks)?;
        self.logos.extend(logos);
        self.wordmarks.extend(wordmarks);
        Ok(())
    }

    pub fn all_urls(&self) -> UrlTable {
        UrlTable {
            logos: self.logos.clone(),
            wordmarks: self.wordmarks.clone(),
        }
    }

    /// Candidate URLs for a canonical subject, in the order to try them.
    ///
    /// A wordmark request for a team without a wordmark yields the logo URL
    /// with [`Candidates::substituted`] set. Headshots try the requested size
    /// first and the other size second.
    pub fn candidate_urls(
        &self,
        subject: &ResolvedSubject,
        kind: AssetKind,
        size: Option<HeadshotSize>,
    ) -> Result<Candidates> {
        match (subject, kind) {
            (ResolvedSubject::Team(team), AssetKind::Logo) => self
                .logo_url(*team)
                .map(|url| Candidates::direct(url.clone()))
                .ok_or_else(|| unresolved(subject, kind)),
            (ResolvedSubject::Team(team), AssetKind::Wordmark) => {
                if let Some(url) = self.wordmark_url(*team) {
                    return Ok(Candidates::direct(url.clone()));
                }
                let logo = self
                    .logo_url(*team)
                    .ok_or_else(|| unresolved(subject, kind))?;
                warn!(team = %team, "no wordmark URL configured, substituting logo");
                Ok(Candidates {
                    urls: vec![CandidateUrl::new(logo.clone())],
                    substituted: Some(AssetKind::Logo),
                })
            }
            (ResolvedSubject::Player(identity), AssetKind::Headshot) => {
                let vendor_id = identity.vendor_id().ok_or_else(|| {
                    AssetError::MissingVendorId {
                        player: identity.to_string(),
                    }
                })?;
                let size = size.unwrap_or(self.default_headshot_size);
                Ok(Candidates {
                    urls: vec![
                        CandidateUrl::new(headshot_url(vendor_id, size)?),
                        CandidateUrl {
                            url: headshot_url(vendor_id, size.other())?,
                            size_fallback: Some(size.other()),
                        },
                    ],
                    substituted: None,
                })
            }
            _ => Err(unresolved(subject, kind)),
        }
    }
}

fn unresolved(subject: &ResolvedSubject, kind: AssetKind) -> AssetError {
    let subject = match subject {
        ResolvedSubject::Team(team) => team.to_string(),
        ResolvedSubject::Player(identity) => identity.to_string(),
    };
    AssetError::UnresolvedSubject { subject, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_code() {
        let urls = AssetUrls::builtin();
        for team in TeamKey::ALL {
            assert!(urls.logo_url(team).is_some(), "logo for {team}");
        }
        for team in TeamKey::all_teams() {
            assert!(urls.wordmark_url(*team).is_some(), "wordmark for {team}");
        }
    }

    #[test]
    fn wordmark_falls_back_to_logo() {
        let urls = AssetUrls::builtin();
        let candidates = urls
            .candidate_urls(&ResolvedSubject::Team(TeamKey::Nfl), AssetKind::Wordmark, None)
            .unwrap();
        assert_eq!(candidates.substituted, Some(AssetKind::Logo));
        assert_eq!(
            candidates.urls,
            vec![CandidateUrl::new(urls.logo_url(TeamKey::Nfl).unwrap().clone())]
        );
    }

    #[test]
    fn headshots_need_a_vendor_id() {
        let urls = AssetUrls::builtin();
        let no_vendor =
            PlayerIdentity::new(Some("00-0033873".into()), None, None).unwrap();
        let err = urls
            .candidate_urls(&ResolvedSubject::Player(no_vendor), AssetKind::Headshot, None)
            .unwrap_err();
        assert!(matches!(err, AssetError::MissingVendorId { .. }));

        let mahomes =
            PlayerIdentity::new(None, Some("3139477".into()), None).unwrap();
        let candidates = urls
            .candidate_urls(
                &ResolvedSubject::Player(mahomes),
                AssetKind::Headshot,
                Some(HeadshotSize::Small),
            )
            .unwrap();
        assert_eq!(
            candidates.urls[0].url.as_str(),
            "https://a.espncdn.com/i/headshots/nfl/players/small/3139477.png"
        );
        assert_eq!(candidates.urls[0].size_fallback, None);
        assert_eq!(
            candidates.urls[1].url.as_str(),
            "https://a.espncdn.com/i/headshots/nfl/players/full/3139477.png"
        );
        assert_eq!(candidates.urls[1].size_fallback, Some(HeadshotSize::Full));
    }

    #[test]
    fn mismatched_subject_and_kind_is_unresolved() {
        let urls = AssetUrls::builtin();
        let err = urls
            .candidate_urls(&ResolvedSubject::Team(TeamKey::Kc), AssetKind::Headshot, None)
            .unwrap_err();
        assert!(matches!(err, AssetError::UnresolvedSubject { .. }));
    }

    #[test]
    fn overrides_are_canonicalized_and_validated() {
        let mut urls = AssetUrls::empty();
        assert_eq!(
            urls.set_logo_url("arz", "https://cdn.example.com/ari.png").unwrap(),
            TeamKey::Ari
        );
        assert!(urls.set_logo_url("ARI", "file:///tmp/ari.png").is_err());
        assert!(urls.set_wordmark_url("ZZZ", "https://cdn.example.com/z.png").is_err());

        let mut overrides = UrlOverrides::default();
        overrides.wordmarks.insert(
            "Chiefs".into(),
            Url::parse("https://cdn.example.com/kc-wordmark.png").unwrap(),
        );
        urls.apply_overrides(&overrides).unwrap();
        assert_eq!(
            urls.all_urls().wordmarks.get(&TeamKey::Kc).map(Url::as_str),
            Some("https://cdn.example.com/kc-wordmark.png")
        );
    }

    #[test]
    fn validate_url_rejects_garbage() {
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com/a.png").is_err());
        assert!(validate_url("https://example.com/a.png").is_ok());
    }
}
