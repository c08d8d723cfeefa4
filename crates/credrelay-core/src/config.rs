//! Platform configuration: domain patterns, required credential names, and
//! the sufficiency policy.
//!
//! Configuration is immutable and passed into components at construction.
//! There are no ambient tables; everything a component needs to know about
//! a platform travels in a [`PlatformConfig`] inside a [`PlatformRegistry`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PlatformId;

/// A cookie-domain match pattern, e.g. `".douyin.com"`.
///
/// Matching is suffix-based on label boundaries: `.qq.com` matches
/// `channels.weixin.qq.com` and `qq.com`, but not `notqq.com`. Leading dots
/// on either side are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainPattern(String);

impl DomainPattern {
    /// Create a new pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The pattern as configured, including any leading dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a credential's domain falls under this pattern.
    pub fn matches(&self, domain: &str) -> bool {
        let pattern = self.0.trim_start_matches('.');
        let host = domain.trim_start_matches('.');
        if host == pattern {
            return true;
        }
        host.len() > pattern.len()
            && host.ends_with(pattern)
            && host.as_bytes()[host.len() - pattern.len() - 1] == b'.'
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DomainPattern {
    fn from(pattern: &str) -> Self {
        Self(pattern.to_string())
    }
}

/// Fraction of a platform's required credential names that must be present
/// for a bundle to be considered usable.
///
/// Different logged-in sessions on the same platform legitimately carry
/// different subsets of session credentials, so requiring all of them
/// produces spurious "incomplete" failures. The default demands one third,
/// rounded up. Tunable per platform; tightening it is a product decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SufficiencyPolicy {
    pub numerator: u32,
    pub denominator: u32,
}

/// The default leniency: one third of the required names.
pub const DEFAULT_SUFFICIENCY: SufficiencyPolicy = SufficiencyPolicy {
    numerator: 1,
    denominator: 3,
};

impl SufficiencyPolicy {
    /// Minimum number of required-name matches for a platform with
    /// `required` configured names: `ceil(required * numerator / denominator)`.
    pub fn min_matches(&self, required: usize) -> usize {
        if required == 0 {
            return 0;
        }
        let num = required as u64 * u64::from(self.numerator);
        let den = u64::from(self.denominator.max(1));
        num.div_ceil(den) as usize
    }
}

impl Default for SufficiencyPolicy {
    fn default() -> Self {
        DEFAULT_SUFFICIENCY
    }
}

/// Immutable per-platform configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// The platform this configuration describes.
    pub id: PlatformId,
    /// Domain patterns whose credentials belong to the platform.
    pub domains: Vec<DomainPattern>,
    /// Credential names that mark a usable logged-in session, in order.
    pub required: Vec<String>,
    /// How many of `required` must be present (see [`SufficiencyPolicy`]).
    #[serde(default)]
    pub sufficiency: SufficiencyPolicy,
    /// Days an exported credential payload is expected to stay valid.
    /// Consumed by the export artifact, not by sync itself.
    pub expires_hint_days: u32,
}

impl PlatformConfig {
    /// Create a configuration with the default sufficiency policy and
    /// expiry hint.
    pub fn new(
        id: impl Into<PlatformId>,
        domains: Vec<DomainPattern>,
        required: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            domains,
            required,
            sufficiency: SufficiencyPolicy::default(),
            expires_hint_days: 7,
        }
    }

    /// Override the sufficiency policy.
    pub fn with_sufficiency(mut self, sufficiency: SufficiencyPolicy) -> Self {
        self.sufficiency = sufficiency;
        self
    }

    /// Override the export expiry hint.
    pub fn with_expires_hint(mut self, days: u32) -> Self {
        self.expires_hint_days = days;
        self
    }

    /// Whether any of this platform's domain patterns covers `domain`.
    pub fn covers_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|p| p.matches(domain))
    }

    /// Whether `name` is one of this platform's required credential names.
    pub fn requires_name(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }
}

/// Immutable table of configured platforms, in a fixed iteration order.
///
/// The order of construction is the order `sync_all` visits platforms and
/// the order domain classification tries patterns (first match wins).
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<PlatformConfig>,
}

impl PlatformRegistry {
    /// Build a registry from configurations. Later entries with a duplicate
    /// id are ignored; the first configuration for an id wins.
    pub fn new(platforms: Vec<PlatformConfig>) -> Self {
        let mut seen: Vec<PlatformConfig> = Vec::with_capacity(platforms.len());
        for config in platforms {
            if !seen.iter().any(|c| c.id == config.id) {
                seen.push(config);
            }
        }
        Self { platforms: seen }
    }

    /// The built-in platform table: douyin, xiaohongshu, shipinhao.
    pub fn builtin() -> Self {
        Self::new(vec![
            PlatformConfig::new(
                "douyin",
                vec![DomainPattern::from(".douyin.com")],
                [
                    "sessionid",
                    "sessionid_ss",
                    "passport_csrf_token",
                    "ttwid",
                    "msToken",
                    "sid_tt",
                    "uid_tt",
                ]
                .map(String::from)
                .to_vec(),
            )
            .with_expires_hint(14),
            PlatformConfig::new(
                "xiaohongshu",
                vec![DomainPattern::from(".xiaohongshu.com")],
                [
                    "web_session",
                    "xsecappid",
                    "a1",
                    "webId",
                    "gid",
                    "customer-sso-sid",
                ]
                .map(String::from)
                .to_vec(),
            )
            .with_expires_hint(14),
            PlatformConfig::new(
                "shipinhao",
                vec![
                    DomainPattern::from(".weixin.qq.com"),
                    DomainPattern::from(".qq.com"),
                ],
                ["wxuin", "mmstat", "pac_uid", "uin", "skey", "pass_ticket"]
                    .map(String::from)
                    .to_vec(),
            )
            .with_expires_hint(4),
        ])
    }

    /// Look up a platform's configuration.
    pub fn get(&self, id: &PlatformId) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|c| &c.id == id)
    }

    /// Whether the id names a configured platform.
    pub fn contains(&self, id: &PlatformId) -> bool {
        self.get(id).is_some()
    }

    /// Classify a credential domain: the first platform whose patterns
    /// cover it. Platform domain sets are assumed disjoint in practice.
    pub fn classify_domain(&self, domain: &str) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|c| c.covers_domain(domain))
    }

    /// Configured platforms in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &PlatformConfig> {
        self.platforms.iter()
    }

    /// Number of configured platforms.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_pattern_suffix_match() {
        let pattern = DomainPattern::from(".qq.com");
        assert!(pattern.matches("qq.com"));
        assert!(pattern.matches(".qq.com"));
        assert!(pattern.matches("weixin.qq.com"));
        assert!(pattern.matches("channels.weixin.qq.com"));
        assert!(!pattern.matches("notqq.com"));
        assert!(!pattern.matches("qq.com.evil.example"));
    }

    #[test]
    fn test_min_matches_thirds() {
        let policy = SufficiencyPolicy::default();
        assert_eq!(policy.min_matches(0), 0);
        assert_eq!(policy.min_matches(1), 1);
        assert_eq!(policy.min_matches(3), 1);
        assert_eq!(policy.min_matches(6), 2);
        assert_eq!(policy.min_matches(7), 3);
    }

    #[test]
    fn test_min_matches_custom_policy() {
        let all = SufficiencyPolicy {
            numerator: 1,
            denominator: 1,
        };
        assert_eq!(all.min_matches(6), 6);
        let half = SufficiencyPolicy {
            numerator: 1,
            denominator: 2,
        };
        assert_eq!(half.min_matches(7), 4);
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let registry = PlatformRegistry::builtin();
        assert_eq!(registry.len(), 3);

        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["douyin", "xiaohongshu", "shipinhao"]);

        assert!(registry.contains(&PlatformId::new("douyin")));
        assert!(!registry.contains(&PlatformId::new("weibo")));
    }

    #[test]
    fn test_registry_classify_domain_first_match() {
        let registry = PlatformRegistry::builtin();
        let platform = registry.classify_domain("creator.douyin.com").unwrap();
        assert_eq!(platform.id.as_str(), "douyin");

        let platform = registry.classify_domain("channels.weixin.qq.com").unwrap();
        assert_eq!(platform.id.as_str(), "shipinhao");

        assert!(registry.classify_domain("example.com").is_none());
    }

    #[test]
    fn test_registry_duplicate_ids_first_wins() {
        let registry = PlatformRegistry::new(vec![
            PlatformConfig::new("p1", vec![DomainPattern::from(".a.example")], vec![]),
            PlatformConfig::new("p1", vec![DomainPattern::from(".b.example")], vec![]),
        ]);
        assert_eq!(registry.len(), 1);
        let config = registry.get(&PlatformId::new("p1")).unwrap();
        assert_eq!(config.domains[0].as_str(), ".a.example");
    }
}
